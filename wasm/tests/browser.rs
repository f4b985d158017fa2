#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;
use web2048_wasm::{texts, WasmGame};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn new_game_exposes_sixteen_cells() {
    let game = WasmGame::new(42, JsValue::UNDEFINED).unwrap();
    let board = game.get_board();
    assert_eq!(board.len(), 16);
    assert_eq!(board.iter().filter(|&&v| v != 0).count(), 2);
    assert_eq!(game.get_score(), 0);
    assert!(!game.can_undo());
}

#[wasm_bindgen_test]
fn invalid_direction_is_rejected() {
    let mut game = WasmGame::new(1, JsValue::NULL).unwrap();
    assert!(game.step("sideways").is_err());
    assert!(game.step_code(9).is_err());
    assert!(game.step("left").is_ok());
}

#[wasm_bindgen_test]
fn config_object_is_validated() {
    let config = js_sys::Object::new();
    js_sys::Reflect::set(&config, &"winTile".into(), &JsValue::from(3)).unwrap();
    assert!(WasmGame::new(1, config.into()).is_err());
}

#[wasm_bindgen_test]
fn texts_follow_language() {
    let en = texts("en");
    let title = js_sys::Reflect::get(&en, &"title".into()).unwrap();
    assert_eq!(title.as_string().as_deref(), Some("2048"));
}

#[wasm_bindgen_test]
fn event_callback_is_installed() {
    let calls = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&calls);
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| {
        *sink.borrow_mut() += 1;
    });
    let mut game = WasmGame::new(3, JsValue::UNDEFINED).unwrap();
    game.on_event(callback.as_ref().unchecked_ref::<js_sys::Function>().clone());
    // a fresh game can neither win nor lose after a handful of moves
    for code in [0u8, 1, 2, 3] {
        game.step_code(code).unwrap();
    }
    assert_eq!(*calls.borrow(), 0);
    drop(callback);
}
