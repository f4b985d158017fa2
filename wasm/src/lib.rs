//! # web2048 WebAssembly Bindings
//!
//! JavaScript-facing wrapper around the web2048 engine, used by the static
//! page in `web/`. The page forwards key presses and swipes, redraws from the
//! returned board, and shows win/loss messages from the result's `event`.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web2048_core::{Direction, Engine, EngineConfig, GameEvent, Language, MoveOutcome};

pub mod palette;

/// Result of a move, serialized for JavaScript.
#[derive(Serialize)]
pub struct JsMoveResult {
    /// The updated board state (16 elements, row-major order).
    pub board: Vec<u32>,
    /// Current total score.
    pub score: u32,
    /// Points earned from this move.
    pub gained: u32,
    /// Whether the board changed.
    pub moved: bool,
    /// This move produced the win notification.
    pub won: bool,
    /// This move was rejected because no move is possible.
    pub lost: bool,
    /// `{ kind: "won", tile, score }` or `{ kind: "lost", score }`, if any.
    pub event: Option<GameEvent>,
}

/// WebAssembly wrapper for the 2048 game.
#[wasm_bindgen]
pub struct WasmGame {
    game: Engine,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game with the given seed.
    ///
    /// `config` is an optional object with any of `winTile`,
    /// `fourProbability`, `recordNoopMoves`, `restoreScoreOnUndo` and
    /// `historyLimit`.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, config: JsValue) -> Result<WasmGame, JsValue> {
        let config = parse_config(config)?;
        let game = Engine::with_config(seed, config).map_err(|err| {
            gloo::console::warn!("rejected config", err.to_string());
            JsValue::from_str(&err.to_string())
        })?;
        Ok(WasmGame { game })
    }

    /// Start over with the current tile sequence.
    pub fn reset(&mut self) {
        self.game.reset();
    }

    /// Start over with a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.game.reseed(seed);
    }

    /// Execute a move: `"left"`, `"right"`, `"up"` or `"down"`.
    ///
    /// Returns an object with `board`, `score`, `gained`, `moved`, `won`,
    /// `lost` and `event`. Any other direction is rejected with an error
    /// string.
    pub fn step(&mut self, direction: &str) -> Result<JsValue, JsValue> {
        let outcome = self.game.step_named(direction).map_err(|err| {
            gloo::console::warn!("ignored move", err.to_string());
            JsValue::from_str(&err.to_string())
        })?;
        Ok(self.create_js_result(outcome))
    }

    /// Execute a move by numeric code (0=Up, 1=Down, 2=Left, 3=Right).
    #[wasm_bindgen(js_name = stepCode)]
    pub fn step_code(&mut self, code: u8) -> Result<JsValue, JsValue> {
        let direction = Direction::from_u8(code)
            .ok_or_else(|| JsValue::from_str(&format!("invalid direction code: {code}")))?;
        let outcome = self.game.step(direction);
        Ok(self.create_js_result(outcome))
    }

    /// Roll back the last recorded move. Returns false if there was none.
    pub fn undo(&mut self) -> bool {
        self.game.undo()
    }

    /// Register a callback receiving `{ kind: "won", tile, score }` or
    /// `{ kind: "lost", score }`.
    ///
    /// The callback runs inside `step` while the game is still borrowed, so
    /// it must not call back into this `WasmGame`; wasm-bindgen throws
    /// "recursive use of an object" if it does. Read the board or score after
    /// `step` returns, or use the `event` field of its result instead.
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: js_sys::Function) {
        self.game.subscribe(move |event: &GameEvent| {
            let Ok(value) = serde_wasm_bindgen::to_value(event) else {
                return;
            };
            if callback.call1(&JsValue::NULL, &value).is_err() {
                gloo::console::warn!("event callback threw");
            }
        });
    }

    /// Get the current board state as a JavaScript Uint32Array.
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> Vec<u32> {
        self.game.grid().cells().to_vec()
    }

    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u32 {
        self.game.score()
    }

    #[wasm_bindgen(js_name = getMaxTile)]
    pub fn get_max_tile(&self) -> u32 {
        self.game.max_tile()
    }

    #[wasm_bindgen(js_name = canMove)]
    pub fn can_move(&self) -> bool {
        self.game.can_move()
    }

    #[wasm_bindgen(js_name = isOver)]
    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.game.can_undo()
    }

    fn create_js_result(&self, outcome: MoveOutcome) -> JsValue {
        serde_wasm_bindgen::to_value(&self.move_result(outcome)).unwrap_or(JsValue::NULL)
    }

    fn move_result(&self, outcome: MoveOutcome) -> JsMoveResult {
        JsMoveResult {
            board: self.game.grid().cells().to_vec(),
            score: self.game.score(),
            gained: outcome.gained,
            moved: outcome.moved,
            won: outcome.won(),
            lost: outcome.lost(),
            event: outcome.event,
        }
    }
}

fn parse_config(config: JsValue) -> Result<EngineConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(EngineConfig::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(|err| {
        gloo::console::warn!("malformed config", err.to_string());
        JsValue::from_str(&err.to_string())
    })
}

// =============================================================================
// Presentation helpers
// =============================================================================

/// CSS background colour for a tile value.
#[wasm_bindgen(js_name = tileColor)]
pub fn tile_color(value: u32) -> String {
    palette::tile_color(value).to_string()
}

/// Cell caption: the value, or an empty string for an empty cell.
#[wasm_bindgen(js_name = tileLabel)]
pub fn tile_label(value: u32) -> String {
    palette::tile_label(value)
}

/// Direction name for a swipe from touch start to touch end, or undefined.
#[wasm_bindgen(js_name = swipeDirection)]
pub fn swipe_direction(dx: f64, dy: f64) -> Option<String> {
    Direction::from_swipe(dx, dy).map(|dir| dir.to_string())
}

/// Direction name for a `KeyboardEvent.key`, or undefined.
#[wasm_bindgen(js_name = keyDirection)]
pub fn key_direction(key: &str) -> Option<String> {
    Direction::from_key(key).map(|dir| dir.to_string())
}

/// Localized page strings for `"en"` or `"ru"`; unknown codes get the default language.
#[wasm_bindgen]
pub fn texts(lang: &str) -> JsValue {
    let language = lang.parse::<Language>().unwrap_or_default();
    serde_wasm_bindgen::to_value(language.texts()).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen(start)]
pub fn init() {
    gloo::console::log!("web2048 engine ready", env!("CARGO_PKG_VERSION"));
}
