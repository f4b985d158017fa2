//! # web2048 Core Engine
//!
//! The game-state engine behind the web2048 page: a 4x4 grid, the slide and
//! merge rules, score keeping, undo history and win/loss notifications.
//! Randomness is injected through [`TileSource`], so a seed (or a scripted
//! source) fully determines a game.
//!
//! Rendering and input capture live in the front ends (`web2048-wasm`,
//! `web2048-cli`); they read state through the query methods and react to
//! [`GameEvent`]s.
//!
//! ## Example
//!
//! ```rust
//! use web2048_core::{Direction, Engine};
//!
//! let mut game = Engine::new(42);
//! game.subscribe(|event| println!("{event:?}"));
//! let outcome = game.step(Direction::Left);
//! println!("Score: {}, moved: {}", game.score(), outcome.moved);
//! game.undo();
//! ```

pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod event;
pub mod grid;
pub mod locale;
pub mod spawn;

pub use config::EngineConfig;
pub use direction::Direction;
pub use engine::{Engine, Phase, Snapshot};
pub use error::{EngineError, Result};
pub use event::{GameEvent, Listener, MoveOutcome};
pub use grid::{slide_line, Grid, Line, Tile, MAX_TILE};
pub use locale::{Language, Texts};
pub use spawn::{ScriptedSource, SeededSource, TileSource};
