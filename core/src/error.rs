//! Error type shared by the engine and its front ends.

use thiserror::Error;

/// Failures raised when the engine is handed input outside its domain.
///
/// Losing the game or undoing with an empty history are not errors; those are
/// reported through [`crate::GameEvent`] and plain return values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid direction: {0:?} (expected left, right, up or down)")]
    InvalidDirection(String),
    #[error("invalid tile {value} at row {row}, column {col}: must be 0 or a power of two between 2 and 131072")]
    InvalidTile { row: usize, col: usize, value: u32 },
    #[error("invalid grid shape {rows}x{cols}: expected 4x4")]
    InvalidShape { rows: usize, cols: usize },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
