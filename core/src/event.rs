//! Notifications emitted by the engine.

use serde::Serialize;

/// Something the presentation layer should tell the player about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GameEvent {
    /// The win tile appeared on the board. Play may continue.
    Won { tile: u32, score: u32 },
    /// A move was attempted with no move available.
    Lost { score: u32 },
}

/// Callback invoked with every event the engine emits.
pub type Listener = Box<dyn FnMut(&GameEvent)>;

/// Result of a single move command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the board changed (and a new tile was spawned).
    pub moved: bool,
    /// Points earned from merges in this move.
    pub gained: u32,
    /// Notification triggered by this move, if any.
    pub event: Option<GameEvent>,
}

impl MoveOutcome {
    pub fn won(&self) -> bool {
        matches!(self.event, Some(GameEvent::Won { .. }))
    }

    pub fn lost(&self) -> bool {
        matches!(self.event, Some(GameEvent::Lost { .. }))
    }
}
