//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::grid::MAX_TILE;
use crate::spawn::DEFAULT_FOUR_PROBABILITY;

/// Tile value that wins the game.
pub const DEFAULT_WIN_TILE: u32 = 2048;

/// Tunable rules of a game.
///
/// Every field has a default, so a partial JS object or JSON document is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Reaching this tile emits a win notification.
    pub win_tile: u32,
    /// Probability that a spawned tile is a 4.
    pub four_probability: f64,
    /// Record an undo snapshot even when a move changes nothing.
    pub record_noop_moves: bool,
    /// Undo rolls back the score together with the grid.
    pub restore_score_on_undo: bool,
    /// Maximum number of undo snapshots kept; `None` keeps all of them.
    pub history_limit: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            win_tile: DEFAULT_WIN_TILE,
            four_probability: DEFAULT_FOUR_PROBABILITY,
            record_noop_moves: false,
            restore_score_on_undo: true,
            history_limit: None,
        }
    }
}

impl EngineConfig {
    /// Configuration reproducing the classic page's undo quirks: every
    /// attempted move is recorded and undo leaves the score alone.
    pub fn classic() -> Self {
        EngineConfig {
            record_noop_moves: true,
            restore_score_on_undo: false,
            ..EngineConfig::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(4..=MAX_TILE).contains(&self.win_tile) || !self.win_tile.is_power_of_two() {
            return Err(EngineError::InvalidConfig(format!(
                "win tile {} is not a power of two between 4 and {MAX_TILE}",
                self.win_tile
            )));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(EngineError::InvalidConfig(format!(
                "four probability {} is outside [0, 1]",
                self.four_probability
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.win_tile, 2048);
        assert!(!config.record_noop_moves);
        assert!(config.restore_score_on_undo);
        assert_eq!(config.history_limit, None);
    }

    #[test]
    fn test_classic_keeps_quirks() {
        let config = EngineConfig::classic();
        assert!(config.record_noop_moves);
        assert!(!config.restore_score_on_undo);
    }

    #[test]
    fn test_rejects_bad_win_tile() {
        for win_tile in [0, 2, 3, 100, MAX_TILE << 1] {
            let config = EngineConfig {
                win_tile,
                ..EngineConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(EngineError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_probability() {
        for four_probability in [-0.1, 1.5, f64::NAN] {
            let config = EngineConfig {
                four_probability,
                ..EngineConfig::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"winTile": 512, "historyLimit": 3}"#).unwrap();
        assert_eq!(config.win_tile, 512);
        assert_eq!(config.history_limit, Some(3));
        assert_eq!(config.four_probability, DEFAULT_FOUR_PROBABILITY);
        assert!(config.restore_score_on_undo);
    }
}
