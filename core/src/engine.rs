//! The game engine: owns the board, score and undo history.

use std::collections::VecDeque;
use std::fmt;

use log::{debug, info, trace};

use crate::config::EngineConfig;
use crate::direction::Direction;
use crate::error::Result;
use crate::event::{GameEvent, Listener, MoveOutcome};
use crate::grid::Grid;
use crate::spawn::{SeededSource, TileSource};

/// Whether the game still accepts moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Playing,
    /// A move was attempted with no move available. `reset` or `undo` leaves it.
    Ended,
}

/// Undo entry: the board and score as they were before a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: Grid,
    pub score: u32,
}

/// The 2048 game state.
///
/// All state is private and only changes through the command methods
/// ([`reset`](Engine::reset), [`step`](Engine::step), [`undo`](Engine::undo)).
/// Readers get a shared reference to the grid or copies of scalar state.
pub struct Engine<S: TileSource = SeededSource> {
    grid: Grid,
    score: u32,
    history: VecDeque<Snapshot>,
    phase: Phase,
    won: bool,
    source: S,
    config: EngineConfig,
    listeners: Vec<Listener>,
}

impl Engine<SeededSource> {
    /// Create a new game with the given seed and the default rules.
    ///
    /// The game starts with two random tiles (90% chance of 2, 10% chance of 4).
    pub fn new(seed: u64) -> Self {
        let config = EngineConfig::default();
        let source = SeededSource::with_four_probability(seed, config.four_probability);
        let mut engine = Engine::bare(Grid::new(), source, config);
        engine.reset();
        engine
    }

    /// Create a new seeded game with custom rules.
    pub fn with_config(seed: u64, config: EngineConfig) -> Result<Self> {
        let source = SeededSource::with_four_probability(seed, config.four_probability);
        Engine::with_source(source, config)
    }
}

impl<S: TileSource> Engine<S> {
    /// Create a new game drawing tiles from `source`.
    pub fn with_source(source: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let mut engine = Engine::bare(Grid::new(), source, config);
        engine.reset();
        Ok(engine)
    }

    /// Resume from an existing board with a zero score and empty history.
    ///
    /// No tiles are spawned.
    pub fn with_state(grid: Grid, source: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Engine::bare(grid, source, config))
    }

    fn bare(grid: Grid, source: S, config: EngineConfig) -> Self {
        Engine {
            grid,
            score: 0,
            history: VecDeque::new(),
            phase: Phase::Playing,
            won: false,
            source,
            config,
            listeners: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Start a fresh game: empty board, zero score, no history, two tiles.
    pub fn reset(&mut self) {
        self.grid = Grid::new();
        self.score = 0;
        self.history.clear();
        self.phase = Phase::Playing;
        self.won = false;
        self.spawn_tile();
        self.spawn_tile();
        debug!("new game: {:?}", self.grid);
    }

    /// Reseed the tile source, then [`reset`](Engine::reset).
    pub fn reseed(&mut self, seed: u64) {
        self.source.reseed(seed);
        self.reset();
    }

    /// Place a 2 or a 4 on a random empty cell. Does nothing on a full board.
    pub fn spawn_tile(&mut self) {
        let empty = self.grid.empty_cells();
        if empty.is_empty() {
            return;
        }
        let (row, col) = empty[self.source.pick_cell(empty.len())];
        let value = self.source.pick_value();
        self.grid.set(row, col, value);
    }

    /// Slide all tiles towards `direction`.
    ///
    /// If no move is possible the attempt is rejected: the phase becomes
    /// [`Phase::Ended`], a [`GameEvent::Lost`] is emitted and nothing else
    /// changes. Otherwise merges are scored, and if the board changed a tile
    /// is spawned and the win condition checked. The first time the win tile
    /// appears in a game a [`GameEvent::Won`] is emitted; play continues.
    pub fn step(&mut self, direction: Direction) -> MoveOutcome {
        if !self.can_move() {
            self.phase = Phase::Ended;
            let event = GameEvent::Lost { score: self.score };
            self.emit(event);
            return MoveOutcome {
                moved: false,
                gained: 0,
                event: Some(event),
            };
        }

        let before = Snapshot {
            grid: self.grid,
            score: self.score,
        };
        if self.config.record_noop_moves {
            self.record(before);
        }

        let gained = self.grid.slide(direction);
        let moved = self.grid != before.grid;
        trace!("move {direction}: moved={moved} gained={gained}");

        if !moved {
            return MoveOutcome {
                moved,
                gained,
                event: None,
            };
        }

        if !self.config.record_noop_moves {
            self.record(before);
        }
        self.score = self.score.saturating_add(gained);
        self.spawn_tile();

        let mut event = None;
        if !self.won && self.grid.contains(self.config.win_tile) {
            self.won = true;
            let won = GameEvent::Won {
                tile: self.config.win_tile,
                score: self.score,
            };
            self.emit(won);
            event = Some(won);
        }

        MoveOutcome {
            moved,
            gained,
            event,
        }
    }

    /// Parse `direction` and [`step`](Engine::step). Unknown names are rejected
    /// before any state is touched.
    pub fn step_named(&mut self, direction: &str) -> Result<MoveOutcome> {
        let direction = direction.parse::<Direction>()?;
        Ok(self.step(direction))
    }

    /// Restore the board from before the last recorded move.
    ///
    /// Returns false (and changes nothing) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop_back() else {
            return false;
        };
        self.grid = snapshot.grid;
        if self.config.restore_score_on_undo {
            self.score = snapshot.score;
        }
        self.phase = Phase::Playing;
        debug!("undo: {} snapshots left", self.history.len());
        true
    }

    /// Register a callback for every future [`GameEvent`].
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once a move has been rejected because none was possible.
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Ended
    }

    /// True if any direction could still change the board.
    pub fn can_move(&self) -> bool {
        self.grid.can_move()
    }

    /// Whether the win notification has fired in this game.
    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn max_tile(&self) -> u32 {
        self.grid.max_tile()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Private methods
    // -------------------------------------------------------------------------

    fn record(&mut self, snapshot: Snapshot) {
        if let Some(limit) = self.config.history_limit {
            if limit == 0 {
                return;
            }
            while self.history.len() >= limit {
                self.history.pop_front();
            }
        }
        self.history.push_back(snapshot);
    }

    fn emit(&mut self, event: GameEvent) {
        info!("{event:?}");
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl<S: TileSource> fmt::Debug for Engine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("grid", &self.grid)
            .field("score", &self.score)
            .field("phase", &self.phase)
            .field("won", &self.won)
            .field("history", &self.history.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: TileSource> fmt::Display for Engine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}", self.score)?;
        write!(f, "{}", self.grid)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::grid::SIZE;
    use crate::spawn::ScriptedSource;

    fn engine_with(rows: [[u32; SIZE]; SIZE], config: EngineConfig) -> Engine<ScriptedSource> {
        let grid = Grid::from_rows(rows).unwrap();
        Engine::with_state(grid, ScriptedSource::default(), config).unwrap()
    }

    fn engine(rows: [[u32; SIZE]; SIZE]) -> Engine<ScriptedSource> {
        engine_with(rows, EngineConfig::default())
    }

    const STUCK: [[u32; SIZE]; SIZE] = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];

    // -------------------------------------------------------------------------
    // Reset and spawning
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_game_has_two_tiles() {
        let game = Engine::new(42);
        assert_eq!(game.grid().empty_count(), 14);
        assert_eq!(game.score(), 0);
        assert!(!game.can_undo());
        assert_eq!(game.phase(), Phase::Playing);
        for &value in game.grid().cells() {
            assert!(value == 0 || value == 2 || value == 4);
        }
    }

    #[test]
    fn test_spawn_determinism() {
        let game1 = Engine::new(12345);
        let game2 = Engine::new(12345);
        assert_eq!(game1.grid(), game2.grid());
    }

    #[test]
    fn test_step_determinism() {
        let mut game1 = Engine::new(54321);
        let mut game2 = Engine::new(54321);
        for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            game1.step(dir);
            game2.step(dir);
            assert_eq!(game1.grid(), game2.grid());
            assert_eq!(game1.score(), game2.score());
        }
    }

    #[test]
    fn test_reset_clears_state() {
        let mut game = engine([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        game.step(Direction::Left);
        assert!(game.score() > 0);
        assert!(game.can_undo());

        game.reset();
        assert_eq!(game.score(), 0);
        assert!(!game.can_undo());
        assert_eq!(game.grid().empty_count(), 14);
    }

    #[test]
    fn test_reseed_matches_fresh_game() {
        let mut game = Engine::new(1);
        game.step(Direction::Left);
        game.reseed(42);
        assert_eq!(game.grid(), Engine::new(42).grid());
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_spawn_uses_scripted_cell() {
        let grid = Grid::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        let source = ScriptedSource::new([(2, 4)]);
        let mut game = Engine::with_state(grid, source, EngineConfig::default()).unwrap();
        game.spawn_tile();
        // empty cells in row-major order: (0,1), (0,2), (0,3), ...
        assert_eq!(game.grid().get(0, 3), 4);
    }

    #[test]
    fn test_spawn_on_full_board_is_noop() {
        let mut game = engine(STUCK);
        game.spawn_tile();
        assert_eq!(game.grid().rows(), STUCK);
    }

    // -------------------------------------------------------------------------
    // Moves
    // -------------------------------------------------------------------------

    #[test]
    fn test_merge_scores_and_spawns() {
        let mut game = engine([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = game.step(Direction::Left);
        assert!(outcome.moved);
        assert_eq!(outcome.gained, 4);
        assert_eq!(outcome.event, None);
        assert_eq!(game.score(), 4);
        assert_eq!(game.grid().get(0, 0), 4);
        // scripted source fell back to the first empty cell
        assert_eq!(game.grid().get(0, 1), 2);
    }

    #[test]
    fn test_noop_move_does_not_spawn_or_record() {
        let rows = [[2, 4, 2, 4], [0; 4], [0; 4], [0; 4]];
        let mut game = engine(rows);
        let outcome = game.step(Direction::Left);
        assert!(!outcome.moved);
        assert_eq!(outcome.gained, 0);
        assert_eq!(game.grid().rows(), rows);
        assert!(!game.can_undo());
    }

    #[test]
    fn test_noop_move_recorded_when_configured() {
        let rows = [[2, 4, 2, 4], [0; 4], [0; 4], [0; 4]];
        let mut game = engine_with(rows, EngineConfig::classic());
        game.step(Direction::Left);
        assert_eq!(game.history_len(), 1);
        assert!(game.undo());
        assert_eq!(game.grid().rows(), rows);
    }

    #[test]
    fn test_stuck_board_signals_loss_without_change() {
        let mut game = engine(STUCK);
        assert!(!game.can_move());
        let outcome = game.step(Direction::Up);
        assert!(!outcome.moved);
        assert!(outcome.lost());
        assert_eq!(outcome.event, Some(GameEvent::Lost { score: 0 }));
        assert_eq!(game.grid().rows(), STUCK);
        assert!(game.is_over());
        assert!(!game.can_undo());
    }

    #[test]
    fn test_reset_leaves_ended_phase() {
        let mut game = engine(STUCK);
        game.step(Direction::Left);
        assert!(game.is_over());
        game.reset();
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_win_fires_once() {
        let mut game = engine([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = game.step(Direction::Left);
        assert!(outcome.won());
        assert_eq!(
            outcome.event,
            Some(GameEvent::Won {
                tile: 2048,
                score: 2048
            })
        );
        assert!(game.has_won());

        let next = game.step(Direction::Right);
        assert!(next.moved);
        assert_eq!(next.event, None);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_undo_past_win_does_not_announce_again() {
        let rows = [[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]];
        let mut game = engine(rows);
        assert!(game.step(Direction::Left).won());

        assert!(game.undo());
        assert_eq!(game.grid().rows(), rows);
        assert!(game.has_won());

        let again = game.step(Direction::Left);
        assert!(again.moved);
        assert!(game.grid().contains(2048));
        assert_eq!(again.event, None);
    }

    #[test]
    fn test_score_saturates_on_huge_merges() {
        let grid = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        let mut game =
            Engine::with_state(grid, ScriptedSource::default(), EngineConfig::default()).unwrap();
        game.score = u32::MAX - 1;
        let outcome = game.step(Direction::Left);
        assert!(outcome.moved);
        assert_eq!(game.score(), u32::MAX);
    }

    #[test]
    fn test_custom_win_tile() {
        let config = EngineConfig {
            win_tile: 16,
            ..EngineConfig::default()
        };
        let mut game = engine_with([[8, 8, 0, 0], [0; 4], [0; 4], [0; 4]], config);
        assert!(game.step(Direction::Left).won());
    }

    #[test]
    fn test_step_named_rejects_unknown_direction() {
        let mut game = engine([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(game.step_named("sideways").is_err());
        assert_eq!(game.score(), 0);
        assert!(!game.can_undo());
        assert!(game.step_named("left").unwrap().moved);
    }

    // -------------------------------------------------------------------------
    // Undo
    // -------------------------------------------------------------------------

    #[test]
    fn test_undo_restores_grid_and_score() {
        let rows = [[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]];
        let mut game = engine(rows);
        game.step(Direction::Left);
        assert!(game.undo());
        assert_eq!(game.grid().rows(), rows);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_undo_keeps_score_in_classic_mode() {
        let rows = [[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]];
        let mut game = engine_with(rows, EngineConfig::classic());
        game.step(Direction::Left);
        assert!(game.undo());
        assert_eq!(game.grid().rows(), rows);
        assert_eq!(game.score(), 4);
    }

    #[test]
    fn test_undo_empty_history_is_noop() {
        let rows = [[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]];
        let mut game = engine(rows);
        assert!(!game.undo());
        assert_eq!(game.grid().rows(), rows);
    }

    #[test]
    fn test_undo_is_multi_step() {
        let mut game = engine([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]);
        let start = *game.grid();
        game.step(Direction::Left);
        let after_first = *game.grid();
        game.step(Direction::Down);
        assert_eq!(game.history_len(), 2);

        assert!(game.undo());
        assert_eq!(*game.grid(), after_first);
        assert!(game.undo());
        assert_eq!(*game.grid(), start);
        assert!(!game.undo());
    }

    #[test]
    fn test_history_limit_drops_oldest() {
        let config = EngineConfig {
            history_limit: Some(1),
            ..EngineConfig::default()
        };
        let mut game = engine_with([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]], config);
        game.step(Direction::Left);
        let after_first = *game.grid();
        game.step(Direction::Down);
        assert_eq!(game.history_len(), 1);
        assert!(game.undo());
        assert_eq!(*game.grid(), after_first);
        assert!(!game.undo());
    }

    #[test]
    fn test_history_limit_zero_disables_undo() {
        let config = EngineConfig {
            history_limit: Some(0),
            ..EngineConfig::default()
        };
        let mut game = engine_with([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], config);
        game.step(Direction::Left);
        assert!(!game.can_undo());
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    #[test]
    fn test_listeners_receive_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut game = engine([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let sink = Rc::clone(&seen);
        game.subscribe(move |event| sink.borrow_mut().push(*event));

        game.step(Direction::Left);
        game.step(Direction::Right);
        assert_eq!(
            *seen.borrow(),
            vec![GameEvent::Won {
                tile: 2048,
                score: 2048
            }]
        );
    }

    #[test]
    fn test_loss_event_fires_per_attempt() {
        let count = Rc::new(RefCell::new(0));
        let mut game = engine(STUCK);
        let sink = Rc::clone(&count);
        game.subscribe(move |event| {
            assert!(matches!(event, GameEvent::Lost { .. }));
            *sink.borrow_mut() += 1;
        });
        game.step(Direction::Left);
        game.step(Direction::Up);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = EngineConfig {
            win_tile: 3,
            ..EngineConfig::default()
        };
        assert!(Engine::with_config(1, config).is_err());
    }

    #[test]
    fn test_display_format() {
        let game = Engine::new(42);
        let display = format!("{}", game);
        assert!(display.contains("Score:"));
        assert!(display.contains("+------+"));
        assert!(format!("{:?}", game).contains("Engine"));
    }
}
