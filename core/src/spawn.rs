//! Sources of randomness for tile spawning.
//!
//! The engine never touches an RNG directly: it asks a [`TileSource`] which
//! empty cell to fill and with what value. [`SeededSource`] is the normal
//! game source; [`ScriptedSource`] replays fixed choices so tests and replays
//! can pin down exactly where tiles appear.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::grid::Tile;

/// Chance of spawning a 4 instead of a 2.
pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

/// Decides where a new tile lands and what it is worth.
pub trait TileSource {
    /// Pick an index in `0..count`. Only called with `count > 0`.
    fn pick_cell(&mut self, count: usize) -> usize;

    /// Pick the value of the new tile (2 or 4).
    fn pick_value(&mut self) -> Tile;

    /// Restart the sequence from a new seed. Sources without a seed ignore it.
    fn reseed(&mut self, _seed: u64) {}
}

/// Deterministic, seedable source backed by `SmallRng`.
#[derive(Clone, Debug)]
pub struct SeededSource {
    rng: SmallRng,
    four_probability: f64,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self::with_four_probability(seed, DEFAULT_FOUR_PROBABILITY)
    }

    pub fn with_four_probability(seed: u64, four_probability: f64) -> Self {
        let four_probability = if four_probability.is_nan() {
            DEFAULT_FOUR_PROBABILITY
        } else {
            four_probability.clamp(0.0, 1.0)
        };
        SeededSource {
            rng: SmallRng::seed_from_u64(seed),
            four_probability,
        }
    }

    pub fn four_probability(&self) -> f64 {
        self.four_probability
    }
}

impl TileSource for SeededSource {
    fn pick_cell(&mut self, count: usize) -> usize {
        self.rng.gen_range(0..count)
    }

    fn pick_value(&mut self) -> Tile {
        if self.rng.gen_bool(self.four_probability) {
            4
        } else {
            2
        }
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }
}

impl<T: TileSource + ?Sized> TileSource for Box<T> {
    fn pick_cell(&mut self, count: usize) -> usize {
        (**self).pick_cell(count)
    }

    fn pick_value(&mut self) -> Tile {
        (**self).pick_value()
    }

    fn reseed(&mut self, seed: u64) {
        (**self).reseed(seed)
    }
}

/// Replays a queue of `(cell, value)` choices.
///
/// `cell` indexes the list of empty cells in row-major order and is reduced
/// modulo its length. Values of 4 or more spawn a 4, anything lower a 2.
/// Once the queue runs dry the first empty cell gets a 2.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    choices: VecDeque<(usize, Tile)>,
    pending_value: Option<Tile>,
}

impl ScriptedSource {
    pub fn new<I>(choices: I) -> Self
    where
        I: IntoIterator<Item = (usize, Tile)>,
    {
        ScriptedSource {
            choices: choices
                .into_iter()
                .map(|(cell, value)| (cell, spawn_value(value)))
                .collect(),
            pending_value: None,
        }
    }

    pub fn push(&mut self, cell: usize, value: Tile) {
        self.choices.push_back((cell, spawn_value(value)));
    }

    pub fn remaining(&self) -> usize {
        self.choices.len()
    }
}

fn spawn_value(value: Tile) -> Tile {
    if value >= 4 {
        4
    } else {
        2
    }
}

impl TileSource for ScriptedSource {
    fn pick_cell(&mut self, count: usize) -> usize {
        match self.choices.pop_front() {
            Some((cell, value)) => {
                self.pending_value = Some(value);
                cell % count
            }
            None => {
                self.pending_value = None;
                0
            }
        }
    }

    fn pick_value(&mut self) -> Tile {
        self.pending_value.take().unwrap_or(2)
    }
}
