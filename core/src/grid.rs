//! The 4x4 board and the slide/merge algorithm.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::{EngineError, Result};

/// Board edge length.
pub const SIZE: usize = 4;
/// Number of cells on the board.
pub const CELLS: usize = SIZE * SIZE;

/// A single cell value: 0 for empty, otherwise a power of two >= 2.
pub type Tile = u32;

/// Largest tile a 4x4 board can hold: 2^17, when every cell has been filled
/// by a 4 on the way to it.
pub const MAX_TILE: Tile = 1 << 17;

/// One row or column, ordered from the edge tiles slide towards.
pub type Line = [Tile; SIZE];

/// The 2048 board.
///
/// Stored as a flat array of 16 values in row-major order (indices 0-3 are
/// row 0, 4-7 are row 1, etc.). `Grid` is `Copy`, so every snapshot taken
/// from it is an independent value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tile>", into = "Vec<Tile>")]
pub struct Grid {
    cells: [Tile; CELLS],
}

impl Grid {
    /// An empty board.
    pub fn new() -> Self {
        Grid { cells: [0; CELLS] }
    }

    /// Build a board from rows, validating every tile.
    pub fn from_rows(rows: [[Tile; SIZE]; SIZE]) -> Result<Self> {
        let mut grid = Grid::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(EngineError::InvalidTile {
                        row: r,
                        col: c,
                        value,
                    });
                }
                grid.cells[r * SIZE + c] = value;
            }
        }
        Ok(grid)
    }

    /// Build a board from a flat row-major slice, as handed over by JS.
    pub fn from_slice(values: &[Tile]) -> Result<Self> {
        if values.len() != CELLS {
            return Err(EngineError::InvalidShape {
                rows: values.len() / SIZE,
                cols: if values.len() % SIZE == 0 {
                    SIZE
                } else {
                    values.len() % SIZE
                },
            });
        }
        let mut rows = [[0; SIZE]; SIZE];
        for (i, &value) in values.iter().enumerate() {
            rows[i / SIZE][i % SIZE] = value;
        }
        Grid::from_rows(rows)
    }

    /// Build a board from nested vectors, checking the 4x4 shape.
    pub fn from_nested(rows: &[Vec<Tile>]) -> Result<Self> {
        let cols = rows.iter().map(Vec::len).find(|&len| len != SIZE);
        if rows.len() != SIZE || cols.is_some() {
            return Err(EngineError::InvalidShape {
                rows: rows.len(),
                cols: cols.unwrap_or(SIZE),
            });
        }
        let flat: Vec<Tile> = rows.iter().flatten().copied().collect();
        Grid::from_slice(&flat)
    }

    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.cells[row * SIZE + col]
    }

    /// Flat row-major view of the board.
    pub fn cells(&self) -> &[Tile; CELLS] {
        &self.cells
    }

    pub fn rows(&self) -> [[Tile; SIZE]; SIZE] {
        let mut rows = [[0; SIZE]; SIZE];
        for (i, &value) in self.cells.iter().enumerate() {
            rows[i / SIZE][i % SIZE] = value;
        }
        rows
    }

    /// Coordinates `(row, col)` of every empty cell, in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| (i / SIZE, i % SIZE))
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.cells.contains(&tile)
    }

    /// True if any cell is empty or two orthogonally adjacent cells match.
    pub fn can_move(&self) -> bool {
        if self.cells.contains(&0) {
            return true;
        }
        for row in 0..SIZE {
            for col in 0..SIZE {
                let value = self.get(row, col);
                if col + 1 < SIZE && value == self.get(row, col + 1) {
                    return true;
                }
                if row + 1 < SIZE && value == self.get(row + 1, col) {
                    return true;
                }
            }
        }
        false
    }

    /// Extract line `index` as seen when moving in `direction`.
    ///
    /// Index 0 of the result is always the edge tiles slide towards.
    pub fn line(&self, index: usize, direction: Direction) -> Line {
        let idx = line_indices(index, direction);
        [
            self.cells[idx[0]],
            self.cells[idx[1]],
            self.cells[idx[2]],
            self.cells[idx[3]],
        ]
    }

    /// Inverse of [`Grid::line`].
    pub fn set_line(&mut self, index: usize, direction: Direction, line: Line) {
        for (cell, value) in line_indices(index, direction).into_iter().zip(line) {
            self.cells[cell] = value;
        }
    }

    /// Slide every line towards `direction`, returning the points earned.
    pub fn slide(&mut self, direction: Direction) -> u32 {
        let mut gained: u32 = 0;
        for index in 0..SIZE {
            let (line, points) = slide_line(self.line(index, direction));
            self.set_line(index, direction, line);
            gained = gained.saturating_add(points);
        }
        gained
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: Tile) {
        self.cells[row * SIZE + col] = value;
    }
}

impl TryFrom<Vec<Tile>> for Grid {
    type Error = EngineError;

    fn try_from(values: Vec<Tile>) -> Result<Self> {
        Grid::from_slice(&values)
    }
}

impl From<Grid> for Vec<Tile> {
    fn from(grid: Grid) -> Self {
        grid.cells.to_vec()
    }
}

/// Grid cell indices for line `index`, ordered from the near edge.
fn line_indices(index: usize, direction: Direction) -> [usize; SIZE] {
    let mut out = [0; SIZE];
    for (k, slot) in out.iter_mut().enumerate() {
        let k = if direction.is_reversed() { SIZE - 1 - k } else { k };
        *slot = if direction.is_horizontal() {
            index * SIZE + k
        } else {
            k * SIZE + index
        };
    }
    out
}

/// Compact and merge a line towards index 0.
///
/// Returns the new line and the points earned. A tile produced by a merge
/// never merges again within the same pass, so `[2, 2, 2, 2]` becomes
/// `[4, 4, 0, 0]` and `[4, 2, 2, 0]` becomes `[4, 4, 0, 0]`.
pub fn slide_line(line: Line) -> (Line, u32) {
    let mut line = line;
    compress(&mut line);

    let mut gained: u32 = 0;
    for i in 0..SIZE - 1 {
        if line[i] != 0 && line[i] == line[i + 1] {
            line[i] = line[i].saturating_mul(2);
            gained = gained.saturating_add(line[i]);
            line[i + 1] = 0;
        }
    }

    compress(&mut line);
    (line, gained)
}

/// Move all non-zero values to the front, keeping their order.
fn compress(line: &mut Line) {
    let mut write_idx = 0;
    for read_idx in 0..SIZE {
        if line[read_idx] != 0 {
            if write_idx != read_idx {
                line[write_idx] = line[read_idx];
                line[read_idx] = 0;
            }
            write_idx += 1;
        }
    }
}

fn is_valid_tile(value: Tile) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows().iter()).finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+------+------+------+------+")?;
        for row in 0..SIZE {
            write!(f, "|")?;
            for col in 0..SIZE {
                let val = self.get(row, col);
                if val == 0 {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", val)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "+------+------+------+------+")?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
