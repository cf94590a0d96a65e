use rand::Rng;
use std::fmt;

use super::ops;
use serde::{Deserialize, Serialize};

/// Value held by a single cell: 0 for empty, otherwise 2, 4, 8, ...
pub type Cell = u32;
/// Accumulated merge score.
pub type Score = u64;

/// Cells per side of the board.
pub const SIDE: usize = 4;
/// Total number of cells.
pub const CELLS: usize = SIDE * SIDE;
/// Tile value that marks a won game.
pub const WIN_TILE: Cell = 2048;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Result of sliding a board in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    /// Sum of every tile produced by a merge during this move.
    pub score_delta: Score,
    /// True iff `board` differs from the input in at least one cell.
    pub moved: bool,
}

/// 4x4 2048 board, cells stored row-major (`row * 4 + col`).
///
/// Every cell is 0 (empty) or a power of two >= 2. Constructors assume
/// well-formed input; `is_well_formed` lets callers check it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(pub(crate) [Cell; CELLS]);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([0; CELLS]);

    /// Construct a `Board` from 16 row-major cell values.
    #[inline]
    pub fn from_cells(cells: [Cell; CELLS]) -> Self {
        let board = Board(cells);
        debug_assert!(board.is_well_formed(), "malformed board {cells:?}");
        board
    }

    /// Consume this `Board`, returning its row-major cells.
    #[inline]
    pub fn into_cells(self) -> [Cell; CELLS] {
        self.0
    }

    /// Borrow the row-major cells.
    #[inline]
    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.0
    }

    /// Value at (`row`, `col`), both in `0..4`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.0[row * SIDE + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        self.0[row * SIDE + col] = value;
    }

    /// True if every cell is 0 or a power of two >= 2.
    pub fn is_well_formed(&self) -> bool {
        self.0.iter().all(|&v| v == 0 || (v >= 2 && v.is_power_of_two()))
    }

    /// Slide/merge tiles in `dir`. No randomness.
    ///
    /// ```
    /// use twenty48_core::engine::{Board, Direction};
    /// let b = Board::from_cells([2, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    /// let out = b.apply_move(Direction::Left);
    /// assert_eq!(out.board.cells()[..4], [4, 4, 0, 0]);
    /// assert_eq!(out.score_delta, 8);
    /// assert!(out.moved);
    /// ```
    #[inline]
    pub fn apply_move(self, dir: Direction) -> MoveOutcome {
        ops::apply_move(self, dir)
    }

    /// Place a 2 (90%) or 4 (10%) into a uniformly chosen empty cell.
    /// A full board is returned unchanged.
    ///
    /// ```
    /// use twenty48_core::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let empty = self.count_empty();
        if empty == 0 {
            return self;
        }
        let index = rng.gen_range(0..empty);
        let tile = ops::generate_random_tile(rng);
        self.with_tile_at_empty(index, tile)
    }

    /// Set the `nth` empty cell (row-major order among empties) to `tile`.
    /// Returns the board unchanged if fewer than `nth + 1` cells are empty.
    pub fn with_tile_at_empty(mut self, nth: usize, tile: Cell) -> Self {
        if let Some(slot) = self.0.iter_mut().filter(|c| **c == 0).nth(nth) {
            *slot = tile;
        }
        self
    }

    /// Perform a move then insert a random tile if the move changed the board.
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(self, direction: Direction, rng: &mut R) -> MoveOutcome {
        let mut outcome = self.apply_move(direction);
        if outcome.moved {
            outcome.board = outcome.board.with_random_tile(rng);
        }
        outcome
    }

    /// True iff any cell holds 2048.
    #[inline]
    pub fn has_won(self) -> bool {
        ops::has_won(self)
    }

    /// True iff the board is full and no two neighbors are equal.
    #[inline]
    pub fn is_game_over(self) -> bool {
        ops::is_game_over(self)
    }

    /// Return the highest tile value present on the board (0 if empty).
    #[inline]
    pub fn highest_tile(self) -> Cell {
        ops::get_highest_tile_val(self)
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> usize {
        ops::count_empty(self)
    }

    /// Indices (row-major) of every empty cell.
    pub fn empty_cells(self) -> Vec<usize> {
        self.tiles()
            .enumerate()
            .filter_map(|(i, v)| (v == 0).then_some(i))
            .collect()
    }

    /// Sum of all tile values.
    #[inline]
    pub fn tile_sum(self) -> Score {
        self.0.iter().map(|&v| Score::from(v)).sum()
    }

    /// Left/right mirror image.
    pub fn mirrored(self) -> Self {
        let mut out = self;
        for row in out.0.chunks_exact_mut(SIDE) {
            row.reverse();
        }
        out
    }

    /// Swap rows and columns.
    pub fn transposed(self) -> Self {
        let mut out = Board::EMPTY;
        for row in 0..SIDE {
            for col in 0..SIDE {
                out.set(col, row, self.get(row, col));
            }
        }
        out
    }

    /// Iterate over tile values in row-major order.
    #[inline]
    pub fn tiles(self) -> TilesIter {
        TilesIter {
            cells: self.0,
            idx: 0,
        }
    }

    /// Iterate over the four rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.0.chunks_exact(SIDE)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = "-".repeat(SIDE * 8 - 1);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f, "{sep}")?;
            }
            let cells: Vec<String> = row.iter().map(|&v| ops::format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl From<[Cell; CELLS]> for Board {
    fn from(v: [Cell; CELLS]) -> Self {
        Board::from_cells(v)
    }
}

impl From<Board> for [Cell; CELLS] {
    fn from(b: Board) -> Self {
        b.into_cells()
    }
}

/// Iterator over board tiles in row-major order.
pub struct TilesIter {
    cells: [Cell; CELLS],
    idx: usize,
}

impl Iterator for TilesIter {
    type Item = Cell;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let v = *self.cells.get(self.idx)?;
        self.idx += 1;
        Some(v)
    }
}

impl IntoIterator for Board {
    type Item = Cell;
    type IntoIter = TilesIter;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tiles()
    }
}

impl IntoIterator for &Board {
    type Item = Cell;
    type IntoIter = TilesIter;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tiles()
    }
}
