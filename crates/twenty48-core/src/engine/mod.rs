//! Engine module: 4x4 2048 board, direction-independent slide/merge,
//! random tile spawning and terminal-state checks. Pure data, no I/O.
//!
//! - `Board` is the row-major 4x4 state with useful methods.
//! - Free functions mirror the methods when convenient (e.g., `apply_move`).
//! - Every direction goes through one `compact_and_merge` line primitive.

mod ops;
pub mod state;

pub use state::{Board, CELLS, Cell, Direction, MoveOutcome, SIDE, Score, WIN_TILE};

pub use ops::{
    Line, apply_move, compact_and_merge, count_empty, get_highest_tile_val, has_won,
    insert_random_tile, is_game_over, line_indices,
};
