//! Core 2048 rules shared by every front end.

pub mod engine;
pub mod input;

pub use engine::{Board, Direction, MoveOutcome, apply_move};
