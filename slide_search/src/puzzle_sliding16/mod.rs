//! Square sliding-tile puzzles with at most 16 cells (8-puzzle, 15-puzzle and the 2x2 toy board).

pub mod utils;
pub mod state;
pub mod board;
pub mod neighbors;
pub mod solvability;
pub mod heuristic;
pub mod pattern;
