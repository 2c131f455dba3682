#![doc = include_str!("../README.md")]

pub mod error;
pub mod stats;
pub mod pattern_db;
pub mod solver;
pub mod sampler;
pub mod puzzle_sliding16;

pub use error::{HeuristicError, SampleError, SearchError, StateError};
pub use puzzle_sliding16::board::{Board, EIGHT_PUZZLE, FIFTEEN_PUZZLE};
pub use puzzle_sliding16::heuristic::{Heuristic, HeuristicKind};
pub use puzzle_sliding16::neighbors::{Move, successors};
pub use puzzle_sliding16::solvability::is_solvable;
pub use puzzle_sliding16::state::State;
pub use sampler::{Sampler, SamplerConfig, Strategy, generate_samples};
pub use solver::{AStarSolver, Solution, breadth_first, solve};
pub use stats::{Budget, SearchStats, SearchStatsCollector};
