use crate::error::StateError;
use crate::puzzle_sliding16::neighbors::{Neighbors, construct_neighbors};
use crate::puzzle_sliding16::state::State;
use crate::puzzle_sliding16::utils::{MAX_BOARD_SIZE, DENIED, MAX_SIDE, MIN_SIDE};
use once_cell::sync::Lazy;

/// Immutable description of a square board: its goal and geometry.
/// Computed once per board size and shared by all searches.
#[derive(Clone, Debug)]
pub struct Board {
    side: u8,
    goal: State,
    /// Stores indices of neighbors (or DENIED in the case of no neighbor) and is indexed by (in order): index of the cell and the move.
    neighbors: Neighbors,
    /// Convert: tile number (index) -> cell occupied by the tile in the goal state.
    goal_cells: [u8; MAX_BOARD_SIZE]
}

/// 3x3 board of the 8-puzzle.
pub static EIGHT_PUZZLE: Lazy<Board> = Lazy::new(|| Board::build(3));

/// 4x4 board of the 15-puzzle.
pub static FIFTEEN_PUZZLE: Lazy<Board> = Lazy::new(|| Board::build(4));

impl Board {
    /// Returns the board `side`x`side`, which must be in range 2..=4.
    pub fn new(side: u8) -> Result<Self, StateError> {
        if (MIN_SIDE..=MAX_SIDE).contains(&side) {
            Ok(Self::build(side))
        } else {
            Err(StateError::UnsupportedSide(side))
        }
    }

    fn build(side: u8) -> Self {
        let goal = State::goal(side);
        let mut goal_cells = [DENIED; MAX_BOARD_SIZE];
        for (cell, tile) in goal.iter().enumerate() {
            goal_cells[tile as usize] = cell as u8;
        }
        Self { side, goal, neighbors: construct_neighbors(side, side), goal_cells }
    }

    #[inline] pub fn side(&self) -> u8 { self.side }

    /// Returns number of cells in board.
    #[inline] pub fn board_size(&self) -> u8 { self.side * self.side }

    #[inline] pub fn goal(&self) -> State { self.goal }

    #[inline] pub fn is_goal(&self, state: State) -> bool { state == self.goal }

    #[inline] pub fn neighbors(&self) -> &Neighbors { &self.neighbors }

    /// Returns the cell occupied by `tile` in the goal state.
    #[inline] pub fn goal_cell(&self, tile: u8) -> u8 { self.goal_cells[tile as usize] }

    /// Returns (row, column) occupied by `tile` in the goal state.
    #[inline] pub fn goal_position(&self, tile: u8) -> (u8, u8) {
        let cell = self.goal_cell(tile);
        (cell / self.side, cell % self.side)
    }

    /// Checks whether `state` is a valid arrangement of a board of this size (see `State::validate`).
    pub fn check(&self, state: State) -> Result<(), StateError> {
        if state.side() != self.side {
            return Err(StateError::SideMismatch { expected: self.side, actual: state.side() });
        }
        state.validate()
    }

    /// Returns the number of states reachable from the goal, i.e. half of all arrangements.
    pub fn solvable_states(&self) -> u64 {
        (2..=self.board_size() as u64).product::<u64>() / 2
    }
}
