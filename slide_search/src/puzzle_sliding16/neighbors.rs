use crate::error::StateError;
use crate::puzzle_sliding16::board::Board;
use crate::puzzle_sliding16::state::State;
use crate::puzzle_sliding16::utils::{MAX_BOARD_SIZE, DENIED};
use arrayvec::ArrayVec;
use std::fmt;

/// Direction in which the blank slides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3
}

impl Move {
    /// All moves, in the order in which successors are generated.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Returns (row, column) offset of the blank.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1)
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Move::Up => 'U',
            Move::Down => 'D',
            Move::Left => 'L',
            Move::Right => 'R'
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Stores indices of neighbors (or DENIED in the case of no neighbor) and is indexed by (in order): index of the cell and the move.
pub type Neighbors = [[u8; 4]; MAX_BOARD_SIZE];

/// Returns tile number = index of cell with given (c, r) coordinates in the board with given number of cols.
#[inline(always)] pub fn cell_nr(cols: u8, c: u8, r: u8) -> u8 { r * cols + c }

/// Constructs neighbors matrix for the board of the size `cols` x `rows`.
pub fn construct_neighbors(cols: u8, rows: u8) -> Neighbors {
    let mut neighbors = [[DENIED; 4]; MAX_BOARD_SIZE];
    for r in 0..rows {
        for c in 0..cols {
            let cell = &mut neighbors[cell_nr(cols, c, r) as usize];
            for m in Move::ALL {
                let (dr, dc) = m.delta();
                let (nr, nc) = (r as i8 + dr, c as i8 + dc);
                if (0..rows as i8).contains(&nr) && (0..cols as i8).contains(&nc) {
                    cell[m as usize] = cell_nr(cols, nc as u8, nr as u8);
                }
            }
        }
    }
    neighbors
}

/// State reached by sliding the blank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Successor {
    pub state: State,
    /// The move that produced `state`.
    pub last_move: Move,
    /// Cell occupied by the blank in `state`.
    pub blank: u8
}

/// Returns all states reachable from `state` (whose blank occupies `blank` cell) by a single move.
/// Duplicates are not suppressed, the move that undoes the previous one is generated as well.
pub fn expand(neighbors: &Neighbors, state: State, blank: u8) -> ArrayVec<Successor, 4> {
    let mut result = ArrayVec::<Successor, 4>::new();
    for m in Move::ALL {
        let target = neighbors[blank as usize][m as usize];
        if target != DENIED {
            result.push(Successor { state: state.moved_blank(blank, target), last_move: m, blank: target });
        }
    }
    result
}

/// Returns all (state, move) pairs reachable from `state` by a single move of the blank.
pub fn successors(board: &Board, state: State) -> Result<ArrayVec<(State, Move), 4>, StateError> {
    board.check(state)?;
    let blank = state.blank_cell()?;
    Ok(expand(board.neighbors(), state, blank).into_iter().map(|s| (s.state, s.last_move)).collect())
}

impl State {
    /// Returns the state obtained by sliding the blank in direction `m`, or `None` if it would leave the board.
    pub fn apply(&self, board: &Board, m: Move) -> Option<State> {
        let blank = self.blank_cell().ok()?;
        let target = board.neighbors()[blank as usize][m as usize];
        (target != DENIED).then(|| self.moved_blank(blank, target))
    }
}
