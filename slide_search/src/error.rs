use thiserror::Error;

/// Reasons for which a tile arrangement is not a valid board state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("unsupported board side {0}, expected 2..=4")]
    UnsupportedSide(u8),
    #[error("expected {expected} tiles, got {actual}")]
    WrongTileCount { expected: usize, actual: usize },
    #[error("tile {tile} does not fit a board with {cells} cells")]
    TileOutOfRange { tile: u8, cells: u8 },
    #[error("tile {0} occurs more than once")]
    DuplicateTile(u8),
    #[error("expected exactly one blank, found {0}")]
    BlankCount(usize),
    #[error("state of a {actual}x{actual} board given for a {expected}x{expected} board")]
    SideMismatch { expected: u8, actual: u8 },
    #[error("bits past the last cell are set")]
    BitsBeyondBoard,
}

/// Outcome of a search that did not reach the goal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid start state: {0}")]
    InvalidState(#[from] StateError),
    /// The open set was exhausted, so no solution exists.
    #[error("goal is unreachable: open set exhausted after {steps} steps and {nodes_expanded} generated nodes")]
    Unsolvable { steps: u64, nodes_expanded: u64 },
    /// The search budget ran out before the goal was reached; nothing is known about solvability.
    #[error("search budget exceeded after {steps} steps and {nodes_expanded} generated nodes")]
    BudgetExceeded { steps: u64, nodes_expanded: u64 },
}

/// Reasons for which the sampler cannot deliver the requested states.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("requested {requested} distinct states, but only {available} solvable states exist")]
    TooManySamples { requested: usize, available: u64 },
    #[error("collected only {collected} of {requested} distinct states in {attempts} attempts")]
    Stalled { requested: usize, collected: usize, attempts: u64 },
    #[error(transparent)]
    InvalidState(#[from] StateError),
}

/// Reasons for which a heuristic cannot be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeuristicError {
    #[error("unknown heuristic {0:?}, expected one of: misplaced, manhattan, linear-conflict, pairwise-conflict, subset, pattern-db")]
    UnknownHeuristic(String),
    #[error("tile {tile} is not a movable tile of a board with {cells} cells")]
    InvalidPatternTile { tile: u8, cells: u8 },
    #[error("tile {0} is given more than once")]
    DuplicatePatternTile(u8),
    #[error("at most {max} tiles fit in a pattern, got {actual}")]
    PatternTooLarge { max: usize, actual: usize },
}
