use crate::error::StateError;
use crate::puzzle_sliding16::state::State;

/// Returns the number of pairs of (non-blank) tiles that appear in the wrong relative order.
pub fn inversions(state: State) -> u32 {
    let mut inversions = 0;
    let mut seen = 0u16;    // tiles that precede the current one
    for tile in state.iter().filter(|t| *t != 0) {
        // tiles greater than `tile` that were already seen
        inversions += (seen >> tile).count_ones();
        seen |= 1 << tile;
    }
    inversions
}

/// Checks whether the goal state can be reached from `state`.
///
/// For odd board width the state is solvable iff the number of inversions is even.
/// For even width the row of the blank, counted from the bottom starting at 1, is added to the inversions
/// and the sum must be odd.
pub fn is_solvable(state: State) -> Result<bool, StateError> {
    let (blank_row, _) = state.blank_position()?;
    let inversions = inversions(state);
    Ok(if state.side() % 2 == 1 {
        inversions % 2 == 0
    } else {
        (inversions + (state.side() - blank_row) as u32) % 2 == 1
    })
}
