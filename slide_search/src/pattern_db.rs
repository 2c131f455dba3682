use crate::error::HeuristicError;
use crate::puzzle_sliding16::board::Board;
use crate::puzzle_sliding16::heuristic::Heuristic;
use crate::puzzle_sliding16::pattern::{PatternManipulator, build_pattern_db};
use crate::puzzle_sliding16::state::State;
use log::debug;
use rustc_hash::FxHashMap;

/// Pattern database: exact distances to the goal pattern in the abstract space
/// in which only the blank and a subset of tiles are distinguishable.
///
/// Every move of the puzzle is also a move in the abstract space,
/// so the stored distances never exceed the real ones.
#[derive(Clone)]
pub struct PatternDatabase {
    manipulator: PatternManipulator,
    distances: FxHashMap<u32, u8>,
    /// Distance returned for patterns that are not stored.
    max_distance_plus_one: u8
}

impl PatternDatabase {
    /// Builds the complete database for the given (non-blank) `tiles` of `board`.
    pub fn new(board: &Board, tiles: impl IntoIterator<Item=u8>) -> Result<Self, HeuristicError> {
        Self::with_max_distance(board, tiles, u8::MAX)
    }

    /// Builds the database limited to patterns not further than `max_distance` from the goal.
    /// Patterns further from the goal are evaluated to `max_distance + 1`.
    pub fn with_max_distance(board: &Board, tiles: impl IntoIterator<Item=u8>, mut max_distance: u8) -> Result<Self, HeuristicError> {
        let (manipulator, goal) = PatternManipulator::new(board, tiles)?;
        let layers = build_pattern_db(&mut max_distance, &manipulator, goal, board.neighbors());
        let mut distances = FxHashMap::with_capacity_and_hasher(layers.iter().map(|v| v.len()).sum(), Default::default());
        for (distance, patterns) in layers.into_iter().enumerate() {
            distances.extend(patterns.into_iter().map(|p| (p, distance as u8)));
        }
        debug!("pattern database of {} tiles on {}x{} board: {} patterns, max distance {}",
            manipulator.pattern_len() - 1, board.side(), board.side(), distances.len(), max_distance);
        Ok(Self { manipulator, distances, max_distance_plus_one: max_distance.saturating_add(1) })
    }

    /// Returns number of stored patterns.
    pub fn len(&self) -> usize { self.distances.len() }

    pub fn is_empty(&self) -> bool { self.distances.is_empty() }

    /// Returns the largest distance stored.
    pub fn max_distance(&self) -> u8 { self.max_distance_plus_one - 1 }

    /// Returns the distance of `pattern` or `max_distance() + 1` if `pattern` is not stored.
    #[inline] pub fn heuristic_value(&self, pattern: u32) -> u8 {
        *self.distances.get(&pattern).unwrap_or(&self.max_distance_plus_one)
    }
}

impl Heuristic for PatternDatabase {
    #[inline] fn evaluate(&self, state: State) -> u16 {
        self.heuristic_value(self.manipulator.pattern_for(state)) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle_sliding16::board::EIGHT_PUZZLE;
    use crate::puzzle_sliding16::heuristic::Manhattan;
    use crate::puzzle_sliding16::neighbors::successors;
    use std::collections::{HashMap, VecDeque};

    /// Distances from the goal of all states reachable on `board`.
    fn all_distances(board: &Board) -> HashMap<State, u16> {
        let mut distances = HashMap::new();
        distances.insert(board.goal(), 0);
        let mut queue = VecDeque::from([board.goal()]);
        while let Some(state) = queue.pop_front() {
            let d = distances[&state];
            for (next, _) in successors(board, state).unwrap() {
                distances.entry(next).or_insert_with(|| { queue.push_back(next); d + 1 });
            }
        }
        distances
    }

    #[test]
    fn test_all_tiles_22_is_exact() {
        let board = Board::new(2).unwrap();
        let db = PatternDatabase::new(&board, [1, 2, 3]).unwrap();
        assert_eq!(db.len(), 12);
        for (state, d) in all_distances(&board) {
            assert_eq!(db.evaluate(state), d, "{:?}", state);
        }
    }

    #[test]
    fn test_admissible_33() {
        let board = &*EIGHT_PUZZLE;
        let db = PatternDatabase::new(board, [1, 2, 3, 4]).unwrap();
        assert_eq!(db.len(), 9 * 8 * 7 * 6 * 5);
        assert_eq!(db.evaluate(board.goal()), 0);
        let manhattan = Manhattan::new(board);
        let distances = all_distances(board);
        assert_eq!(distances.len() as u64, board.solvable_states());
        let mut better_than_manhattan = 0;
        for (state, d) in distances {
            let h = db.evaluate(state);
            assert!(h <= d, "{:?}: {} > {}", state, h, d);
            if h > manhattan.evaluate(state) { better_than_manhattan += 1; }
        }
        assert!(better_than_manhattan > 0);
    }

    #[test]
    fn test_limited_distance() {
        let board = &*EIGHT_PUZZLE;
        let db = PatternDatabase::with_max_distance(board, [1, 2], 3).unwrap();
        assert_eq!(db.max_distance(), 3);
        let full = PatternDatabase::new(board, [1, 2]).unwrap();
        assert!(db.len() < full.len());
        for state in all_distances(board).into_keys().take(2000) {
            let expected = full.evaluate(state).min(4);
            assert_eq!(db.evaluate(state), expected);
        }
    }
}
