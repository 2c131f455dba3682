use crate::error::HeuristicError;
use crate::puzzle_sliding16::board::Board;
use crate::puzzle_sliding16::utils::{DENIED, MAX_BOARD_SIZE, BITS_PER_CELL, BITS_PER_CELL_MASK32};
use crate::puzzle_sliding16::neighbors::{Move, Neighbors};
use crate::puzzle_sliding16::state::State;
use arrayvec::ArrayVec;

/// Maximum number of tiles, blank included, whose positions fit in a pattern.
pub const MAX_PATTERN_LEN: usize = 32 / BITS_PER_CELL as usize;

/// Manipulate patterns.
///
/// Pattern is a vector of positions of tiles important for pattern (the blank and a subset of other tiles).
/// The tiles important for pattern are numbered from 0 (the blank is always 0-th) and these numbers
/// are indices of the pattern vector.
/// Pattern is encoded in u32 and uses BITS_PER_CELL bits per important tile to store its position.
#[derive(Clone, Copy, Debug)]
pub struct PatternManipulator {
    /// Convert: tile number (index) -> BITS_PER_CELL * number of important tile or DENIED if the tile is not important
    index_of_tile_in_pattern: [u8; MAX_BOARD_SIZE],

    /// Number of important tiles in pattern (including blank).
    pattern_len: u8
}

impl PatternManipulator {
    /// Returns pattern manipulator and the goal pattern for given list of numbers of important (non-blank) `tiles`.
    pub fn new(board: &Board, tiles: impl IntoIterator<Item=u8>) -> Result<(Self, u32), HeuristicError> {
        let cells = board.board_size();
        let mut goal_pattern = board.goal_cell(0) as u32;
        let mut index_of_tile_in_pattern = [DENIED; MAX_BOARD_SIZE];
        index_of_tile_in_pattern[0] = 0;
        let mut index_of_important = BITS_PER_CELL;
        let mut len = 1;
        for tile_nr in tiles {
            if tile_nr == 0 || tile_nr >= cells { return Err(HeuristicError::InvalidPatternTile { tile: tile_nr, cells }); }
            if index_of_tile_in_pattern[tile_nr as usize] != DENIED { return Err(HeuristicError::DuplicatePatternTile(tile_nr)); }
            len += 1;
            if len > MAX_PATTERN_LEN { continue; }
            goal_pattern |= (board.goal_cell(tile_nr) as u32) << index_of_important;
            index_of_tile_in_pattern[tile_nr as usize] = index_of_important;
            index_of_important += BITS_PER_CELL;
        }
        if len > MAX_PATTERN_LEN {
            return Err(HeuristicError::PatternTooLarge { max: MAX_PATTERN_LEN - 1, actual: len - 1 });
        }
        Ok((Self { index_of_tile_in_pattern, pattern_len: len as u8 }, goal_pattern))
    }

    /// Returns number of important tiles, the blank included.
    #[inline] pub fn pattern_len(&self) -> u8 { self.pattern_len }

    /// Returns the pattern which the given `state` matches to.
    pub fn pattern_for(&self, state: State) -> u32 {
        let mut pattern = 0;
        for (position, tile_nr) in state.iter().enumerate() {
            self.init_position(&mut pattern, tile_nr, position as u8);
        }
        pattern
    }

    /// Modifies `pattern` by setting position (which must be `0` before this call) of tile with given number `tile_nr` to `new_position`.
    /// Does nothing if tile_nr is not important for pattern.
    pub fn init_position(&self, pattern: &mut u32, tile_nr: u8, new_position: u8) {
        let index = self.index_of_tile_in_pattern[tile_nr as usize];
        if index != DENIED {
            *pattern |= (new_position as u32) << index;
        }
    }

    /// Same as `set_important_tile_position(pattern, 0, new_blank_position)`, but faster.
    /// See also: `move_blank`
    #[inline(always)]
    pub fn set_blank_position(pattern: &mut u32, new_blank_position: u8) {
        *pattern &= !BITS_PER_CELL_MASK32;
        *pattern |= new_blank_position as u32;
    }

    /// Returns position of blank in given `pattern`.
    #[inline(always)]
    pub fn blank_position(pattern: u32) -> u8 {
        (pattern & BITS_PER_CELL_MASK32) as u8
    }

    /// Sets position of important tile with given number `important_tile_nr` in `pattern` to `new_position`.
    #[inline(always)]
    pub fn set_important_tile_position(&self, pattern: &mut u32, important_tile_nr: u8, new_position: u8) {
        let index = important_tile_nr * BITS_PER_CELL;
        *pattern &= !(BITS_PER_CELL_MASK32 << index);
        *pattern |= (new_position as u32) << index;
    }

    /// Manipulates `pattern` by swapping blank with the tile that occupies `new_blank_position`.
    pub fn move_blank(&self, pattern: &mut u32, new_blank_position: u8) {
        let old_blank_pos = Self::blank_position(*pattern);
        Self::set_blank_position(pattern, new_blank_position);
        let mut to_process = *pattern;
        for tile_nr in 1..self.pattern_len {
            to_process >>= BITS_PER_CELL;
            if (to_process & BITS_PER_CELL_MASK32) as u8 == new_blank_position {
                // tile_nr has position new_blank_position and is just swapped with blank
                self.set_important_tile_position(pattern, tile_nr, old_blank_pos);
                break;
            }
        }
    }

    /// Returns a modified copy of `pattern` with swapped blank with the tile that occupies `new_blank_position`.
    #[inline(always)]
    pub fn moved_blank(&self, mut pattern: u32, new_blank_position: u8) -> u32 {
        self.move_blank(&mut pattern, new_blank_position); pattern
    }

    /// Returns all patterns that can be obtained from `pattern` by swapping blank with a neighbor tile.
    pub fn neighbors(&self, pattern: u32, neighbors: &Neighbors) -> ArrayVec::<u32, 4> {
        let mut result = ArrayVec::<u32, 4>::new();
        let blank = Self::blank_position(pattern) as usize;
        for m in Move::ALL {
            let neighbor_pos = neighbors[blank][m as usize];
            if neighbor_pos != DENIED {
                result.push(self.moved_blank(pattern, neighbor_pos));
            }
        }
        result
    }
}

/// Returns patterns grouped by their distance to the `goal` pattern:
/// i-th vector contains (sorted) all patterns with distance to goal equal i.
///
/// Patterns further than `max_pattern_distance` are not generated;
/// `max_pattern_distance` is clamped to the maximum distance that exists.
pub fn build_pattern_db(max_pattern_distance: &mut u8, pattern_manipulator: &PatternManipulator, goal: u32, neighbors: &Neighbors)
                        -> Vec::<Vec::<u32>>
{
    let mut pattern_db = Vec::<Vec::<u32>>::new();  // i-th vector contains all patterns with distance to goal equal i
    pattern_db.push([goal].into());
    if *max_pattern_distance > 0 {
        let mut current = pattern_manipulator.neighbors(goal, neighbors).to_vec();
        current.sort();
        while pattern_db.len() < *max_pattern_distance as usize {
            let prev = &pattern_db[pattern_db.len() - 1];
            let mut next = Vec::new();
            for pattern in current.iter() {
                for n in pattern_manipulator.neighbors(*pattern, neighbors) {
                    if prev.binary_search(&n).is_err() && current.binary_search(&n).is_err() {
                        next.push(n);
                    }
                }
            }
            if next.is_empty() { *max_pattern_distance = pattern_db.len() as u8; break; }
            pattern_db.push(current);
            current = next;
            current.sort();
            current.dedup();
            current.shrink_to_fit();
        }
        pattern_db.push(current);
    }
    pattern_db
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle_sliding16::board::EIGHT_PUZZLE;
    use crate::puzzle_sliding16::neighbors::construct_neighbors;
    use std::collections::HashSet;
    use std::iter::FromIterator;

    /// Returns the cell of `tile_nr` in `pattern`, or DENIED if the tile is not important.
    fn position_of(pm: &PatternManipulator, pattern: u32, tile_nr: u8) -> u8 {
        let index = pm.index_of_tile_in_pattern[tile_nr as usize];
        if index == DENIED { DENIED } else { ((pattern >> index) & BITS_PER_CELL_MASK32) as u8 }
    }

    #[test]
    fn pattern_manipulator_33() {
        // 1 2 3
        // 4 5 6
        // 7 8 _
        let board = &*EIGHT_PUZZLE;
        let (pm, goal) = PatternManipulator::new(board, [2, 6]).unwrap();
        assert_eq!(pm.pattern_len(), 3);
        assert_eq!(pm.index_of_tile_in_pattern[0..7], [0, DENIED, 1*4, DENIED, DENIED, DENIED, 2*4]);
        assert_eq!(PatternManipulator::blank_position(goal), 8);
        assert_eq!(position_of(&pm, goal, 0), 8);
        assert_eq!(position_of(&pm, goal, 1), DENIED);
        assert_eq!(position_of(&pm, goal, 2), 1);
        assert_eq!(position_of(&pm, goal, 6), 5);
        assert_eq!(pm.pattern_for(board.goal()), goal);
        let mut s = goal;
        pm.move_blank(&mut s, 5);   // 6 goes down
        assert_eq!(position_of(&pm, s, 0), 5);
        assert_eq!(position_of(&pm, s, 2), 1);
        assert_eq!(position_of(&pm, s, 6), 8);
        assert_eq!(pm.pattern_for(board.goal().moved_blank(8, 5)), s);
        let sl = pm.moved_blank(s, 4);  // 5 is not important
        assert_eq!(position_of(&pm, sl, 0), 4);
        assert_eq!(position_of(&pm, sl, 2), 1);
        assert_eq!(position_of(&pm, sl, 6), 8);
        let mut swapped = goal;
        pm.set_important_tile_position(&mut swapped, 1, 0);
        assert_eq!(position_of(&pm, swapped, 2), 0);
        assert_eq!(position_of(&pm, swapped, 6), 5);
        let n = pm.neighbors(goal, board.neighbors());
        assert_eq!(n.len(), 2);
        assert_eq!(HashSet::<u32>::from_iter(n.iter().cloned()),
                   HashSet::from_iter([pm.pattern_for(board.goal().moved_blank(8, 5)), pm.pattern_for(board.goal().moved_blank(8, 7))]));
    }

    #[test]
    fn pattern_manipulator_rejects_bad_tiles() {
        let board = &*EIGHT_PUZZLE;
        assert_eq!(PatternManipulator::new(board, [0]).unwrap_err(), HeuristicError::InvalidPatternTile { tile: 0, cells: 9 });
        assert_eq!(PatternManipulator::new(board, [9]).unwrap_err(), HeuristicError::InvalidPatternTile { tile: 9, cells: 9 });
        assert_eq!(PatternManipulator::new(board, [3, 3]).unwrap_err(), HeuristicError::DuplicatePatternTile(3));
        assert_eq!(PatternManipulator::new(board, 1..=8).unwrap_err(), HeuristicError::PatternTooLarge { max: 7, actual: 8 });
        assert!(PatternManipulator::new(board, 1..=7).is_ok());
    }

    #[test]
    fn build_pattern_db_22_only_blank_full() {
        // 1 2
        // 3 _
        let board = Board::new(2).unwrap();
        let (pm, goal) = PatternManipulator::new(&board, []).unwrap();
        let mut max_dist = u8::MAX;
        let db = build_pattern_db(&mut max_dist, &pm, goal, board.neighbors());
        assert_eq!(max_dist, 2);
        assert_eq!(db.len(), 3);
        assert_eq!(db[0], [3]);
        assert_eq!(db[1], [1, 2]);
        assert_eq!(db[2], [0]);
    }

    #[test]
    fn build_pattern_db_33_only_blank_max1() {
        let board = &*EIGHT_PUZZLE;
        let (pm, goal) = PatternManipulator::new(board, []).unwrap();
        let mut max_dist = 1;
        let db = build_pattern_db(&mut max_dist, &pm, goal, &construct_neighbors(3, 3));
        assert_eq!(max_dist, 1);
        assert_eq!(db.len(), 2);
        assert_eq!(db[0], [8]);
        assert_eq!(db[1], [5, 7]);
    }

    #[test]
    fn build_pattern_db_22_all_tiles() {
        // with every tile important, the database covers exactly the 12 solvable states
        let board = Board::new(2).unwrap();
        let (pm, goal) = PatternManipulator::new(&board, 1..=3).unwrap();
        let mut max_dist = u8::MAX;
        let db = build_pattern_db(&mut max_dist, &pm, goal, board.neighbors());
        assert_eq!(db.iter().map(|v| v.len()).sum::<usize>(), 12);
        assert_eq!(max_dist as usize, db.len() - 1);
    }
}
