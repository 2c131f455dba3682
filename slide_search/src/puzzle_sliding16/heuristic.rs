use crate::error::HeuristicError;
use crate::pattern_db::PatternDatabase;
use crate::puzzle_sliding16::board::Board;
use crate::puzzle_sliding16::neighbors::cell_nr;
use crate::puzzle_sliding16::state::State;
use crate::puzzle_sliding16::utils::MAX_BOARD_SIZE;
use arrayvec::ArrayVec;
use std::fmt;
use std::str::FromStr;

/// Lower bound of the number of moves needed to reach the goal.
///
/// Implementations must never overestimate the real distance (be admissible),
/// otherwise the A* search is not guaranteed to find an optimal solution.
pub trait Heuristic {
    fn evaluate(&self, state: State) -> u16;
}

/// Zero heuristic: turns A* into uniform-cost search.
impl Heuristic for () {
    #[inline(always)] fn evaluate(&self, _state: State) -> u16 { 0 }
}

impl<H: Heuristic + ?Sized> Heuristic for &H {
    #[inline(always)] fn evaluate(&self, state: State) -> u16 { (**self).evaluate(state) }
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    #[inline(always)] fn evaluate(&self, state: State) -> u16 { (**self).evaluate(state) }
}

/// Distances between all pair of cells.
pub type CellMetric = [[u8; MAX_BOARD_SIZE]; MAX_BOARD_SIZE];

/// Returns Manhattan metric for the board of given size.
pub fn manhattan_metric(cols: u8, rows: u8) -> CellMetric {
    let mut cell_distances = [[0u8; MAX_BOARD_SIZE]; MAX_BOARD_SIZE];
    for first_r in 0..rows {
        for first_c in 0..cols {
            let first_cell = cell_nr(cols, first_c, first_r) as usize;
            for second_r in 0..rows {
                let row_dist = if second_r >= first_r { second_r - first_r } else { first_r - second_r };
                for second_c in first_c..cols {
                    let second_cell = cell_nr(cols, second_c, second_r) as usize;
                    let distance = row_dist + second_c - first_c;
                    cell_distances[first_cell][second_cell] = distance;
                    cell_distances[second_cell][first_cell] = distance;
                }
            }
        }
    }
    cell_distances
}

/// Returns metric indexed by cell and tile that gives the distance between the cell and the goal cell of the tile.
/// Distances of the blank and of tiles for which `counted` returns `false` are `0`.
pub fn tile_metric(board: &Board, counted: impl Fn(u8) -> bool) -> CellMetric {
    let cell_distances = manhattan_metric(board.side(), board.side());
    let mut result = [[0u8; MAX_BOARD_SIZE]; MAX_BOARD_SIZE];
    for cell in 0..board.board_size() as usize {
        for tile in 1..board.board_size() {
            if counted(tile) {
                result[cell][tile as usize] = cell_distances[cell][board.goal_cell(tile) as usize];
            }
        }
    }
    result
}

/// Sums distances, given by `metric` (see `tile_metric`), of all tiles of `state` to their goal cells.
pub fn calc_manhattan_heuristic(metric: &CellMetric, state: State) -> u8 {
    state.iter().enumerate().map(|(i, t)| metric[i][t as usize]).sum()
}

/// Number of non-blank tiles that are not in their goal cells.
#[derive(Clone, Copy, Debug)]
pub struct MisplacedTiles {
    goal: State
}

impl MisplacedTiles {
    pub fn new(board: &Board) -> Self { Self { goal: board.goal() } }
}

impl Heuristic for MisplacedTiles {
    fn evaluate(&self, state: State) -> u16 {
        state.iter().zip(self.goal.iter()).filter(|&(t, g)| t != 0 && t != g).count() as u16
    }
}

/// Sum of Manhattan distances of all non-blank tiles to their goal cells.
#[derive(Clone, Copy)]
pub struct Manhattan {
    metric: CellMetric
}

impl Manhattan {
    pub fn new(board: &Board) -> Self { Self { metric: tile_metric(board, |_| true) } }
}

impl Heuristic for Manhattan {
    #[inline] fn evaluate(&self, state: State) -> u16 {
        calc_manhattan_heuristic(&self.metric, state) as u16
    }
}

/// Manhattan distance restricted to a fixed subset of tiles.
///
/// It never exceeds `Manhattan` and it is meant as a cheaper, coarser heuristic for comparison.
#[derive(Clone, Copy)]
pub struct TileSubset {
    metric: CellMetric
}

impl TileSubset {
    /// Tiles counted by default: the first row and the first tile of the second row.
    pub fn default_tiles(board: &Board) -> impl Iterator<Item=u8> {
        1..=board.side() + 1
    }

    pub fn new(board: &Board, tiles: impl IntoIterator<Item=u8>) -> Result<Self, HeuristicError> {
        let cells = board.board_size();
        let mut counted = 0u16;
        for t in tiles {
            if t == 0 || t >= cells { return Err(HeuristicError::InvalidPatternTile { tile: t, cells }); }
            if counted & (1 << t) != 0 { return Err(HeuristicError::DuplicatePatternTile(t)); }
            counted |= 1 << t;
        }
        Ok(Self { metric: tile_metric(board, |t| counted & (1 << t) != 0) })
    }
}

impl Heuristic for TileSubset {
    #[inline] fn evaluate(&self, state: State) -> u16 {
        calc_manhattan_heuristic(&self.metric, state) as u16
    }
}

/// Goal positions (column for rows, row for columns) of the tiles that lie in their goal line, in order of appearance.
type Line = ArrayVec<u8, 4>;

/// Returns the number of pairs of tiles in reversed order.
fn reversed_pairs(line: &Line) -> u16 {
    let mut result = 0;
    for (j, a) in line.iter().enumerate() {
        result += line[j+1..].iter().filter(|&&b| *a > b).count() as u16;
    }
    result
}

/// Returns the minimum number of tiles that must leave the line to remove all conflicts,
/// i.e. the length of the line minus its longest increasing subsequence.
fn tiles_to_remove(line: &Line) -> u16 {
    let mut lis = [1u8; 4];
    for k in 1..line.len() {
        for j in 0..k {
            if line[j] < line[k] && lis[j] + 1 > lis[k] { lis[k] = lis[j] + 1; }
        }
    }
    let longest = lis[..line.len()].iter().copied().max().unwrap_or(0);
    line.len() as u16 - longest as u16
}

/// Calls `f` for every row and column of `state` with the tiles that are in their goal row (column).
fn for_each_line(board: &Board, state: State, mut f: impl FnMut(&Line)) {
    let side = board.side();
    for i in 0..side {
        let mut row = Line::new();
        let mut col = Line::new();
        for j in 0..side {
            let in_row = state.tile(i, j);
            if in_row != 0 {
                let (goal_r, goal_c) = board.goal_position(in_row);
                if goal_r == i { row.push(goal_c); }
            }
            let in_col = state.tile(j, i);
            if in_col != 0 {
                let (goal_r, goal_c) = board.goal_position(in_col);
                if goal_c == i { col.push(goal_r); }
            }
        }
        f(&row);
        f(&col);
    }
}

/// Returns the linear conflict penalty: 2 moves for each tile that has to leave its goal row or column
/// to let the other tiles of that line pass.
pub fn linear_conflicts(board: &Board, state: State) -> u16 {
    let mut result = 0;
    for_each_line(board, state, |line| result += tiles_to_remove(line));
    2 * result
}

/// Returns 2 for each pair of tiles that are in their goal row (column) but in reversed order.
///
/// Unlike `linear_conflicts`, it can overestimate when three or more tiles of one line are mutually reversed.
pub fn pairwise_conflicts(board: &Board, state: State) -> u16 {
    let mut result = 0;
    for_each_line(board, state, |line| result += reversed_pairs(line));
    2 * result
}

/// Manhattan distance plus linear conflicts.
#[derive(Clone)]
pub struct LinearConflict {
    manhattan: Manhattan,
    board: Board
}

impl LinearConflict {
    pub fn new(board: &Board) -> Self { Self { manhattan: Manhattan::new(board), board: board.clone() } }
}

impl Heuristic for LinearConflict {
    fn evaluate(&self, state: State) -> u16 {
        self.manhattan.evaluate(state) + linear_conflicts(&self.board, state)
    }
}

/// Manhattan distance plus 2 for each reversed pair (see `pairwise_conflicts`).
/// Not admissible in general.
#[derive(Clone)]
pub struct PairwiseConflict {
    manhattan: Manhattan,
    board: Board
}

impl PairwiseConflict {
    pub fn new(board: &Board) -> Self { Self { manhattan: Manhattan::new(board), board: board.clone() } }
}

impl Heuristic for PairwiseConflict {
    fn evaluate(&self, state: State) -> u16 {
        self.manhattan.evaluate(state) + pairwise_conflicts(&self.board, state)
    }
}

/// Maximum of two heuristics. Admissible if both are.
#[derive(Clone, Copy, Debug)]
pub struct Max<A, B>(pub A, pub B);

impl<A: Heuristic, B: Heuristic> Heuristic for Max<A, B> {
    #[inline] fn evaluate(&self, state: State) -> u16 {
        self.0.evaluate(state).max(self.1.evaluate(state))
    }
}

/// Tiles of the pattern database used by `HeuristicKind::PatternDb`.
/// Tiles that do not fit the board are left out.
pub const DEFAULT_PATTERN_TILES: [u8; 4] = [1, 2, 3, 4];

/// Heuristics that can be selected by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeuristicKind {
    Misplaced,
    Manhattan,
    LinearConflict,
    PairwiseConflict,
    Subset,
    PatternDb
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 6] = [
        HeuristicKind::Misplaced, HeuristicKind::Manhattan, HeuristicKind::LinearConflict,
        HeuristicKind::PairwiseConflict, HeuristicKind::Subset, HeuristicKind::PatternDb
    ];

    pub fn name(self) -> &'static str {
        match self {
            HeuristicKind::Misplaced => "misplaced",
            HeuristicKind::Manhattan => "manhattan",
            HeuristicKind::LinearConflict => "linear-conflict",
            HeuristicKind::PairwiseConflict => "pairwise-conflict",
            HeuristicKind::Subset => "subset",
            HeuristicKind::PatternDb => "pattern-db"
        }
    }

    /// Returns `false` for heuristics that may overestimate the distance to the goal.
    pub fn is_admissible(self) -> bool {
        self != HeuristicKind::PairwiseConflict
    }

    /// Heuristics compared by default: misplaced tiles, Manhattan distance, and then
    /// the tile subset for boards of odd side and linear conflicts for the others.
    pub fn defaults_for(board: &Board) -> [HeuristicKind; 3] {
        let third = if board.side() % 2 == 1 { HeuristicKind::Subset } else { HeuristicKind::LinearConflict };
        [HeuristicKind::Misplaced, HeuristicKind::Manhattan, third]
    }

    /// Constructs the heuristic for `board`.
    /// The pattern database is built by breadth-first search and combined with Manhattan distance.
    pub fn build(self, board: &Board) -> Result<Box<dyn Heuristic + Send + Sync>, HeuristicError> {
        Ok(match self {
            HeuristicKind::Misplaced => Box::new(MisplacedTiles::new(board)),
            HeuristicKind::Manhattan => Box::new(Manhattan::new(board)),
            HeuristicKind::LinearConflict => Box::new(LinearConflict::new(board)),
            HeuristicKind::PairwiseConflict => Box::new(PairwiseConflict::new(board)),
            HeuristicKind::Subset => Box::new(TileSubset::new(board, TileSubset::default_tiles(board))?),
            HeuristicKind::PatternDb => Box::new(Max(
                PatternDatabase::new(board, DEFAULT_PATTERN_TILES.into_iter().filter(|&t| t < board.board_size()))?,
                Manhattan::new(board)
            ))
        })
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HeuristicKind {
    type Err = HeuristicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        HeuristicKind::ALL.iter().copied()
            .find(|k| k.name() == s || k.name().replace('-', "_") == s)
            .ok_or(HeuristicError::UnknownHeuristic(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle_sliding16::board::{EIGHT_PUZZLE, FIFTEEN_PUZZLE};
    use crate::puzzle_sliding16::solvability::is_solvable;
    use rand::{SeedableRng, seq::SliceRandom};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_manhattan_32() {
        // 0, 1, 2
        // 3, 4, 5
        let metric = manhattan_metric(3, 2);
        assert_eq!(metric[0][0], 0);
        assert_eq!(metric[0][1], 1);    assert_eq!(metric[1][0], 1);
        assert_eq!(metric[0][2], 2);    assert_eq!(metric[2][0], 2);
        assert_eq!(metric[0][3], 1);    assert_eq!(metric[3][0], 1);
        assert_eq!(metric[0][4], 2);    assert_eq!(metric[4][0], 2);
        assert_eq!(metric[0][5], 3);    assert_eq!(metric[5][0], 3);
        assert_eq!(metric[1][1], 0);
        assert_eq!(metric[1][2], 1);    assert_eq!(metric[2][1], 1);
        assert_eq!(metric[1][3], 2);    assert_eq!(metric[3][1], 2);
        assert_eq!(metric[1][4], 1);    assert_eq!(metric[4][1], 1);
        assert_eq!(metric[1][5], 2);    assert_eq!(metric[5][1], 2);
        assert_eq!(metric[2][2], 0);
        assert_eq!(metric[2][3], 3);    assert_eq!(metric[3][2], 3);
        assert_eq!(metric[2][4], 2);    assert_eq!(metric[4][2], 2);
        assert_eq!(metric[2][5], 1);    assert_eq!(metric[5][2], 1);
        assert_eq!(metric[3][3], 0);
        assert_eq!(metric[3][4], 1);    assert_eq!(metric[4][3], 1);
        assert_eq!(metric[3][5], 2);    assert_eq!(metric[5][3], 2);
        assert_eq!(metric[4][4], 0);
        assert_eq!(metric[4][5], 1);    assert_eq!(metric[5][4], 1);
        assert_eq!(metric[5][5], 0);
    }

    #[test]
    fn test_values_33() {
        let board = &*EIGHT_PUZZLE;
        // 1 2 3
        // 4 _ 6
        // 7 5 8
        let state = State::from_rows(&[[1u8, 2, 3], [4, 0, 6], [7, 5, 8]]).unwrap();
        assert_eq!(MisplacedTiles::new(board).evaluate(state), 2);
        assert_eq!(Manhattan::new(board).evaluate(state), 2);
        assert_eq!(linear_conflicts(board, state), 0);
        assert_eq!(LinearConflict::new(board).evaluate(state), 2);
        assert_eq!(TileSubset::new(board, [1, 2, 3, 4]).unwrap().evaluate(state), 0);
        assert_eq!(TileSubset::new(board, [5]).unwrap().evaluate(state), 1);

        // 8 _ 6
        // 5 4 7
        // 2 3 1
        let state = State::from_rows(&[[8u8, 0, 6], [5, 4, 7], [2, 3, 1]]).unwrap();
        assert_eq!(MisplacedTiles::new(board).evaluate(state), 8);
        assert_eq!(Manhattan::new(board).evaluate(state), 19);  // 3+1+1+1+3+3+3+4
    }

    #[test]
    fn test_row_conflict_33() {
        let board = &*EIGHT_PUZZLE;
        // 2 1 3
        // 4 5 6
        // 7 8 _
        let state = State::from_rows(&[[2u8, 1, 3], [4, 5, 6], [7, 8, 0]]).unwrap();
        assert_eq!(Manhattan::new(board).evaluate(state), 2);
        assert_eq!(linear_conflicts(board, state), 2);
        assert_eq!(pairwise_conflicts(board, state), 2);
        assert_eq!(LinearConflict::new(board).evaluate(state), 4);
    }

    #[test]
    fn test_column_conflict_33() {
        let board = &*EIGHT_PUZZLE;
        // 7 2 3
        // 4 5 6
        // 1 8 _
        let state = State::from_rows(&[[7u8, 2, 3], [4, 5, 6], [1, 8, 0]]).unwrap();
        assert_eq!(Manhattan::new(board).evaluate(state), 4);
        // 7, 4, 1 in column 0 are all reversed
        assert_eq!(linear_conflicts(board, state), 4);
        assert_eq!(pairwise_conflicts(board, state), 6);
    }

    #[test]
    fn test_three_reversed_in_row_44() {
        let board = &*FIFTEEN_PUZZLE;
        let state = State::new(4, &[3, 2, 1, 4,  5, 6, 7, 8,  9, 10, 11, 12,  13, 14, 15, 0]).unwrap();
        assert_eq!(Manhattan::new(board).evaluate(state), 4);
        assert_eq!(linear_conflicts(board, state), 4);
        assert_eq!(pairwise_conflicts(board, state), 6);
        assert_eq!(LinearConflict::new(board).evaluate(state), 8);
        assert_eq!(PairwiseConflict::new(board).evaluate(state), 10);
    }

    #[test]
    fn test_goal_is_zero() {
        let small = Board::new(2).unwrap();
        for board in [&small, &*EIGHT_PUZZLE, &*FIFTEEN_PUZZLE] {
            for kind in HeuristicKind::ALL {
                assert_eq!(kind.build(board).unwrap().evaluate(board.goal()), 0, "{} on {}x{}", kind, board.side(), board.side());
            }
            assert_eq!(().evaluate(board.goal()), 0);
        }
    }

    #[test]
    fn test_pattern_db_on_small_board() {
        // 1 2
        // 3 _
        let board = Board::new(2).unwrap();
        let h = HeuristicKind::PatternDb.build(&board).unwrap();
        assert_eq!(h.evaluate(State::new(2, &[1, 2, 0, 3]).unwrap()), 1);
        assert_eq!(h.evaluate(State::new(2, &[0, 1, 3, 2]).unwrap()), 2);
        // all three tiles are in the pattern, so the distance is exact
        assert_eq!(h.evaluate(State::new(2, &[3, 1, 0, 2]).unwrap()), 3);
    }

    fn random_states(board: &Board, seed: u64, count: usize) -> Vec<State> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut tiles: Vec<u8> = (0..board.board_size()).collect();
        (0..count).map(|_| {
            tiles.shuffle(&mut rng);
            State::new(board.side(), &tiles).unwrap()
        }).collect()
    }

    #[test]
    fn test_dominance() {
        for board in [&*EIGHT_PUZZLE, &*FIFTEEN_PUZZLE] {
            let misplaced = MisplacedTiles::new(board);
            let manhattan = Manhattan::new(board);
            let linear = LinearConflict::new(board);
            let pairwise = PairwiseConflict::new(board);
            let subset = TileSubset::new(board, TileSubset::default_tiles(board)).unwrap();
            for state in random_states(board, 7 + board.side() as u64, 2000) {
                let m = manhattan.evaluate(state);
                assert!(misplaced.evaluate(state) <= m, "{:?}", state);
                assert!(m <= linear.evaluate(state), "{:?}", state);
                assert!(linear.evaluate(state) <= pairwise.evaluate(state), "{:?}", state);
                assert!(subset.evaluate(state) <= m, "{:?}", state);
                assert_eq!(linear.evaluate(state) % 2, m % 2);
            }
        }
    }

    #[test]
    fn test_heuristics_of_unsolvable_states_are_defined() {
        let board = &*EIGHT_PUZZLE;
        let h = HeuristicKind::Manhattan.build(board).unwrap();
        for state in random_states(board, 3, 100) {
            if !is_solvable(state).unwrap() {
                assert!(h.evaluate(state) > 0);
            }
        }
    }

    #[test]
    fn test_max() {
        let board = &*EIGHT_PUZZLE;
        let state = State::from_rows(&[[2u8, 1, 3], [4, 5, 6], [7, 8, 0]]).unwrap();
        let h = Max(Manhattan::new(board), LinearConflict::new(board));
        assert_eq!(h.evaluate(state), 4);
        let misplaced = MisplacedTiles::new(board);
        let h = Max((), &misplaced);
        assert_eq!(h.evaluate(state), 2);
    }

    #[test]
    fn test_subset_rejects_bad_tiles() {
        let board = &*EIGHT_PUZZLE;
        assert_eq!(TileSubset::new(board, [0]).err(), Some(HeuristicError::InvalidPatternTile { tile: 0, cells: 9 }));
        assert_eq!(TileSubset::new(board, [2, 2]).err(), Some(HeuristicError::DuplicatePatternTile(2)));
        assert_eq!(TileSubset::default_tiles(board).collect::<Vec<_>>(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_kind_names() {
        for kind in HeuristicKind::ALL {
            assert_eq!(kind.name().parse::<HeuristicKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.name());
        }
        assert_eq!("Linear_Conflict".parse::<HeuristicKind>(), Ok(HeuristicKind::LinearConflict));
        assert_eq!("h4".parse::<HeuristicKind>(), Err(HeuristicError::UnknownHeuristic("h4".to_string())));
        assert_eq!(HeuristicKind::defaults_for(&EIGHT_PUZZLE)[2], HeuristicKind::Subset);
        assert_eq!(HeuristicKind::defaults_for(&FIFTEEN_PUZZLE)[2], HeuristicKind::LinearConflict);
        assert!(!HeuristicKind::PairwiseConflict.is_admissible());
    }
}
