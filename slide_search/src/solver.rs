use crate::error::SearchError;
use crate::puzzle_sliding16::board::Board;
use crate::puzzle_sliding16::heuristic::Heuristic;
use crate::puzzle_sliding16::neighbors::{Move, expand};
use crate::puzzle_sliding16::state::State;
use crate::stats::{SearchStats, SearchStatsCollector};
use log::{Level, debug, log_enabled, trace, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, VecDeque};

/// Result of a successful search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Number of nodes popped from the open set, the goal included.
    pub steps: u64,
    /// Number of successors generated.
    pub nodes_expanded: u64,
    /// Number of moves from the start to the goal.
    pub cost: u16
}

/// Entry of the search arena.
#[derive(Clone, Copy)]
struct Node {
    state: State,
    /// Index of the node from which this one was generated.
    parent: Option<usize>,
    last_move: Option<Move>,
    /// Distance from the start (g).
    cost: u16,
    /// Cell occupied by the blank.
    blank: u8
}

/// Returns the moves leading from the start to `arena[index]`.
fn moves_to(arena: &[Node], mut index: usize) -> String {
    let mut moves = Vec::new();
    while let Node { parent: Some(parent), last_move: Some(m), .. } = arena[index] {
        moves.push(m.to_char());
        index = parent;
    }
    moves.iter().rev().collect()
}

/// A* solver for the given board, guided by heuristic `H`.
///
/// The open set is ordered by `f = g + h` and among nodes of equal `f` by insertion order (first in, first out).
/// A successor is pushed only if its state is new or reached by a path shorter than recorded before,
/// so the same state can be popped more than once.
pub struct AStarSolver<'b, H> {
    board: &'b Board,
    heuristic: H
}

impl<'b, H: Heuristic> AStarSolver<'b, H> {
    pub fn new(board: &'b Board, heuristic: H) -> Self {
        Self { board, heuristic }
    }

    #[inline] pub fn board(&self) -> &'b Board { self.board }

    #[inline] pub fn heuristic(&self) -> &H { &self.heuristic }

    /// Searches for the goal starting from `start`.
    pub fn solve(&self, start: State) -> Result<Solution, SearchError> {
        self.solve_stats(start, &mut ())
    }

    /// Searches for the goal starting from `start`, notifying `stats` about each pop and each generated node.
    /// Returns `SearchError::BudgetExceeded` if `stats` cancels the search.
    pub fn solve_stats(&self, start: State, stats: &mut impl SearchStatsCollector) -> Result<Solution, SearchError> {
        self.board.check(start)?;
        let blank = start.blank_cell()?;
        let start_h = self.heuristic.evaluate(start);
        debug!("A* search from {:?}, h = {}", start, start_h);

        let mut counters = SearchStats::default();
        let mut arena = vec![Node { state: start, parent: None, last_move: None, cost: 0, blank }];
        let mut best_cost = FxHashMap::<State, u16>::default();
        best_cost.insert(start, 0);
        let mut open = BinaryHeap::new();
        let mut sequence = 0u64;
        open.push(Reverse((start_h as u32, sequence, 0usize)));

        while let Some(Reverse((f, _, index))) = open.pop() {
            if !stats.pop() {
                warn!("A* search from {:?} stopped by budget after {} steps and {} generated nodes",
                    start, counters.steps, counters.nodes_expanded);
                return Err(SearchError::BudgetExceeded { steps: counters.steps, nodes_expanded: counters.nodes_expanded });
            }
            counters.steps += 1;
            let node = arena[index];
            if self.board.is_goal(node.state) {
                debug!("goal reached at cost {} after {} steps and {} generated nodes",
                    node.cost, counters.steps, counters.nodes_expanded);
                if log_enabled!(Level::Trace) {
                    trace!("moves: {}", moves_to(&arena, index));
                }
                return Ok(Solution { steps: counters.steps, nodes_expanded: counters.nodes_expanded, cost: node.cost });
            }
            trace!("pop {:?}, f = {}, g = {}", node.state, f, node.cost);
            for successor in expand(self.board.neighbors(), node.state, node.blank) {
                stats.generated();
                counters.nodes_expanded += 1;
                let cost = node.cost + 1;
                match best_cost.entry(successor.state) {
                    Entry::Occupied(mut recorded) => {
                        if cost >= *recorded.get() { continue; }
                        trace!("shorter path to {:?}: {} instead of {}", successor.state, cost, recorded.get());
                        recorded.insert(cost);
                    }
                    Entry::Vacant(v) => { v.insert(cost); }
                }
                let f = cost as u32 + self.heuristic.evaluate(successor.state) as u32;
                arena.push(Node {
                    state: successor.state,
                    parent: Some(index),
                    last_move: Some(successor.last_move),
                    cost,
                    blank: successor.blank
                });
                sequence += 1;
                open.push(Reverse((f, sequence, arena.len() - 1)));
            }
        }
        debug!("open set exhausted after {} steps and {} generated nodes, goal is unreachable from {:?}",
            counters.steps, counters.nodes_expanded, start);
        Err(SearchError::Unsolvable { steps: counters.steps, nodes_expanded: counters.nodes_expanded })
    }
}

/// Solves `start` on `board` by A* guided by `heuristic`.
pub fn solve(board: &Board, start: State, heuristic: impl Heuristic) -> Result<Solution, SearchError> {
    AStarSolver::new(board, heuristic).solve(start)
}

/// Breadth-first search that counts steps and generated nodes the same way as `AStarSolver`.
/// Each state is enqueued at most once, so the cost found is optimal.
pub fn breadth_first(board: &Board, start: State) -> Result<Solution, SearchError> {
    board.check(start)?;
    let blank = start.blank_cell()?;
    let mut counters = SearchStats::default();
    let mut visited = FxHashSet::<State>::default();
    visited.insert(start);
    let mut queue = VecDeque::from([(start, blank, 0u16)]);
    while let Some((state, blank, cost)) = queue.pop_front() {
        counters.steps += 1;
        if board.is_goal(state) {
            return Ok(Solution { steps: counters.steps, nodes_expanded: counters.nodes_expanded, cost });
        }
        for successor in expand(board.neighbors(), state, blank) {
            counters.nodes_expanded += 1;
            if visited.insert(successor.state) {
                queue.push_back((successor.state, successor.blank, cost + 1));
            }
        }
    }
    Err(SearchError::Unsolvable { steps: counters.steps, nodes_expanded: counters.nodes_expanded })
}
