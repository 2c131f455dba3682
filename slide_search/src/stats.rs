use std::ops::AddAssign;
use std::time::{Duration, Instant};

/// Search statistic collector.
/// It collects data during A* search and can stop it.
pub trait SearchStatsCollector {
    /// Called before each node is popped from the open set, can return false to cancel search process.
    #[inline(always)] fn pop(&mut self) -> bool { true }
    /// Called for each successor generated.
    #[inline(always)] fn generated(&mut self) { }
}

/// Search statistic collector that ignore all events.
impl SearchStatsCollector for () {}

/// Counts all events.
impl SearchStatsCollector for u64 {
    #[inline(always)] fn pop(&mut self) -> bool { *self += 1; true }
    #[inline(always)] fn generated(&mut self) { *self += 1; }
}

/// Number of pops (`steps`) and successors generated (`nodes_expanded`).
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchStats {
    pub steps: u64,
    pub nodes_expanded: u64
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.steps += rhs.steps;
        self.nodes_expanded += rhs.nodes_expanded;
    }
}

impl SearchStatsCollector for SearchStats {
    #[inline(always)] fn pop(&mut self) -> bool { self.steps += 1; true }
    #[inline(always)] fn generated(&mut self) { self.nodes_expanded += 1; }
}

/// Collects `SearchStats` and cancels the search when the number of generated nodes
/// reaches `max_nodes` or when `deadline` passes.
#[derive(Clone, Copy, Debug)]
pub struct Budget {
    pub stats: SearchStats,
    pub max_nodes: Option<u64>,
    pub deadline: Option<Instant>
}

impl Budget {
    pub fn unlimited() -> Self { Self { stats: Default::default(), max_nodes: None, deadline: None } }

    pub fn with_node_limit(max_nodes: u64) -> Self { Self { max_nodes: Some(max_nodes), ..Self::unlimited() } }

    /// Returns budget whose deadline passes `time_limit` from now.
    pub fn with_time_limit(time_limit: Duration) -> Self { Self::unlimited().and_time_limit(time_limit) }

    /// Sets the deadline to pass `time_limit` from now.
    pub fn and_time_limit(mut self, time_limit: Duration) -> Self {
        self.deadline = Some(Instant::now() + time_limit);
        self
    }

    /// Zeroes the statistics and moves the deadline (if any) to `time_limit` from now.
    pub fn reset(&mut self, time_limit: Option<Duration>) {
        self.stats = Default::default();
        if let Some(time_limit) = time_limit {
            self.deadline = Some(Instant::now() + time_limit);
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_nodes.map_or(false, |m| self.stats.nodes_expanded >= m) ||
            self.deadline.map_or(false, |d| Instant::now() >= d)
    }
}

impl Default for Budget {
    fn default() -> Self { Self::unlimited() }
}

impl SearchStatsCollector for Budget {
    #[inline(always)] fn pop(&mut self) -> bool {
        if self.is_exhausted() { return false; }
        self.stats.steps += 1;
        true
    }

    #[inline(always)] fn generated(&mut self) { self.stats.nodes_expanded += 1; }
}
