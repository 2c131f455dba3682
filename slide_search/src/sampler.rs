use crate::error::SampleError;
use crate::puzzle_sliding16::board::Board;
use crate::puzzle_sliding16::neighbors::Move;
use crate::puzzle_sliding16::solvability::is_solvable;
use crate::puzzle_sliding16::state::State;
use crate::puzzle_sliding16::utils::DENIED;
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;

/// Number of moves of the random walk used by default.
pub const DEFAULT_WALK_LENGTH: usize = 10;

/// Number of candidate draws allowed per requested sample by default.
pub const DEFAULT_ATTEMPTS_PER_SAMPLE: u64 = 1000;

/// Way of drawing candidate states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Moves the blank `length` times from the goal.
    /// Unless `allow_undo` is set, a move never reverses the previous one.
    RandomWalk { length: usize, allow_undo: bool },
    /// Shuffles all tiles and rejects the arrangements that are not solvable.
    FilteredShuffle
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplerConfig {
    pub strategy: Strategy,
    /// The sampler gives up after `attempts_per_sample * count` candidate draws.
    pub attempts_per_sample: u64
}

impl SamplerConfig {
    /// Returns configuration that shuffles boards of odd side and walks `walk_length` moves on the others.
    pub fn for_board(board: &Board, walk_length: usize) -> Self {
        let strategy = if board.side() % 2 == 1 { Strategy::FilteredShuffle } else { Strategy::RandomWalk { length: walk_length, allow_undo: false } };
        Self { strategy, ..Default::default() }
    }

    /// Lets random walks undo their previous move, so every neighbor of the blank is equally likely.
    /// Has no effect on other strategies.
    pub fn with_undo(mut self, allow: bool) -> Self {
        if let Strategy::RandomWalk { allow_undo, .. } = &mut self.strategy { *allow_undo = allow; }
        self
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { strategy: Strategy::RandomWalk { length: DEFAULT_WALK_LENGTH, allow_undo: false }, attempts_per_sample: DEFAULT_ATTEMPTS_PER_SAMPLE }
    }
}

/// Generates distinct solvable states of a board.
pub struct Sampler<'b> {
    board: &'b Board,
    config: SamplerConfig
}

impl<'b> Sampler<'b> {
    pub fn new(board: &'b Board, config: SamplerConfig) -> Self {
        Self { board, config }
    }

    #[inline] pub fn config(&self) -> &SamplerConfig { &self.config }

    /// Returns the state reached by `length` random moves of the blank from the goal.
    fn random_walk(&self, length: usize, allow_undo: bool, rng: &mut impl Rng) -> State {
        let mut state = self.board.goal();
        let mut blank = self.board.goal_cell(0);
        let mut previous: Option<Move> = None;
        let mut done = 0;
        while done < length {
            let Some(&m) = Move::ALL.choose(rng) else { break };
            let target = self.board.neighbors()[blank as usize][m as usize];
            if target == DENIED || (!allow_undo && previous == Some(m.opposite())) { continue; }
            state.move_blank(blank, target);
            blank = target;
            previous = Some(m);
            done += 1;
        }
        state
    }

    /// Returns a shuffled arrangement of the board or `None` if it is not solvable.
    fn filtered_shuffle(&self, tiles: &mut [u8], rng: &mut impl Rng) -> Result<Option<State>, SampleError> {
        tiles.shuffle(rng);
        let state = State::new(self.board.side(), tiles)?;
        Ok(is_solvable(state)?.then_some(state))
    }

    /// Returns `count` distinct solvable states, in order of drawing.
    pub fn generate_samples(&self, count: usize, rng: &mut impl Rng) -> Result<Vec<State>, SampleError> {
        let available = self.board.solvable_states();
        if count as u64 > available {
            return Err(SampleError::TooManySamples { requested: count, available });
        }
        let max_attempts = self.config.attempts_per_sample.saturating_mul(count as u64);
        let mut tiles: Vec<u8> = (0..self.board.board_size()).collect();
        let mut seen = FxHashSet::default();
        let mut samples = Vec::with_capacity(count);
        let mut attempts = 0u64;
        while samples.len() < count {
            if attempts == max_attempts {
                return Err(SampleError::Stalled { requested: count, collected: samples.len(), attempts });
            }
            attempts += 1;
            let candidate = match self.config.strategy {
                Strategy::RandomWalk { length, allow_undo } => Some(self.random_walk(length, allow_undo, rng)),
                Strategy::FilteredShuffle => self.filtered_shuffle(&mut tiles, rng)?
            };
            if let Some(state) = candidate {
                if seen.insert(state) { samples.push(state); }
            }
        }
        debug!("{} samples of {}x{} board drawn by {:?} in {} attempts",
            count, self.board.side(), self.board.side(), self.config.strategy, attempts);
        Ok(samples)
    }
}

/// Returns `count` distinct solvable states of `board`, obtained by shuffling boards of odd side
/// and by random walks of `walk_length` moves on the others.
pub fn generate_samples(board: &Board, count: usize, walk_length: usize, rng: &mut impl Rng) -> Result<Vec<State>, SampleError> {
    Sampler::new(board, SamplerConfig::for_board(board, walk_length)).generate_samples(count, rng)
}
