#![doc = include_str!("../README.md")]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cpu_time::ThreadTime;
use env_logger::Env;
use fsum::FSum;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use slide_search::sampler::DEFAULT_WALK_LENGTH;
use slide_search::{AStarSolver, Board, Budget, EIGHT_PUZZLE, FIFTEEN_PUZZLE, Heuristic, HeuristicKind, Sampler, SamplerConfig, SearchError, Solution, State};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Puzzle {
    /// 3x3 board
    Eight,
    /// 4x4 board
    Fifteen
}

impl Puzzle {
    fn board(self) -> &'static Board {
        match self {
            Puzzle::Eight => &*EIGHT_PUZZLE,
            Puzzle::Fifteen => &*FIFTEEN_PUZZLE
        }
    }
}

/// Compares A* heuristics on random, solvable sliding-tile puzzles.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(short, long, value_enum, default_value_t = Puzzle::Eight)]
    puzzle: Puzzle,

    /// Number of distinct start states.
    #[arg(short = 'n', long, default_value_t = 100)]
    samples: usize,

    /// Number of random moves from the goal used to draw start states of the 15-puzzle.
    #[arg(short, long, default_value_t = DEFAULT_WALK_LENGTH)]
    walk_length: usize,

    /// Let random walks undo their previous move.
    #[arg(long)]
    allow_undo: bool,

    /// Seed of the random number generator; drawn at random if not given.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Heuristic to test (can be repeated): misplaced, manhattan, linear-conflict, pairwise-conflict, subset, pattern-db.
    #[arg(long = "heuristic", value_name = "NAME")]
    heuristics: Vec<HeuristicKind>,

    /// Stop each search after generating this many nodes.
    #[arg(long)]
    node_budget: Option<u64>,

    /// Stop each search after this many milliseconds.
    #[arg(long)]
    time_budget_ms: Option<u64>,

    /// Search different start states in parallel.
    #[arg(long)]
    parallel: bool,

    /// Print results for each start state.
    #[arg(long)]
    details: bool
}

impl Args {
    fn budget(&self) -> Budget {
        let mut budget = Budget::unlimited();
        budget.max_nodes = self.node_budget;
        if let Some(ms) = self.time_budget_ms {
            budget = budget.and_time_limit(Duration::from_millis(ms));
        }
        budget
    }

    fn sampler_config(&self, board: &Board) -> SamplerConfig {
        SamplerConfig::for_board(board, self.walk_length).with_undo(self.allow_undo)
    }
}

/// Outcome of a search from one start state.
struct CaseResult {
    outcome: Result<Solution, SearchError>,
    /// CPU time of the search.
    seconds: f64
}

/// Results of all start states for one heuristic.
struct HeuristicResults {
    kind: HeuristicKind,
    cases: Vec<CaseResult>,
    build_seconds: f64
}

/// Optimal cost found by the first admissible heuristic that solved the state.
struct TestStateSolution {
    who_solved: HeuristicKind,
    cost: u16
}

// https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance
fn sdev(sum: u64, sqrsum: u64, n: u64) -> f64 {
    if n < 2 { return 0.0; }
    ((sqrsum as f64 - (sum as f64 * sum as f64) / n as f64) / (n-1) as f64).sqrt()
}

fn one_line(state: State) -> String {
    state.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
}

fn run_case<H: Heuristic>(solver: &AStarSolver<H>, start: State, args: &Args) -> Result<CaseResult> {
    let start_moment = ThreadTime::try_now().context("getting thread CPU time failed")?;
    let outcome = solver.solve_stats(start, &mut args.budget());
    let seconds = start_moment.try_elapsed().context("getting thread CPU time failed")?.as_secs_f64();
    Ok(CaseResult { outcome, seconds })
}

fn run_heuristic(kind: HeuristicKind, board: &Board, samples: &[State], args: &Args) -> Result<HeuristicResults> {
    let build_start = Instant::now();
    let heuristic = kind.build(board).with_context(|| format!("building {} heuristic failed", kind))?;
    let build_seconds = build_start.elapsed().as_secs_f64();
    debug!("{} heuristic built in {:.3} sec", kind, build_seconds);
    let solver = AStarSolver::new(board, heuristic);
    let cases = if args.parallel {
        samples.par_iter().map(|s| run_case(&solver, *s, args)).collect::<Result<Vec<_>>>()?
    } else {
        samples.iter().map(|s| run_case(&solver, *s, args)).collect::<Result<Vec<_>>>()?
    };
    Ok(HeuristicResults { kind, cases, build_seconds })
}

/// Checks that all admissible heuristics found solutions of the same cost.
fn check_costs(samples: &[State], results: &[HeuristicResults]) {
    let mut solutions: Vec<Option<TestStateSolution>> = samples.iter().map(|_| None).collect();
    for r in results.iter().filter(|r| r.kind.is_admissible()) {
        for ((start, case), solution) in samples.iter().zip(&r.cases).zip(solutions.iter_mut()) {
            let Ok(found) = &case.outcome else { continue };
            if let Some(solution) = solution {
                if found.cost != solution.cost {
                    warn!("{}: wrong cost for state {}: {} (got) != {} (by {})",
                        r.kind, one_line(*start), found.cost, solution.cost, solution.who_solved);
                }
            } else {
                *solution = Some(TestStateSolution { who_solved: r.kind, cost: found.cost });
            }
        }
    }
}

fn print_details(samples: &[State], results: &[HeuristicResults]) {
    print!("#\tstart");
    for r in results { print!("\t{} steps\t{} nodes\t{} cost", r.kind, r.kind, r.kind); }
    println!();
    for (index, start) in samples.iter().enumerate() {
        print!("{}\t{}", index, one_line(*start));
        for r in results {
            match &r.cases[index].outcome {
                Ok(s) => print!("\t{}\t{}\t{}", s.steps, s.nodes_expanded, s.cost),
                Err(SearchError::BudgetExceeded { steps, nodes_expanded }) => print!("\t{}\t{}\t-", steps, nodes_expanded),
                Err(_) => print!("\t-\t-\t-")
            }
        }
        println!();
    }
}

fn print_summary(results: &[HeuristicResults]) {
    println!("heuristic\tsolved\tover budget\tsteps/case\tsteps sdev\tnodes/case\tnodes sdev\tcost/case\tsec/case\tbuild sec");
    for r in results {
        let solved: Vec<&Solution> = r.cases.iter().filter_map(|c| c.outcome.as_ref().ok()).collect();
        let over_budget = r.cases.iter().filter(|c| matches!(c.outcome, Err(SearchError::BudgetExceeded { .. }))).count();
        let n = solved.len() as u64;
        let (mut steps, mut steps_sqr, mut nodes, mut nodes_sqr, mut cost) = (0u64, 0u64, 0u64, 0u64, 0u64);
        for s in &solved {
            steps += s.steps; steps_sqr += s.steps * s.steps;
            nodes += s.nodes_expanded; nodes_sqr += s.nodes_expanded * s.nodes_expanded;
            cost += s.cost as u64;
        }
        let per_case = |v: u64| if n == 0 { 0.0 } else { v as f64 / n as f64 };
        let seconds = FSum::with_all(r.cases.iter().map(|c| c.seconds)).value();
        println!("{}\t{}\t{}\t{:.1}\t{:.1}\t{:.1}\t{:.1}\t{:.2}\t{:.6}\t{:.3}",
            r.kind, n, over_budget,
            per_case(steps), sdev(steps, steps_sqr, n),
            per_case(nodes), sdev(nodes, nodes_sqr, n),
            per_case(cost),
            if r.cases.is_empty() { 0.0 } else { seconds / r.cases.len() as f64 },
            r.build_seconds);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let board = args.puzzle.board();
    let seed = args.seed.unwrap_or_else(rand::random);
    let kinds = if args.heuristics.is_empty() { HeuristicKind::defaults_for(board).to_vec() } else { args.heuristics.clone() };
    info!("{}x{} board, {} samples, seed {}, heuristics: {}", board.side(), board.side(), args.samples, seed,
        kinds.iter().map(|k| k.name()).collect::<Vec<_>>().join(", "));

    let samples = Sampler::new(board, args.sampler_config(board))
        .generate_samples(args.samples, &mut ChaCha8Rng::seed_from_u64(seed))
        .context("drawing start states failed")?;

    let mut results = Vec::with_capacity(kinds.len());
    for kind in kinds {
        info!("---=== run {} ===---", kind);
        let r = run_heuristic(kind, board, &samples, &args)?;
        for (start, case) in samples.iter().zip(&r.cases) {
            if let Err(e) = &case.outcome {
                if !matches!(e, SearchError::BudgetExceeded { .. }) {
                    warn!("{}: no solution for {}: {}", kind, one_line(*start), e);
                }
            }
        }
        results.push(r);
    }

    check_costs(&samples, &results);
    if args.details { print_details(&samples, &results); }
    print_summary(&results);
    Ok(())
}
