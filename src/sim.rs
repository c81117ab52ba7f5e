//! Repeated games and the aggregate summary.
//!
//! Each run owns its board, its RNG and its searcher, so runs can execute in
//! parallel (rayon) without sharing state. Individual searches stay
//! single-threaded.

use std::collections::BTreeMap;

use log::info;
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use serde::Deserialize;

use crate::engine::{Board, Move};
use crate::expectimax::{Expectimax, ExpectimaxConfig, SearchError};
use crate::game::{self, GameOutcome, RunResult};

/// Knobs for a batch of games; the `[simulation]` config section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimOptions {
    /// Number of games to play.
    pub runs: u32,
    /// Per-game move cap.
    pub move_limit: u32,
    /// Base seed; run `i` uses `seed + i`. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Play runs concurrently. Per-move callbacks still fire, in no particular order.
    pub parallel: bool,
}

impl Default for SimOptions {
    fn default() -> Self { Self { runs: 20, move_limit: game::DEFAULT_MOVE_LIMIT, seed: None, parallel: false } }
}

/// Observer for simulation progress. All methods default to no-ops.
///
/// Run indices are zero-based.
pub trait Reporter: Sync {
    fn run_started(&self, _run: u32, _board: Board) {}
    fn on_move(&self, _run: u32, _move_number: u32, _dir: Move, _board: Board) {}
    fn run_finished(&self, _run: u32, _result: &RunResult) {}
}

/// Reporter that ignores everything.
pub struct Silent;

impl Reporter for Silent {}

/// Aggregate of a finished simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimSummary {
    pub results: Vec<RunResult>,
    pub highest_tile: u32,
    /// How many runs finished with each max tile.
    pub tile_counts: BTreeMap<u32, usize>,
    pub mean_moves: f64,
    pub mean_score: f64,
    pub move_limit_hits: usize,
    /// Search nodes visited across all runs.
    pub total_nodes: u64,
    /// Most nodes visited for any single move.
    pub peak_nodes: u64,
    pub cache_hits: u64,
}

impl SimSummary {
    pub fn from_results(results: Vec<RunResult>) -> Self {
        let n = results.len().max(1) as f64;
        let highest_tile = results.iter().map(|r| r.max_tile).max().unwrap_or(0);
        let tile_counts = results.iter().fold(BTreeMap::new(), |mut counts, r| {
            *counts.entry(r.max_tile).or_insert(0) += 1;
            counts
        });
        let mean_moves = results.iter().map(|r| r.moves as f64).sum::<f64>() / n;
        let mean_score = results.iter().map(|r| r.score as f64).sum::<f64>() / n;
        let move_limit_hits = results.iter().filter(|r| r.outcome == GameOutcome::MoveLimitReached).count();
        let total_nodes = results.iter().map(|r| r.nodes).sum();
        let peak_nodes = results.iter().map(|r| r.peak_nodes).max().unwrap_or(0);
        let cache_hits = results.iter().map(|r| r.cache_hits).sum();
        Self {
            results,
            highest_tile,
            tile_counts,
            mean_moves,
            mean_score,
            move_limit_hits,
            total_nodes,
            peak_nodes,
            cache_hits,
        }
    }

    /// Fraction of runs whose max tile reached at least `tile`.
    pub fn reach_rate(&self, tile: u32) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.results.iter().filter(|r| r.max_tile >= tile).count() as f64 / self.results.len() as f64
    }
}

/// Play `opts.runs` games and summarise them.
///
/// ```
/// use auto_2048::expectimax::ExpectimaxConfig;
/// use auto_2048::sim::{run_simulation, SimOptions, Silent};
///
/// let opts = SimOptions { runs: 2, move_limit: 20, seed: Some(1), parallel: false };
/// let search = ExpectimaxConfig { max_depth: 0, ..Default::default() };
/// let summary = run_simulation(&opts, &search, &Silent).unwrap();
/// assert_eq!(summary.results.len(), 2);
/// ```
pub fn run_simulation<P: Reporter>(
    opts: &SimOptions,
    search: &ExpectimaxConfig,
    reporter: &P,
) -> Result<SimSummary, SearchError> {
    search.validate()?;
    info!(
        "starting {} run(s): depth={} move_limit={} seed={:?} parallel={}",
        opts.runs, search.max_depth, opts.move_limit, opts.seed, opts.parallel
    );
    let results = if opts.parallel {
        (0..opts.runs)
            .into_par_iter()
            .map(|run| play_run(run, opts, search, reporter))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        (0..opts.runs).try_fold(Vec::with_capacity(opts.runs as usize), |mut acc, run| {
            acc.push(play_run(run, opts, search, reporter)?);
            Ok::<_, SearchError>(acc)
        })?
    };
    Ok(SimSummary::from_results(results))
}

fn play_run<P: Reporter>(
    run: u32,
    opts: &SimOptions,
    search: &ExpectimaxConfig,
    reporter: &P,
) -> Result<RunResult, SearchError> {
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run as u64)),
        None => StdRng::from_entropy(),
    };
    let mut searcher = Expectimax::with_config(search.clone())?;
    let start = Board::new_game(&mut rng);
    reporter.run_started(run, start);
    let result = game::play_from(start, &mut searcher, &mut rng, opts.move_limit, |n, dir, board| {
        reporter.on_move(run, n, dir, board)
    });
    info!("run {} finished: max tile {} in {} moves", run + 1, result.max_tile, result.moves);
    reporter.run_finished(run, &result);
    Ok(result)
}
