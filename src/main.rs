use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use auto_2048::config::Config;
use auto_2048::engine::{Board, Move};
use auto_2048::game::{GameOutcome, RunResult};
use auto_2048::sim::{self, Reporter, SimSummary};
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

#[derive(Debug, Parser)]
#[command(name = "auto-2048", version, about = "Play 2048 automatically with expectimax search")]
struct Args {
    /// TOML file with [search], [heuristic] and [simulation] sections
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of games to play
    #[arg(long)]
    runs: Option<u32>,

    /// Per-game move cap
    #[arg(long)]
    move_limit: Option<u32>,

    /// Search depth in player moves
    #[arg(long)]
    depth: Option<u32>,

    /// Base RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Play runs concurrently (implies --quiet)
    #[arg(long)]
    parallel: bool,

    /// Disable the transposition table
    #[arg(long)]
    no_cache: bool,

    /// Show a progress bar instead of printing every board
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cfg = load_config(&args)?;
    let search = cfg.search_config();
    let opts = &cfg.simulation;
    let quiet = args.quiet || opts.parallel;

    let reporter = Console::new(quiet, opts.runs)?;
    let start = Instant::now();
    println!();
    let summary = sim::run_simulation(opts, &search, &reporter)?;
    if let Some(pb) = &reporter.progress {
        pb.finish_and_clear();
    }
    info!("simulation finished in {:.1}s", start.elapsed().as_secs_f64());
    print_summary(&summary, quiet);
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut cfg = match &args.config {
        Some(path) => Config::from_toml(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(runs) = args.runs { cfg.simulation.runs = runs; }
    if let Some(limit) = args.move_limit { cfg.simulation.move_limit = limit; }
    if let Some(depth) = args.depth { cfg.search.max_depth = depth; }
    if args.seed.is_some() { cfg.simulation.seed = args.seed; }
    if args.parallel { cfg.simulation.parallel = true; }
    if args.no_cache { cfg.search.cache_enabled = false; }
    cfg.validate()?;
    Ok(cfg)
}

/// Prints every board, or drives a progress bar when quiet.
struct Console {
    progress: Option<ProgressBar>,
}

impl Console {
    fn new(quiet: bool, runs: u32) -> anyhow::Result<Self> {
        let progress = if quiet {
            let pb = ProgressBar::new(runs as u64);
            pb.set_style(
                ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:30}] {pos}/{len} runs | {msg}")?
                    .progress_chars("=> ")
                    .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
            );
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        } else {
            None
        };
        Ok(Self { progress })
    }
}

impl Reporter for Console {
    fn run_started(&self, run: u32, board: Board) {
        if self.progress.is_none() {
            println!("Run {}:", run + 1);
            println!("Initial game board:\n{board}{}", "-".repeat(20));
        }
    }

    fn on_move(&self, _run: u32, move_number: u32, dir: Move, board: Board) {
        if self.progress.is_none() {
            println!("Move {move_number}: {dir}\n{board}{}", "-".repeat(20));
        }
    }

    fn run_finished(&self, run: u32, result: &RunResult) {
        match &self.progress {
            Some(pb) => {
                pb.inc(1);
                pb.set_message(format!("last: run {} max tile {}", run + 1, result.max_tile));
            }
            None => {
                // The board rendering already ends with a newline.
                print!("Final Board:\n{}", result.final_board);
                if result.outcome == GameOutcome::MoveLimitReached {
                    println!("Move limit reached after {} moves", result.moves);
                }
                println!("Max Tile Reached: {}", result.max_tile);
                println!("{}", "=".repeat(30));
            }
        }
    }
}

fn print_summary(summary: &SimSummary, quiet: bool) {
    if !quiet {
        println!("\n{}", "=".repeat(30));
    }
    println!("Scores from each run:");
    for (i, r) in summary.results.iter().enumerate() {
        let note = match r.outcome {
            GameOutcome::GameOver => "",
            GameOutcome::MoveLimitReached => " (move limit reached)",
        };
        println!("Run {}: Max Tile = {} | moves = {} | score = {}{}", i + 1, r.max_tile, r.moves, r.score, note);
    }
    println!("\nMax tile distribution:");
    for (tile, count) in summary.tile_counts.iter().rev() {
        println!("  {tile:>6}: {count} run(s), reached by {:.0}%", summary.reach_rate(*tile) * 100.0);
    }
    println!("Mean moves: {:.1} | mean score: {:.0}", summary.mean_moves, summary.mean_score);
    println!(
        "States considered: {} | max for a move: {} | cache hits: {}",
        summary.total_nodes, summary.peak_nodes, summary.cache_hits
    );
    println!(
        "\nHighest Tile Reached After {} Runs: {}\n",
        summary.results.len(),
        summary.highest_tile
    );
}
