//! Expectimax search policy for 2048.
//!
//! - [`Heuristic`]: weighted board evaluation used at the search frontier.
//! - [`Expectimax`]: single-threaded depth-limited expectimax.
//!
//! Depth convention: one unit of depth is one player move. The chance layer
//! (tile spawns) that follows each move does not consume depth. With
//! `max_depth = 0` the root scores each legal move by the heuristic value of
//! the board it produces, with no spawn averaging.
//!
//! The search is deterministic; randomness only occurs when a game applies
//! moves with `Board::make_move` or `Board::spawn_tile`.
//!
//! Quick start
//! ```
//! use auto_2048::engine::Board;
//! use auto_2048::expectimax::{Expectimax, ExpectimaxConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let b0 = Board::new_game(&mut rng);
//!
//! let cfg = ExpectimaxConfig { max_depth: 1, ..Default::default() };
//! let mut ex = Expectimax::with_config(cfg).unwrap();
//! let m = ex.choose_move(b0).unwrap();
//! assert!(b0.available_moves().contains(&m));
//! ```

use serde::Deserialize;

use crate::engine::{self, Move};

mod heuristic;
mod search;

pub use heuristic::{Heuristic, HeuristicBreakdown, HeuristicWeights};
pub use search::Expectimax;

/// Deepest search the engine accepts. Work grows roughly 100x per level.
pub const MAX_SEARCH_DEPTH: u32 = 8;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// No move changes the board; the game is over.
    #[error("no moves available")]
    NoMovesAvailable,
    #[error("search depth {depth} exceeds the maximum of {max}")]
    DepthOutOfRange { depth: u32, max: u32 },
}

/// Configurable knobs for Expectimax.
///
/// - `max_depth`: player moves to look ahead (default 3).
/// - `cache_enabled`: enable/disable the per-call transposition table.
/// - `weights`: heuristic weights, read from the `[heuristic]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpectimaxConfig {
    pub max_depth: u32,
    pub cache_enabled: bool,
    #[serde(skip)]
    pub weights: HeuristicWeights,
}

impl Default for ExpectimaxConfig {
    fn default() -> Self {
        Self { max_depth: 3, cache_enabled: true, weights: HeuristicWeights::default() }
    }
}

impl ExpectimaxConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_depth > MAX_SEARCH_DEPTH {
            return Err(SearchError::DepthOutOfRange { depth: self.max_depth, max: MAX_SEARCH_DEPTH });
        }
        Ok(())
    }
}

/// Per-branch expected value at the root.
///
/// - `ev` is the expected value for taking `dir` from the current board.
/// - `legal` is false when the move is a no-op for the current board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Move,
    pub ev: f64,
    pub legal: bool,
}

/// Basic search stats for a single top-level call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cache_hits: u64,
    pub peak_nodes: u64,
}

/// Build engine and heuristic tables up front so the first search is not
/// charged for them.
fn warm_engine_and_heuristics() {
    engine::init_tables();
    heuristic::warm();
}
