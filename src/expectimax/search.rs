use std::collections::HashMap;

use log::debug;

use crate::engine::{Board, Move, Spawn, SIZE, SPAWN_TWO_PROB};

use super::{warm_engine_and_heuristics, BranchEval, ExpectimaxConfig, Heuristic, SearchError, SearchStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Node { Decision, Chance }

type TranspositionTable = HashMap<(Board, Node, u32), f64>;

const SPAWN_OUTCOMES: [(u32, f64); 2] = [(2, SPAWN_TWO_PROB), (4, 1.0 - SPAWN_TWO_PROB)];

/// Single-threaded Expectimax search.
///
/// Ties between equally valued moves go to the earliest move in
/// [`Move::ALL`] (up, down, left, right), so the chosen move is a pure
/// function of the board and the config.
pub struct Expectimax {
    cfg: ExpectimaxConfig,
    heuristic: Heuristic,
    stats: SearchStats,
}

impl Expectimax {
    pub fn new() -> Self {
        warm_engine_and_heuristics();
        let cfg = ExpectimaxConfig::default();
        Self { heuristic: Heuristic::new(cfg.weights), cfg, stats: SearchStats::default() }
    }

    pub fn with_config(cfg: ExpectimaxConfig) -> Result<Self, SearchError> {
        cfg.validate()?;
        warm_engine_and_heuristics();
        Ok(Self { heuristic: Heuristic::new(cfg.weights), cfg, stats: SearchStats::default() })
    }

    pub fn heuristic(&self) -> &Heuristic { &self.heuristic }

    /// Best move for `board`, or `NoMovesAvailable` when the game is over.
    ///
    /// ```
    /// use auto_2048::engine::Board;
    /// use auto_2048::expectimax::{Expectimax, ExpectimaxConfig, SearchError};
    /// let mut ex = Expectimax::with_config(ExpectimaxConfig { max_depth: 1, ..Default::default() }).unwrap();
    /// let stuck = Board::from_rows(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
    /// assert_eq!(ex.choose_move(stuck), Err(SearchError::NoMovesAvailable));
    /// ```
    pub fn choose_move(&mut self, board: Board) -> Result<Move, SearchError> {
        self.decide(board).0.ok_or(SearchError::NoMovesAvailable)
    }

    /// Root decision node: best move (if any) and its expected value.
    ///
    /// With no legal move the value is the heuristic of `board` itself.
    pub fn decide(&mut self, board: Board) -> (Option<Move>, f64) {
        let branches = self.branch_evals(board);
        let best = branches
            .iter()
            .filter(|b| b.legal)
            .fold(None, |best: Option<&BranchEval>, b| match best {
                Some(cur) if cur.ev >= b.ev => Some(cur),
                _ => Some(b),
            });
        let decision = match best {
            Some(b) => (Some(b.dir), b.ev),
            None => (None, self.heuristic.evaluate(board)),
        };
        debug!(
            "expectimax depth={} move={:?} value={:.3} nodes={} cache_hits={}",
            self.cfg.max_depth, decision.0, decision.1, self.stats.nodes, self.stats.cache_hits
        );
        decision
    }

    /// Expected value for each direction.
    ///
    /// Returns a fixed array in order: `[Up, Down, Left, Right]` and marks
    /// illegal moves as `legal=false` with `ev = 0.0`.
    pub fn branch_evals(&mut self, board: Board) -> [BranchEval; 4] {
        let heuristic = self.heuristic;
        let max_depth = self.cfg.max_depth;
        let mut walk = Walk::new(&heuristic, self.cfg.cache_enabled);
        let out = Move::ALL.map(|dir| match board.apply_move(dir) {
            (after, true) => {
                let ev = match max_depth {
                    0 => walk.leaf(after),
                    depth => walk.chance(after, depth - 1),
                };
                BranchEval { dir, ev, legal: true }
            }
            (_, false) => BranchEval { dir, ev: 0.0, legal: false },
        });
        self.record(&walk);
        out
    }

    /// Expected value at the root, equivalent to the best branch EV.
    pub fn state_value(&mut self, board: Board) -> f64 { self.decide(board).1 }

    /// Statistics collected from the last top-level call.
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    /// Reset accumulated stats to zero, e.g. at the start of a new game.
    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }

    fn record(&mut self, walk: &Walk<'_>) {
        self.stats.nodes = walk.nodes;
        self.stats.cache_hits = walk.cache_hits;
        self.stats.peak_nodes = self.stats.peak_nodes.max(walk.nodes);
    }
}

impl Default for Expectimax { fn default() -> Self { Self::new() } }

/// State for one top-level search: the transposition table and counters.
struct Walk<'h> {
    heuristic: &'h Heuristic,
    cache: Option<TranspositionTable>,
    nodes: u64,
    cache_hits: u64,
}

impl<'h> Walk<'h> {
    fn new(heuristic: &'h Heuristic, cache_enabled: bool) -> Self {
        Self { heuristic, cache: cache_enabled.then(HashMap::new), nodes: 0, cache_hits: 0 }
    }

    fn leaf(&mut self, board: Board) -> f64 {
        self.nodes += 1;
        self.heuristic.evaluate(board)
    }

    fn lookup(&mut self, key: (Board, Node, u32)) -> Option<f64> {
        let hit = self.cache.as_ref()?.get(&key).copied();
        if hit.is_some() {
            self.cache_hits += 1;
        }
        hit
    }

    fn store(&mut self, key: (Board, Node, u32), value: f64) {
        if let Some(cache) = self.cache.as_mut() {
            cache.insert(key, value);
        }
    }

    /// Player to move with `depth` moves left to look at.
    fn decision(&mut self, board: Board, depth: u32) -> f64 {
        if depth == 0 {
            return self.leaf(board);
        }
        let key = (board, Node::Decision, depth);
        if let Some(score) = self.lookup(key) {
            return score;
        }
        self.nodes += 1;
        let mut best = f64::NEG_INFINITY;
        for dir in Move::ALL {
            if let (after, true) = board.apply_move(dir) {
                best = best.max(self.chance(after, depth - 1));
            }
        }
        // No legal move: the game ends here, so score the final position.
        let score = if best == f64::NEG_INFINITY { self.heuristic.evaluate(board) } else { best };
        self.store(key, score);
        score
    }

    /// Environment to spawn a tile; averages over every empty cell and tile value.
    fn chance(&mut self, board: Board, depth: u32) -> f64 {
        let empty = board.count_empty();
        if empty == 0 {
            return self.leaf(board);
        }
        let key = (board, Node::Chance, depth);
        if let Some(score) = self.lookup(key) {
            return score;
        }
        self.nodes += 1;
        let mut total = 0.0;
        for idx in board.empty_cells() {
            for (value, prob) in SPAWN_OUTCOMES {
                let spawned = board.place_spawn(Spawn { row: idx / SIZE, col: idx % SIZE, value });
                total += prob * self.decision(spawned, depth);
            }
        }
        let score = total / empty as f64;
        self.store(key, score);
        score
    }
}
