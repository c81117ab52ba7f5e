//! One game from a fresh board to game over (or the move cap).

use log::{info, warn};
use rand::Rng;

use crate::engine::{Board, Move};
use crate::expectimax::Expectimax;

/// Safety bound against pathological non-terminating play.
pub const DEFAULT_MOVE_LIMIT: u32 = 1000;

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    GameOver,
    MoveLimitReached,
}

/// Outcome of one completed game.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub max_tile: u32,
    pub moves: u32,
    pub score: u64,
    pub final_board: Board,
    pub outcome: GameOutcome,
    /// Search nodes visited over the whole game.
    pub nodes: u64,
    /// Most nodes visited for a single move.
    pub peak_nodes: u64,
    pub cache_hits: u64,
}

/// Play one game with `searcher`, starting from an empty board with two
/// random tiles. `on_move` sees every move number, direction and the board
/// after the spawn.
///
/// ```
/// use auto_2048::expectimax::{Expectimax, ExpectimaxConfig};
/// use auto_2048::game::{play_game, GameOutcome};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut ex = Expectimax::with_config(ExpectimaxConfig { max_depth: 0, ..Default::default() }).unwrap();
/// let mut rng = StdRng::seed_from_u64(3);
/// let run = play_game(&mut ex, &mut rng, 10, |_, _, _| {});
/// assert_eq!(run.outcome, GameOutcome::MoveLimitReached);
/// assert_eq!(run.moves, 10);
/// ```
pub fn play_game<R, F>(searcher: &mut Expectimax, rng: &mut R, move_limit: u32, on_move: F) -> RunResult
where
    R: Rng + ?Sized,
    F: FnMut(u32, Move, Board),
{
    play_from(Board::new_game(rng), searcher, rng, move_limit, on_move)
}

/// Like [`play_game`] but continues from an existing board.
pub fn play_from<R, F>(start: Board, searcher: &mut Expectimax, rng: &mut R, move_limit: u32, mut on_move: F) -> RunResult
where
    R: Rng + ?Sized,
    F: FnMut(u32, Move, Board),
{
    let mut board = start;
    let mut max_tile = board.highest_tile();
    let mut moves = 0;
    let (mut nodes, mut cache_hits) = (0u64, 0u64);
    searcher.reset_stats();
    let outcome = loop {
        if board.is_game_over() {
            break GameOutcome::GameOver;
        }
        if moves >= move_limit {
            warn!("move limit of {move_limit} reached with highest tile {max_tile}");
            break GameOutcome::MoveLimitReached;
        }
        let Ok(dir) = searcher.choose_move(board) else {
            break GameOutcome::GameOver;
        };
        let stats = searcher.last_stats();
        nodes = nodes.saturating_add(stats.nodes);
        cache_hits = cache_hits.saturating_add(stats.cache_hits);
        board = board.make_move(dir, rng);
        moves += 1;
        max_tile = max_tile.max(board.highest_tile());
        on_move(moves, dir, board);
    };
    let peak_nodes = searcher.last_stats().peak_nodes;
    info!("game finished: {outcome:?} after {moves} moves, max tile {max_tile}, {nodes} states considered");
    RunResult {
        max_tile,
        moves,
        score: board.score(),
        final_board: board,
        outcome,
        nodes,
        peak_nodes,
        cache_hits,
    }
}
