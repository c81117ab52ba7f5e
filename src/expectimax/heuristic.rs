use std::sync::OnceLock;

use serde::Deserialize;

use crate::engine::{self, Board, SIZE};

/// Weights applied to the four sub-scores.
///
/// Defaults were tuned empirically; every field can be overridden from the
/// `[heuristic]` section of the config file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeuristicWeights {
    pub empty_weight: f64,
    pub smoothness_weight: f64,
    pub monotonicity_weight: f64,
    pub max_tile_weight: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self { empty_weight: 2.7, smoothness_weight: 0.1, monotonicity_weight: 1.0, max_tile_weight: 1.0 }
    }
}

/// Raw (unweighted) sub-scores for one board.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeuristicBreakdown {
    /// Number of empty cells.
    pub empty: f64,
    /// Minus the summed log2 gaps between neighbouring occupied cells.
    pub smoothness: f64,
    /// Minus the summed monotonicity violations, best direction per line.
    pub monotonicity: f64,
    /// log2 of the highest tile (0 on an empty board).
    pub max_tile: f64,
}

impl HeuristicBreakdown {
    pub fn weighted(&self, w: &HeuristicWeights) -> f64 {
        w.empty_weight * self.empty
            + w.smoothness_weight * self.smoothness
            + w.monotonicity_weight * self.monotonicity
            + w.max_tile_weight * self.max_tile
    }
}

/// Pure board evaluator: weighted sum of empty/smoothness/monotonicity/max-tile.
///
/// ```
/// use auto_2048::engine::Board;
/// use auto_2048::expectimax::{Heuristic, HeuristicWeights};
/// let h = Heuristic::new(HeuristicWeights::default());
/// let sparse = Board::from_rows(&[[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
/// let crowded = Board::from_rows(&[[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 4, 2]]).unwrap();
/// assert!(h.breakdown(sparse).empty > h.breakdown(crowded).empty);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Heuristic {
    weights: HeuristicWeights,
}

impl Heuristic {
    pub fn new(weights: HeuristicWeights) -> Self { Self { weights } }

    #[inline]
    pub fn evaluate(&self, board: Board) -> f64 { self.breakdown(board).weighted(&self.weights) }

    /// Sub-scores, summed over every row and column via the line table.
    pub fn breakdown(&self, board: Board) -> HeuristicBreakdown {
        let table = line_features();
        let mut out = HeuristicBreakdown::default();
        for i in 0..SIZE {
            let row = &table[board.row_line(i) as usize];
            let col = &table[board.col_line(i) as usize];
            // Columns see the same cells as rows, so empties are only counted once.
            out.empty += row.empty;
            out.smoothness += row.smoothness + col.smoothness;
            out.monotonicity += row.monotonicity + col.monotonicity;
        }
        out.max_tile = (0..engine::CELLS).map(|idx| board.exponent(idx)).max().unwrap_or(0) as f64;
        out
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct LineFeatures {
    empty: f64,
    smoothness: f64,
    monotonicity: f64,
}

static LINE_FEATURES: OnceLock<Box<[LineFeatures]>> = OnceLock::new();

pub(crate) fn warm() {
    let _ = line_features();
}

fn line_features() -> &'static [LineFeatures] {
    LINE_FEATURES
        .get_or_init(|| {
            (0..=u16::MAX)
                .map(|line| calc_line_features(engine::unpack_line(line)))
                .collect::<Vec<_>>()
                .into_boxed_slice()
        })
        .as_ref()
}

fn calc_line_features(line: [u8; SIZE]) -> LineFeatures {
    LineFeatures { empty: calc_empty(&line), smoothness: calc_smoothness(&line), monotonicity: calc_monotonicity(&line) }
}

fn calc_empty(line: &[u8]) -> f64 {
    line.iter().filter(|&&e| e == 0).count() as f64
}

// Empty cells between two tiles are skipped, so [2, 0, 0, 4] compares 2 with 4.
fn calc_smoothness(line: &[u8]) -> f64 {
    let occupied: Vec<f64> = line.iter().filter(|&&e| e != 0).map(|&e| e as f64).collect();
    -occupied.windows(2).map(|w| (w[0] - w[1]).abs()).sum::<f64>()
}

// Empty cells count as exponent 0 here.
fn calc_monotonicity(line: &[u8]) -> f64 {
    let mut decreasing = 0.0;
    let mut increasing = 0.0;
    for pair in line.windows(2) {
        let (cur, next) = (pair[0] as f64, pair[1] as f64);
        if cur > next {
            decreasing += next - cur;
        } else if next > cur {
            increasing += cur - next;
        }
    }
    f64::max(decreasing, increasing)
}
