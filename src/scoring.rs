use std::collections::HashMap;

use anyhow::{anyhow, Result};
use tracing::warn;

use crate::models::{Sector, SectorWeights, StockPick};

/// Tolerance for the per-sector weight sum invariant.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

const QUALITY_PASS_SCORE: f64 = 90.0;
const QUALITY_FAIL_SCORE: f64 = 40.0;
const DEEP_VALUE_SCORE: f64 = 95.0;
const BASE_VALUE_SCORE: f64 = 60.0;
const POINTS_PER_CATALYST: f64 = 25.0;

/// Sector -> blending weights lookup used by the composite score.
///
/// The table is constructed once and injected into consumers; it is never
/// mutated afterwards. A sector missing from the table is a legal state
/// for caller-supplied tables and degrades that pick's score to 0.
#[derive(Debug, Clone)]
pub struct SectorWeightTable {
    weights: HashMap<Sector, SectorWeights>,
}

impl SectorWeightTable {
    /// Build a table from explicit rows, enforcing that every row sums
    /// to 1.0 within tolerance.
    pub fn new(rows: Vec<(Sector, SectorWeights)>) -> Result<Self> {
        let mut weights = HashMap::with_capacity(rows.len());
        for (sector, row) in rows {
            if (row.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(anyhow!(
                    "weights for {} sum to {} instead of 1.0",
                    sector,
                    row.sum()
                ));
            }
            if weights.insert(sector, row).is_some() {
                warn!("duplicate weight row for {}, keeping the later one", sector);
            }
        }
        Ok(Self { weights })
    }

    /// The shipped NSE table. Covers every `Sector` variant; a new variant
    /// fails to compile here until a row is added.
    pub fn default_nse() -> Self {
        let rows = Sector::ALL
            .iter()
            .map(|&sector| {
                let row = match sector {
                    Sector::Finance => SectorWeights { quality: 0.40, valuation: 0.30, momentum: 0.15, catalysts: 0.15 },
                    Sector::Utilities => SectorWeights { quality: 0.50, valuation: 0.30, momentum: 0.10, catalysts: 0.10 },
                    Sector::Telecommunication => SectorWeights { quality: 0.30, valuation: 0.20, momentum: 0.30, catalysts: 0.20 },
                    Sector::Agriculture => SectorWeights { quality: 0.35, valuation: 0.35, momentum: 0.10, catalysts: 0.20 },
                    Sector::Manufacturing => SectorWeights { quality: 0.45, valuation: 0.25, momentum: 0.15, catalysts: 0.15 },
                    Sector::RealEstate => SectorWeights { quality: 0.25, valuation: 0.50, momentum: 0.10, catalysts: 0.15 },
                    Sector::EnergyAndPetroleum => SectorWeights { quality: 0.35, valuation: 0.30, momentum: 0.20, catalysts: 0.15 },
                    Sector::Investment => SectorWeights { quality: 0.30, valuation: 0.40, momentum: 0.15, catalysts: 0.15 },
                };
                (sector, row)
            })
            .collect();

        // The rows above are constants that all sum to 1.0.
        Self::new(rows).expect("default NSE weight table is valid")
    }

    pub fn get(&self, sector: Sector) -> Option<&SectorWeights> {
        self.weights.get(&sector)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// The four sub-scores plus their weighted blend, kept around so the
/// detail view can show where a composite came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub quality: f64,
    pub valuation: f64,
    pub momentum: f64,
    pub catalysts: f64,
    pub composite: i32,
}

/// Composite score for a pick: the weighted blend of the quality,
/// valuation, momentum and catalyst sub-scores, rounded half-up.
///
/// Pure function of the pick and the table. A sector without a weight row
/// scores 0 outright. The momentum sub-score reuses `confidence.score`
/// verbatim without clamping; out-of-range inputs are the repository's
/// problem to flag, not this function's to repair.
pub fn composite_score(pick: &StockPick, table: &SectorWeightTable) -> i32 {
    score_breakdown(pick, table).composite
}

/// Full breakdown behind `composite_score`.
pub fn score_breakdown(pick: &StockPick, table: &SectorWeightTable) -> ScoreBreakdown {
    let Some(weights) = table.get(pick.sector) else {
        return ScoreBreakdown {
            quality: 0.0,
            valuation: 0.0,
            momentum: 0.0,
            catalysts: 0.0,
            composite: 0,
        };
    };

    let quality = if pick.quality_pass { QUALITY_PASS_SCORE } else { QUALITY_FAIL_SCORE };
    // Deep-value gate: both ratios must clear their bars, not either.
    let valuation = if pick.valuation.pe < 8.0 && pick.valuation.pb < 1.0 {
        DEEP_VALUE_SCORE
    } else {
        BASE_VALUE_SCORE
    };
    let momentum = pick.confidence.score;
    let catalysts = (pick.catalysts.len() as f64 * POINTS_PER_CATALYST).min(100.0);

    let blended = quality * weights.quality
        + valuation * weights.valuation
        + momentum * weights.momentum
        + catalysts * weights.catalysts;

    ScoreBreakdown {
        quality,
        valuation,
        momentum,
        catalysts,
        composite: blended.round() as i32,
    }
}
