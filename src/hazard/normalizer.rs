//! Grid-wide normalization and composite blending
//!
//! This is the pipeline's only barrier: RP_Prob needs the minimum and maximum RP_Avg of
//! every retained cell, so no final record exists until all raw records do.
use tracing::{info, warn};

use crate::hazard::error::HazardError;
use crate::hazard::models::{HazardRecord, RawHazardRecord};
use crate::utils::round_to;

/// Blend weights for the composite hazard score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeWeights {
    pub drought: f64,
    pub extreme_rainfall: f64,
    pub return_period: f64,
}

pub const DEFAULT_COMPOSITE_WEIGHTS: CompositeWeights = CompositeWeights {
    drought: 0.4,
    extreme_rainfall: 0.3,
    return_period: 0.3,
};

impl Default for CompositeWeights {
    fn default() -> Self {
        DEFAULT_COMPOSITE_WEIGHTS
    }
}

impl CompositeWeights {
    /// `round(w_d * drought + w_e * er + w_r * rp, 4)`
    pub fn blend(&self, drought_prob: f64, er_prob: f64, rp_prob: f64) -> f64 {
        round_to(
            self.drought * drought_prob
                + self.extreme_rainfall * er_prob
                + self.return_period * rp_prob,
            4,
        )
    }
}

/// How RP_Prob was derived for the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizationOutcome {
    /// Min-max scaled over `[min_rp_avg, max_rp_avg]`
    Normalized { min_rp_avg: f64, max_rp_avg: f64 },
    /// Every cell shares one RP_Avg; RP_Prob is 0 everywhere
    Degenerate { rp_avg: f64 },
}

#[derive(Debug, Clone)]
pub struct NormalizedGrid {
    pub records: Vec<HazardRecord>,
    pub outcome: NormalizationOutcome,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeHazardNormalizer {
    weights: CompositeWeights,
}

impl CompositeHazardNormalizer {
    pub fn new(weights: CompositeWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> CompositeWeights {
        self.weights
    }

    /// Min-max RP_Prob and composite blend over the whole grid
    ///
    /// Indicators are rounded to artifact precision first and RP_Prob to 4 decimals
    /// before blending, so every output row satisfies the composite formula on its own
    /// stored values.
    pub fn normalize(&self, raw: &[RawHazardRecord]) -> Result<NormalizedGrid, HazardError> {
        let raw: Vec<RawHazardRecord> = raw.iter().map(RawHazardRecord::rounded).collect();

        let (min_rp_avg, max_rp_avg) = raw
            .iter()
            .map(|r| r.return_levels.rp_avg)
            .fold(None, |bounds: Option<(f64, f64)>, v| {
                Some(bounds.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
            })
            .ok_or(HazardError::EmptyGrid)?;

        let outcome = if max_rp_avg > min_rp_avg {
            NormalizationOutcome::Normalized {
                min_rp_avg,
                max_rp_avg,
            }
        } else {
            warn!(
                rp_avg = min_rp_avg,
                cells = raw.len(),
                "All cells share one RP_Avg, RP_Prob set to 0"
            );
            NormalizationOutcome::Degenerate { rp_avg: min_rp_avg }
        };

        let records = raw
            .iter()
            .map(|r| {
                let rp_prob = match outcome {
                    NormalizationOutcome::Normalized {
                        min_rp_avg,
                        max_rp_avg,
                    } => round_to(
                        (r.return_levels.rp_avg - min_rp_avg) / (max_rp_avg - min_rp_avg),
                        4,
                    ),
                    NormalizationOutcome::Degenerate { .. } => 0.0,
                };
                let composite =
                    self.weights
                        .blend(r.drought.drought_prob, r.extreme.er_prob, rp_prob);
                HazardRecord::from_raw(r, rp_prob, composite)
            })
            .collect::<Vec<_>>();

        info!(
            cells = records.len(),
            min_rp_avg, max_rp_avg, "Normalized composite hazard grid"
        );

        Ok(NormalizedGrid { records, outcome })
    }
}
