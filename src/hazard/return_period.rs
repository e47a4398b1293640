//! Return-period rainfall from annual maxima (Weibull plotting position)
//!
//! For `n` annual maxima sorted descending, the `m`-th largest has an empirical
//! exceedance probability of `m / (n + 1)`. The level for a return period `T` is the
//! maxima whose rank is closest to `(n + 1) / T`, clamped to the observed range.
use crate::hazard::models::ReturnLevels;

/// Return periods (years) carried in the composite matrix
pub const DEFAULT_RETURN_PERIODS: [u32; 4] = [10, 20, 50, 100];

/// Per-period estimates in requested order, plus their mean
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnPeriodEstimate {
    pub levels: Vec<(u32, f64)>,
    pub average: f64,
}

impl ReturnPeriodEstimate {
    pub fn level(&self, return_period: u32) -> Option<f64> {
        self.levels
            .iter()
            .find(|(period, _)| *period == return_period)
            .map(|(_, level)| *level)
    }

    /// Levels for the matrix's fixed RP10/RP20/RP50/RP100 columns
    pub fn to_return_levels(&self) -> Option<ReturnLevels> {
        Some(ReturnLevels {
            rp10: self.level(10)?,
            rp20: self.level(20)?,
            rp50: self.level(50)?,
            rp100: self.level(100)?,
            rp_avg: self.average,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReturnPeriodEstimator {
    periods: Vec<u32>,
}

impl Default for ReturnPeriodEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_RETURN_PERIODS.to_vec())
    }
}

impl ReturnPeriodEstimator {
    pub fn new(periods: Vec<u32>) -> Self {
        Self { periods }
    }

    pub fn periods(&self) -> &[u32] {
        &self.periods
    }

    /// Estimate every configured period; `None` when there are no maxima or no periods
    pub fn estimate(&self, annual_maxima: &[f64]) -> Option<ReturnPeriodEstimate> {
        if annual_maxima.is_empty() || self.periods.is_empty() {
            return None;
        }

        let mut descending = annual_maxima.to_vec();
        descending.sort_by(|a, b| b.total_cmp(a));

        let levels: Vec<(u32, f64)> = self
            .periods
            .iter()
            .map(|&period| {
                let rank = weibull_rank(descending.len(), period);
                (period, descending[rank - 1])
            })
            .collect();

        let average = levels.iter().map(|(_, level)| level).sum::<f64>() / levels.len() as f64;

        Some(ReturnPeriodEstimate { levels, average })
    }
}

/// 1-based descending rank `clamp(round((n + 1) / T), 1, n)`
pub fn weibull_rank(n: usize, return_period: u32) -> usize {
    if n == 0 {
        return 0;
    }
    let period = f64::from(return_period.max(1));
    let rank = ((n as f64 + 1.0) / period).round() as usize;
    rank.clamp(1, n)
}
