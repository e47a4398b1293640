use crate::hazard::models::DroughtProbability;
use crate::utils::mean_and_std;

/// Standard deviations below the mean for P_D1..P_D4
pub const SEVERITY_MULTIPLIERS: [f64; 4] = [1.0, 1.5, 2.0, 2.5];

/// Fraction of years whose total falls below `mean - k * std`, for each severity `k`
#[derive(Debug, Clone, Copy, Default)]
pub struct DroughtProbabilityEstimator;

impl DroughtProbabilityEstimator {
    /// `None` for an empty list of yearly totals
    pub fn estimate(&self, annual_totals: &[f64]) -> Option<DroughtProbability> {
        let (mean, std) = mean_and_std(annual_totals)?;
        let years = annual_totals.len() as f64;

        // Identical totals: nothing is below the mean, whatever rounding did to it
        let uniform = annual_totals.iter().all(|&t| t == annual_totals[0]);

        let p_d = SEVERITY_MULTIPLIERS.map(|k| {
            if uniform {
                return 0.0;
            }
            let threshold = mean - k * std;
            annual_totals.iter().filter(|&&t| t < threshold).count() as f64 / years
        });

        Some(DroughtProbability {
            p_d,
            drought_prob: p_d.iter().sum::<f64>() / p_d.len() as f64,
        })
    }
}
