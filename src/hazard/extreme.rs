use crate::hazard::models::ExtremeRainfall;

/// Daily exceedance thresholds in mm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremeThresholds {
    pub heavy_mm: f64,
    pub very_heavy_mm: f64,
}

impl Default for ExtremeThresholds {
    fn default() -> Self {
        Self {
            heavy_mm: 100.0,
            very_heavy_mm: 150.0,
        }
    }
}

/// Empirical frequency of extreme rainfall days over the whole record
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtremeRainfallEstimator {
    thresholds: ExtremeThresholds,
}

impl ExtremeRainfallEstimator {
    pub fn new(thresholds: ExtremeThresholds) -> Self {
        Self { thresholds }
    }

    pub fn estimate(&self, daily: &[f32]) -> ExtremeRainfall {
        let total_days = daily.len();
        if total_days == 0 {
            return ExtremeRainfall {
                er100: 0.0,
                er150: 0.0,
                er_prob: 0.0,
            };
        }

        let (heavy, very_heavy) = daily.iter().map(|&v| f64::from(v)).fold(
            (0usize, 0usize),
            |(heavy, very_heavy), v| {
                (
                    heavy + usize::from(v > self.thresholds.heavy_mm),
                    very_heavy + usize::from(v > self.thresholds.very_heavy_mm),
                )
            },
        );

        let er100 = heavy as f64 / total_days as f64;
        let er150 = very_heavy as f64 / total_days as f64;
        ExtremeRainfall {
            er100,
            er150,
            er_prob: (er100 + er150) / 2.0,
        }
    }
}
