use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::round_to;

/// Sector sensitivity multipliers applied to the composite hazard
///
/// This is the one canonical table; sectors are matched case-insensitively.
pub const SECTOR_WEIGHTS: &[(&str, f64)] = &[
    ("Chemical", 1.0),
    ("Pharma", 1.0),
    ("Automotive", 0.5),
    ("Engineering", 0.5),
    ("ICT", 0.4),
    ("Logistics", 0.4),
    ("MSME", 0.3),
];

/// Weight for sectors missing from [`SECTOR_WEIGHTS`]
pub const DEFAULT_SECTOR_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

/// Score cut points: below `medium` is Low, below `high` is Medium, otherwise High
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub medium: f64,
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: 0.2,
            high: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RiskAssessment {
    #[serde(rename = "Final_Score")]
    pub final_score: f64,
    #[serde(rename = "Category")]
    pub category: RiskCategory,
    #[serde(rename = "Weight")]
    pub weight: f64,
    #[serde(rename = "Composite_Hazard")]
    pub composite_hazard: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskService {
    thresholds: RiskThresholds,
}

impl RiskService {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn sector_weight(sector: &str) -> f64 {
        SECTOR_WEIGHTS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(sector.trim()))
            .map(|(_, weight)| *weight)
            .unwrap_or(DEFAULT_SECTOR_WEIGHT)
    }

    pub fn categorize(&self, score: f64) -> RiskCategory {
        if score < self.thresholds.medium {
            RiskCategory::Low
        } else if score < self.thresholds.high {
            RiskCategory::Medium
        } else {
            RiskCategory::High
        }
    }

    /// Sector-weighted score and category for a composite hazard value
    pub fn assess(&self, composite_hazard: f64, sector: &str) -> RiskAssessment {
        let weight = Self::sector_weight(sector);
        let final_score = round_to(weight * composite_hazard, 4);
        RiskAssessment {
            final_score,
            category: self.categorize(final_score),
            weight,
            composite_hazard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_weights() {
        assert_eq!(RiskService::sector_weight("Chemical"), 1.0);
        assert_eq!(RiskService::sector_weight("ICT"), 0.4);
        assert_eq!(RiskService::sector_weight("MSME"), 0.3);
    }

    #[test]
    fn test_sector_match_ignores_case() {
        assert_eq!(RiskService::sector_weight("pharma"), 1.0);
        assert_eq!(RiskService::sector_weight(" logistics "), 0.4);
    }

    #[test]
    fn test_unlisted_sector_uses_default() {
        assert_eq!(RiskService::sector_weight("Other"), DEFAULT_SECTOR_WEIGHT);
        assert_eq!(RiskService::sector_weight(""), DEFAULT_SECTOR_WEIGHT);
    }

    #[test]
    fn test_category_boundaries() {
        let service = RiskService::default();
        assert_eq!(service.categorize(0.0), RiskCategory::Low);
        assert_eq!(service.categorize(0.1999), RiskCategory::Low);
        assert_eq!(service.categorize(0.2), RiskCategory::Medium);
        assert_eq!(service.categorize(0.4999), RiskCategory::Medium);
        assert_eq!(service.categorize(0.5), RiskCategory::High);
    }

    #[test]
    fn test_assess() {
        let result = RiskService::default().assess(0.3456, "Automotive");
        assert_eq!(result.weight, 0.5);
        assert_eq!(result.final_score, 0.1728);
        assert_eq!(result.category, RiskCategory::Low);
        assert_eq!(result.composite_hazard, 0.3456);

        let result = RiskService::default().assess(0.6, "Chemical");
        assert_eq!(result.final_score, 0.6);
        assert_eq!(result.category, RiskCategory::High);
    }
}
