use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::round_to;

/// Latitude/longitude of a source grid cell, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GridPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GridPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Ordering key for accumulating cells across extracts
    pub fn cell_id(&self) -> CellId {
        CellId {
            lat_millis: (self.lat * 1000.0).round() as i64,
            lon_millis: (self.lon * 1000.0).round() as i64,
        }
    }
}

/// Grid cell identity at the artifact's coordinate precision (3 decimals)
///
/// Orders latitude-major, then longitude, which is the row order of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    pub lat_millis: i64,
    pub lon_millis: i64,
}

/// Empirical daily exceedance frequencies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremeRainfall {
    pub er100: f64,
    pub er150: f64,
    pub er_prob: f64,
}

/// Return-period rainfall (mm) for the artifact's fixed set of periods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnLevels {
    pub rp10: f64,
    pub rp20: f64,
    pub rp50: f64,
    pub rp100: f64,
    pub rp_avg: f64,
}

/// Severity-ladder probabilities over yearly totals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroughtProbability {
    /// P_D1..P_D4, one per severity multiplier
    pub p_d: [f64; 4],
    pub drought_prob: f64,
}

/// Per-cell indicators before the grid-wide normalization pass
///
/// RP_Prob and the composite score only exist once every retained cell's RP_Avg is
/// known, see [`super::CompositeHazardNormalizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawHazardRecord {
    pub point: GridPoint,
    pub extreme: ExtremeRainfall,
    pub return_levels: ReturnLevels,
    pub drought: DroughtProbability,
}

impl RawHazardRecord {
    /// Copy at artifact precision; normalization and blending run on these values
    pub fn rounded(&self) -> Self {
        Self {
            point: GridPoint::new(round_to(self.point.lat, 3), round_to(self.point.lon, 3)),
            extreme: ExtremeRainfall {
                er100: round_to(self.extreme.er100, 4),
                er150: round_to(self.extreme.er150, 4),
                er_prob: round_to(self.extreme.er_prob, 4),
            },
            return_levels: ReturnLevels {
                rp10: round_to(self.return_levels.rp10, 2),
                rp20: round_to(self.return_levels.rp20, 2),
                rp50: round_to(self.return_levels.rp50, 2),
                rp100: round_to(self.return_levels.rp100, 2),
                rp_avg: round_to(self.return_levels.rp_avg, 2),
            },
            drought: DroughtProbability {
                p_d: self.drought.p_d.map(|p| round_to(p, 4)),
                drought_prob: round_to(self.drought.drought_prob, 4),
            },
        }
    }
}

/// One row of the composite matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HazardRecord {
    #[serde(rename = "LAT")]
    pub lat: f64,
    #[serde(rename = "LON")]
    pub lon: f64,
    #[serde(rename = "ER100")]
    pub er100: f64,
    #[serde(rename = "ER150")]
    pub er150: f64,
    #[serde(rename = "ER_Prob")]
    pub er_prob: f64,
    #[serde(rename = "RP10")]
    pub rp10: f64,
    #[serde(rename = "RP20")]
    pub rp20: f64,
    #[serde(rename = "RP50")]
    pub rp50: f64,
    #[serde(rename = "RP100")]
    pub rp100: f64,
    #[serde(rename = "RP_Avg")]
    pub rp_avg: f64,
    #[serde(rename = "RP_Prob")]
    pub rp_prob: f64,
    #[serde(rename = "P_D1")]
    pub p_d1: f64,
    #[serde(rename = "P_D2")]
    pub p_d2: f64,
    #[serde(rename = "P_D3")]
    pub p_d3: f64,
    #[serde(rename = "P_D4")]
    pub p_d4: f64,
    #[serde(rename = "Drought_Prob")]
    pub drought_prob: f64,
    #[serde(rename = "Composite_Hazard")]
    pub composite_hazard: f64,
}

impl HazardRecord {
    /// Combine a raw record with its grid-normalized fields
    pub fn from_raw(raw: &RawHazardRecord, rp_prob: f64, composite_hazard: f64) -> Self {
        Self {
            lat: raw.point.lat,
            lon: raw.point.lon,
            er100: raw.extreme.er100,
            er150: raw.extreme.er150,
            er_prob: raw.extreme.er_prob,
            rp10: raw.return_levels.rp10,
            rp20: raw.return_levels.rp20,
            rp50: raw.return_levels.rp50,
            rp100: raw.return_levels.rp100,
            rp_avg: raw.return_levels.rp_avg,
            rp_prob,
            p_d1: raw.drought.p_d[0],
            p_d2: raw.drought.p_d[1],
            p_d3: raw.drought.p_d[2],
            p_d4: raw.drought.p_d[3],
            drought_prob: raw.drought.drought_prob,
            composite_hazard,
        }
    }

    /// Copy rounded to the artifact's precision
    ///
    /// Coordinates to 3 decimals, rainfall amounts to 2, probabilities to 4. Records from
    /// [`super::CompositeHazardNormalizer`] are already at this precision, so this is a
    /// no-op for them.
    pub fn rounded(&self) -> Self {
        Self {
            lat: round_to(self.lat, 3),
            lon: round_to(self.lon, 3),
            er100: round_to(self.er100, 4),
            er150: round_to(self.er150, 4),
            er_prob: round_to(self.er_prob, 4),
            rp10: round_to(self.rp10, 2),
            rp20: round_to(self.rp20, 2),
            rp50: round_to(self.rp50, 2),
            rp100: round_to(self.rp100, 2),
            rp_avg: round_to(self.rp_avg, 2),
            rp_prob: round_to(self.rp_prob, 4),
            p_d1: round_to(self.p_d1, 4),
            p_d2: round_to(self.p_d2, 4),
            p_d3: round_to(self.p_d3, 4),
            p_d4: round_to(self.p_d4, 4),
            drought_prob: round_to(self.drought_prob, 4),
            composite_hazard: round_to(self.composite_hazard, 4),
        }
    }
}
