//! In-memory composite matrix keyed by integer grid steps
//!
//! Coordinates are mapped to whole multiples of the lookup step (0.5° by default) before
//! any comparison, so a query and a stored row either share a key or do not match.
use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::hazard::models::HazardRecord;
use crate::matrix::artifact::read_matrix;
use crate::matrix::error::{LookupError, MatrixError};

pub const DEFAULT_GRID_STEP: f64 = 0.5;

/// Stored coordinates within this many steps of a multiple count as on-grid
const ON_GRID_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey {
    pub lat_steps: i64,
    pub lon_steps: i64,
}

impl GridKey {
    /// Key for a query: nearest step (ties to even), negative longitude wrapped to 0–360°
    pub fn for_query(lat: f64, lon: f64, step: f64) -> Result<Self, LookupError> {
        if !lat.is_finite()
            || !lon.is_finite()
            || !(-90.0..=90.0).contains(&lat)
            || !(-180.0..=360.0).contains(&lon)
        {
            return Err(LookupError::InvalidCoordinate { lat, lon });
        }

        let lat_steps = (lat / step).round_ties_even() as i64;
        let mut lon_steps = (lon / step).round_ties_even() as i64;
        if lon_steps < 0 {
            lon_steps += (360.0 / step).round() as i64;
        }

        Ok(Self {
            lat_steps,
            lon_steps,
        })
    }

    /// Key for a stored row, `None` when the row does not sit on the lookup grid
    pub fn for_stored(lat: f64, lon: f64, step: f64) -> Option<Self> {
        let lat_scaled = lat / step;
        let lon_scaled = lon / step;
        let on_grid = |v: f64| v.is_finite() && (v - v.round()).abs() < ON_GRID_TOLERANCE;
        if !on_grid(lat_scaled) || !on_grid(lon_scaled) {
            return None;
        }
        Some(Self {
            lat_steps: lat_scaled.round() as i64,
            lon_steps: lon_scaled.round() as i64,
        })
    }

    pub fn lat(&self, step: f64) -> f64 {
        self.lat_steps as f64 * step
    }

    pub fn lon(&self, step: f64) -> f64 {
        self.lon_steps as f64 * step
    }
}

/// The loaded composite matrix, read-only after construction
#[derive(Debug, Clone)]
pub struct HazardMatrix {
    records: Vec<HazardRecord>,
    index: HashMap<GridKey, usize>,
    grid_step: f64,
    loaded_at: DateTime<Utc>,
}

impl HazardMatrix {
    pub fn from_records(records: Vec<HazardRecord>, grid_step: f64) -> Result<Self, MatrixError> {
        if !grid_step.is_finite() || grid_step <= 0.0 {
            return Err(MatrixError::InvalidGridStep(grid_step));
        }

        let mut index = HashMap::with_capacity(records.len());
        let mut off_grid = 0usize;
        let mut duplicates = 0usize;

        for (position, record) in records.iter().enumerate() {
            let Some(key) = GridKey::for_stored(record.lat, record.lon, grid_step) else {
                off_grid += 1;
                continue;
            };
            if index.contains_key(&key) {
                duplicates += 1;
                debug!(
                    "Duplicate matrix row for {},{}; keeping the first",
                    record.lat, record.lon
                );
                continue;
            }
            index.insert(key, position);
        }

        if duplicates > 0 {
            warn!("{} duplicate rows ignored in composite matrix", duplicates);
        }
        info!(
            rows = records.len(),
            indexed = index.len(),
            off_grid,
            grid_step,
            "Indexed composite matrix"
        );

        Ok(Self {
            records,
            index,
            grid_step,
            loaded_at: Utc::now(),
        })
    }

    /// Load the artifact; fails when it is missing or unreadable
    pub fn load(path: &Path, grid_step: f64) -> Result<Self, MatrixError> {
        Self::from_records(read_matrix(path)?, grid_step)
    }

    pub fn lookup(&self, lat: f64, lon: f64) -> Result<&HazardRecord, LookupError> {
        let key = GridKey::for_query(lat, lon, self.grid_step)?;
        self.index
            .get(&key)
            .map(|&position| &self.records[position])
            .ok_or(LookupError::NoData {
                lat: key.lat(self.grid_step),
                lon: key.lon(self.grid_step),
            })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HazardRecord] {
        &self.records
    }

    pub fn grid_step(&self) -> f64 {
        self.grid_step
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lat: f64, lon: f64, composite_hazard: f64) -> HazardRecord {
        HazardRecord {
            lat,
            lon,
            er100: 0.0,
            er150: 0.0,
            er_prob: 0.0,
            rp10: 0.0,
            rp20: 0.0,
            rp50: 0.0,
            rp100: 0.0,
            rp_avg: 0.0,
            rp_prob: 0.0,
            p_d1: 0.0,
            p_d2: 0.0,
            p_d3: 0.0,
            p_d4: 0.0,
            drought_prob: 0.0,
            composite_hazard,
        }
    }

    #[test]
    fn test_query_key_rounds_to_half_degree() {
        let key = GridKey::for_query(19.1, 72.8, 0.5).unwrap();
        assert_eq!(key.lat(0.5), 19.0);
        assert_eq!(key.lon(0.5), 73.0);
    }

    #[test]
    fn test_query_key_ties_to_even() {
        // 19.25 * 2 = 38.5 -> 38, 19.75 * 2 = 39.5 -> 40
        assert_eq!(GridKey::for_query(19.25, 72.0, 0.5).unwrap().lat_steps, 38);
        assert_eq!(GridKey::for_query(19.75, 72.0, 0.5).unwrap().lat_steps, 40);
    }

    #[test]
    fn test_query_key_wraps_negative_longitude() {
        let key = GridKey::for_query(40.0, -74.0, 0.5).unwrap();
        assert_eq!(key.lon(0.5), 286.0);
        assert_eq!(key, GridKey::for_query(40.0, 286.0, 0.5).unwrap());
    }

    #[test]
    fn test_query_key_rejects_out_of_range() {
        assert!(GridKey::for_query(91.0, 0.0, 0.5).is_err());
        assert!(GridKey::for_query(f64::NAN, 0.0, 0.5).is_err());
        assert!(GridKey::for_query(0.0, 400.0, 0.5).is_err());
    }

    #[test]
    fn test_stored_key_requires_grid_alignment() {
        assert!(GridKey::for_stored(8.5, 77.0, 0.5).is_some());
        assert!(GridKey::for_stored(8.25, 77.0, 0.5).is_none());
        assert!(GridKey::for_stored(8.5000000001, 77.0, 0.5).is_some());
    }

    #[test]
    fn test_lookup_hit_returns_stored_row() {
        let matrix = HazardMatrix::from_records(
            vec![record(19.0, 73.0, 0.21), record(19.0, 73.5, 0.42)],
            DEFAULT_GRID_STEP,
        )
        .unwrap();

        let hit = matrix.lookup(19.1, 73.4).unwrap();
        assert_eq!(hit, &record(19.0, 73.5, 0.42));
    }

    #[test]
    fn test_lookup_miss_is_explicit() {
        let matrix =
            HazardMatrix::from_records(vec![record(19.0, 73.0, 0.21)], DEFAULT_GRID_STEP).unwrap();

        let miss = matrix.lookup(-33.9, 151.2);
        assert_eq!(
            miss,
            Err(LookupError::NoData {
                lat: -34.0,
                lon: 151.0
            })
        );
    }

    #[test]
    fn test_duplicate_rows_keep_first() {
        let matrix = HazardMatrix::from_records(
            vec![record(19.0, 73.0, 0.1), record(19.0, 73.0, 0.9)],
            DEFAULT_GRID_STEP,
        )
        .unwrap();
        assert_eq!(matrix.lookup(19.0, 73.0).unwrap().composite_hazard, 0.1);
        assert_eq!(matrix.len(), 2);
    }

    #[test]
    fn test_off_grid_rows_not_indexed() {
        let matrix =
            HazardMatrix::from_records(vec![record(19.25, 73.0, 0.3)], DEFAULT_GRID_STEP).unwrap();
        assert!(matrix.lookup(19.25, 73.0).is_err());
    }

    #[test]
    fn test_invalid_grid_step() {
        let result = HazardMatrix::from_records(vec![], 0.0);
        assert!(matches!(result, Err(MatrixError::InvalidGridStep(_))));
    }
}
