use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::hazard::models::HazardRecord;
use crate::matrix::{HazardMatrix, LookupError};

/// Coordinate lookups against the composite matrix loaded at startup
#[derive(Clone)]
pub struct HazardService {
    matrix: Arc<HazardMatrix>,
}

impl HazardService {
    pub fn new(matrix: Arc<HazardMatrix>) -> Self {
        Self { matrix }
    }

    /// Hazard indicators for the grid cell containing a coordinate
    #[instrument(skip(self))]
    pub fn get_hazards(&self, lat: f64, lon: f64) -> Result<HazardRecord, LookupError> {
        let record = self.matrix.lookup(lat, lon)?;
        debug!(
            "Matched {},{} to cell {},{}",
            lat, lon, record.lat, record.lon
        );
        Ok(record.clone())
    }

    pub fn cell_count(&self) -> usize {
        self.matrix.len()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.matrix.loaded_at()
    }
}
