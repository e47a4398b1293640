//! Composite matrix CSV artifact
//!
//! Columns: LAT, LON, ER100, ER150, ER_Prob, RP10, RP20, RP50, RP100, RP_Avg, RP_Prob,
//! P_D1, P_D2, P_D3, P_D4, Drought_Prob, Composite_Hazard.
use std::fs::{self, File};
use std::path::Path;

use tracing::{info, instrument};

use crate::hazard::models::HazardRecord;
use crate::matrix::error::MatrixError;

/// Default artifact file name
pub const MATRIX_FILE_NAME: &str = "preprocessed_composite_matrix.csv";

/// Write records rounded to the artifact's precision, creating parent directories
#[instrument(skip(records), fields(rows = records.len()))]
pub fn write_matrix(path: &Path, records: &[HazardRecord]) -> Result<(), MatrixError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_writer(File::create(path)?);
    for record in records {
        writer.serialize(record.rounded())?;
    }
    writer.flush()?;

    info!("Composite hazard matrix saved to {:?}", path);
    Ok(())
}

pub fn read_matrix(path: &Path) -> Result<Vec<HazardRecord>, MatrixError> {
    if !path.exists() {
        return Err(MatrixError::NotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize::<HazardRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    info!("Loaded {} rows from {:?}", records.len(), path);
    Ok(records)
}
