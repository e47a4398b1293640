// Composite matrix artifact: write, reload and look up

mod common;

use std::fs;

use common::sample_record;
use rain_hazard_service::matrix::{
    read_matrix, write_matrix, HazardMatrix, LookupError, MatrixError, DEFAULT_GRID_STEP,
    MATRIX_FILE_NAME,
};
use rain_hazard_service::services::HazardService;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_artifact_round_trip_serves_lookups() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join(MATRIX_FILE_NAME);
    let records = vec![
        sample_record(18.5, 73.5, 0.34561),
        sample_record(19.0, 73.0, 0.2),
    ];
    write_matrix(&path, &records).unwrap();

    let matrix = HazardMatrix::load(&path, DEFAULT_GRID_STEP).unwrap();
    assert_eq!(matrix.len(), 2);

    let hit = matrix.lookup(18.74, 73.26).unwrap();
    assert_eq!((hit.lat, hit.lon), (18.5, 73.5));
    assert_eq!(hit.composite_hazard, 0.3456);
}

#[test]
fn test_missing_artifact() {
    let dir = TempDir::new().unwrap();
    let result = HazardMatrix::load(&dir.path().join(MATRIX_FILE_NAME), DEFAULT_GRID_STEP);
    assert!(matches!(result, Err(MatrixError::NotFound(_))));
}

#[test]
fn test_truncated_artifact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(MATRIX_FILE_NAME);
    fs::write(&path, "LAT,LON,ER100\n18.5,73.5,0.1\n").unwrap();

    assert!(matches!(read_matrix(&path), Err(MatrixError::Csv(_))));
}

#[test]
fn test_off_grid_rows_are_not_matched() {
    // A 0.25 deg source cell never lines up with the 0.5 deg lookup grid
    let matrix = HazardMatrix::from_records(
        vec![sample_record(18.25, 73.25, 0.4), sample_record(18.5, 73.5, 0.3)],
        DEFAULT_GRID_STEP,
    )
    .unwrap();

    assert_eq!(matrix.len(), 2);
    let hit = matrix.lookup(18.3, 73.3).unwrap();
    assert_eq!(hit.composite_hazard, 0.3);
}

#[test]
fn test_duplicate_rows_keep_first() {
    let matrix = HazardMatrix::from_records(
        vec![sample_record(18.5, 73.5, 0.3), sample_record(18.5, 73.5, 0.9)],
        DEFAULT_GRID_STEP,
    )
    .unwrap();

    assert_eq!(matrix.lookup(18.5, 73.5).unwrap().composite_hazard, 0.3);
}

#[test]
fn test_invalid_grid_step() {
    let result = HazardMatrix::from_records(vec![], 0.0);
    assert!(matches!(result, Err(MatrixError::InvalidGridStep(_))));
}

#[test]
fn test_hazard_service_reports_misses() {
    let service = HazardService::new(Arc::new(common::sample_matrix()));

    assert_eq!(service.cell_count(), 4);
    assert_eq!(
        service.get_hazards(28.6, 77.2),
        Err(LookupError::NoData {
            lat: 28.5,
            lon: 77.0
        })
    );
    assert!(matches!(
        service.get_hazards(f64::NAN, 77.2),
        Err(LookupError::InvalidCoordinate { .. })
    ));
}
