//! Wide CSV extract reader
//!
//! Expected layout, one row per grid cell:
//! ```text
//! LAT,LON,D001,D002,...,D365
//! 8.0,77.0,0.0,12.5,...,3.1
//! 8.0,77.5,,0.0,...,NaN
//! ```
//! Day columns are in chronological order; their names are not interpreted. Empty
//! fields, `NA` and `NaN` are missing days.
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::extracts::error::ExtractError;
use crate::extracts::{CellSlice, ExtractReader, GridExtract};
use crate::hazard::models::GridPoint;

#[derive(Debug, Clone, Default)]
pub struct CsvExtractReader {
    fill_value: Option<f32>,
}

impl CsvExtractReader {
    /// `fill_value` marks missing days in addition to empty/NaN fields
    pub fn new(fill_value: Option<f32>) -> Self {
        Self { fill_value }
    }

    fn parse_row(&self, record: &StringRecord, row: usize) -> Result<CellSlice, ExtractError> {
        let lat = parse_coordinate(record, row, 0)?;
        let lon = parse_coordinate(record, row, 1)?;

        let values = record
            .iter()
            .enumerate()
            .skip(2)
            .map(|(col, field)| self.parse_rainfall(field, row, col))
            .collect::<Result<Vec<f32>, _>>()?;

        Ok(CellSlice {
            point: GridPoint::new(lat, lon),
            values,
        })
    }

    fn parse_rainfall(&self, field: &str, row: usize, col: usize) -> Result<f32, ExtractError> {
        if field.is_empty() || field.eq_ignore_ascii_case("na") {
            return Ok(f32::NAN);
        }
        let value = field
            .parse::<f32>()
            .map_err(|_| ExtractError::InvalidValue {
                row,
                col,
                msg: format!("Cannot parse rainfall value: {field}"),
            })?;

        match self.fill_value {
            Some(fill) if value == fill => Ok(f32::NAN),
            _ => Ok(value),
        }
    }
}

impl ExtractReader for CsvExtractReader {
    fn read(&self, path: &Path) -> Result<GridExtract, ExtractError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        if headers.len() < 2
            || !headers[0].eq_ignore_ascii_case("lat")
            || !headers[1].eq_ignore_ascii_case("lon")
        {
            return Err(ExtractError::InvalidHeader(format!(
                "expected LAT,LON,<days...>, got {:?}",
                headers.iter().take(3).collect::<Vec<_>>()
            )));
        }
        // Composite matrices share the LAT,LON prefix
        if headers
            .iter()
            .any(|h| h.eq_ignore_ascii_case("composite_hazard"))
        {
            return Err(ExtractError::InvalidHeader(
                "composite matrix, not a daily extract".to_string(),
            ));
        }

        let mut cells = Vec::new();
        for (row, record) in reader.records().enumerate() {
            cells.push(self.parse_row(&record?, row)?);
        }

        debug!(
            "Read CSV extract {:?}: {} cells x {} days",
            path,
            cells.len(),
            headers.len() - 2
        );

        Ok(GridExtract {
            source: path.to_path_buf(),
            cells,
        })
    }
}

fn parse_coordinate(record: &StringRecord, row: usize, col: usize) -> Result<f64, ExtractError> {
    let field = record.get(col).unwrap_or_default();
    field.parse::<f64>().map_err(|_| ExtractError::InvalidValue {
        row,
        col,
        msg: format!("Cannot parse coordinate: {field:?}"),
    })
}
