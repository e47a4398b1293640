//! NetCDF gridded extract reader
//!
//! Reads one yearly gridded file with 1-D latitude/longitude coordinate variables and a
//! `TIME x LATITUDE x LONGITUDE` rainfall variable, the layout of IMD 0.25° daily grids.
use std::path::Path;

use tracing::debug;

use crate::extracts::error::ExtractError;
use crate::extracts::{CellSlice, ExtractReader, GridExtract, NetcdfVariables};
use crate::hazard::models::GridPoint;

#[derive(Debug, Clone, Default)]
pub struct NetcdfExtractReader {
    variables: NetcdfVariables,
    fill_value: Option<f32>,
}

impl NetcdfExtractReader {
    pub fn new(variables: NetcdfVariables, fill_value: Option<f32>) -> Self {
        Self {
            variables,
            fill_value,
        }
    }

    fn coordinate_values(file: &netcdf::File, name: &str) -> Result<Vec<f64>, ExtractError> {
        file.variable(name)
            .ok_or_else(|| ExtractError::MissingVariable(name.to_string()))?
            .get_values::<f64, _>(..)
            .map_err(|e| ExtractError::Netcdf(e.to_string()))
    }
}

impl ExtractReader for NetcdfExtractReader {
    fn read(&self, path: &Path) -> Result<GridExtract, ExtractError> {
        let file = netcdf::open(path).map_err(|e| ExtractError::Netcdf(e.to_string()))?;

        let lats = Self::coordinate_values(&file, &self.variables.latitude)?;
        let lons = Self::coordinate_values(&file, &self.variables.longitude)?;

        let rainfall = file
            .variable(&self.variables.rainfall)
            .ok_or_else(|| ExtractError::MissingVariable(self.variables.rainfall.clone()))?;

        let shape: Vec<usize> = rainfall.dimensions().iter().map(|d| d.len()).collect();
        if shape.len() != 3 || shape[1] != lats.len() || shape[2] != lons.len() {
            return Err(ExtractError::Netcdf(format!(
                "{} has shape {:?}, expected [time, {}, {}]",
                self.variables.rainfall,
                shape,
                lats.len(),
                lons.len()
            )));
        }

        let values = rainfall
            .get_values::<f32, _>(..)
            .map_err(|e| ExtractError::Netcdf(e.to_string()))?;

        let days = shape[0];
        let plane = lats.len() * lons.len();
        let mut cells = Vec::with_capacity(plane);

        for (i, &lat) in lats.iter().enumerate() {
            for (j, &lon) in lons.iter().enumerate() {
                let offset = i * lons.len() + j;
                let series = (0..days)
                    .map(|day| values[day * plane + offset])
                    .map(|v| match self.fill_value {
                        Some(fill) if v == fill => f32::NAN,
                        _ => v,
                    })
                    .collect();
                cells.push(CellSlice {
                    point: GridPoint::new(lat, lon),
                    values: series,
                });
            }
        }

        debug!(
            "Read NetCDF extract {:?}: {}x{} grid, {} days",
            path,
            lats.len(),
            lons.len(),
            days
        );

        Ok(GridExtract {
            source: path.to_path_buf(),
            cells,
        })
    }
}
