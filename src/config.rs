use std::env;
use std::path::PathBuf;

use crate::extracts::{NetcdfVariables, DEFAULT_EXTRACT_PATTERN};
use crate::hazard::assembler::{DAYS_PER_YEAR, MIN_YEARS};
use crate::hazard::{CompositeWeights, ExtremeThresholds};
use crate::matrix::{DEFAULT_GRID_STEP, MATRIX_FILE_NAME};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Lookup service configuration, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub matrix_path: PathBuf,
    pub server_host: String,
    pub server_port: u16,
    pub lookup_grid_step: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup_grid_step = match env::var("LOOKUP_GRID_STEP") {
            Ok(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|step| step.is_finite() && *step > 0.0)
                .ok_or(ConfigError::Invalid {
                    name: "LOOKUP_GRID_STEP",
                    value: raw,
                })?,
            Err(_) => DEFAULT_GRID_STEP,
        };

        Ok(Config {
            matrix_path: env::var("MATRIX_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_matrix_path()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            lookup_grid_step,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

pub fn default_matrix_path() -> PathBuf {
    PathBuf::from("data").join(MATRIX_FILE_NAME)
}

/// Preprocessing run configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub extract_pattern: String,
    pub output_path: PathBuf,
    pub start_year: i32,
    pub end_year: i32,
    /// Cells with fewer days than this are dropped
    pub min_days: usize,
    pub thresholds: ExtremeThresholds,
    pub weights: CompositeWeights,
    /// Source value marking a missing day (IMD grids use -999)
    pub fill_value: Option<f32>,
    pub netcdf_variables: NetcdfVariables,
    /// Extracts decoded concurrently
    pub parallel_reads: usize,
}

impl PipelineConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            output_path: data_dir.join(MATRIX_FILE_NAME),
            data_dir,
            extract_pattern: DEFAULT_EXTRACT_PATTERN.to_string(),
            start_year: 1910,
            end_year: 2023,
            min_days: MIN_YEARS * DAYS_PER_YEAR,
            thresholds: ExtremeThresholds::default(),
            weights: CompositeWeights::default(),
            fill_value: Some(-999.0),
            netcdf_variables: NetcdfVariables::default(),
            parallel_reads: 5,
        }
    }

    pub fn year_count(&self) -> i64 {
        i64::from(self.end_year) - i64::from(self.start_year) + 1
    }
}
