// Gridded daily rainfall extracts
//
// An extract is one source file covering the whole grid for a contiguous run of days
// (typically one year). Extracts are ordered chronologically by file name.

pub mod csv_extract;
pub mod error;
#[cfg(feature = "netcdf")]
pub mod netcdf_extract;

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

pub use csv_extract::CsvExtractReader;
pub use error::ExtractError;
#[cfg(feature = "netcdf")]
pub use netcdf_extract::NetcdfExtractReader;

use crate::hazard::models::GridPoint;

/// Default filename filter for extract discovery
pub const DEFAULT_EXTRACT_PATTERN: &str = r"\.(csv|nc)$";

/// One grid cell's daily values from a single extract, in day order
#[derive(Debug, Clone, PartialEq)]
pub struct CellSlice {
    pub point: GridPoint,
    pub values: Vec<f32>,
}

/// Every cell slice decoded from one extract file
#[derive(Debug, Clone)]
pub struct GridExtract {
    pub source: PathBuf,
    pub cells: Vec<CellSlice>,
}

/// Decodes one extract file into per-cell slices
pub trait ExtractReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<GridExtract, ExtractError>;
}

/// Variable names inside NetCDF extracts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetcdfVariables {
    pub latitude: String,
    pub longitude: String,
    pub rainfall: String,
}

impl Default for NetcdfVariables {
    fn default() -> Self {
        Self {
            latitude: "LATITUDE".to_string(),
            longitude: "LONGITUDE".to_string(),
            rainfall: "RAINFALL".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractFormat {
    Csv,
    Netcdf,
}

impl ExtractFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(ExtractFormat::Csv),
            "nc" | "nc4" => Some(ExtractFormat::Netcdf),
            _ => None,
        }
    }
}

/// Picks the decoder from the file extension
#[derive(Debug, Clone, Default)]
pub struct AnyExtractReader {
    fill_value: Option<f32>,
    #[cfg_attr(not(feature = "netcdf"), allow(dead_code))]
    netcdf_variables: NetcdfVariables,
}

impl AnyExtractReader {
    pub fn new(fill_value: Option<f32>, netcdf_variables: NetcdfVariables) -> Self {
        Self {
            fill_value,
            netcdf_variables,
        }
    }
}

impl ExtractReader for AnyExtractReader {
    fn read(&self, path: &Path) -> Result<GridExtract, ExtractError> {
        match ExtractFormat::from_path(path) {
            Some(ExtractFormat::Csv) => CsvExtractReader::new(self.fill_value).read(path),
            #[cfg(feature = "netcdf")]
            Some(ExtractFormat::Netcdf) => {
                NetcdfExtractReader::new(self.netcdf_variables.clone(), self.fill_value).read(path)
            }
            #[cfg(not(feature = "netcdf"))]
            Some(ExtractFormat::Netcdf) => Err(ExtractError::NetcdfDisabled(path.to_path_buf())),
            None => Err(ExtractError::Unsupported(path.to_path_buf())),
        }
    }
}

/// List extract files in `dir` whose name matches `pattern`, in lexical name order
///
/// Lexical order is taken as chronological order, so names must sort by date
/// (e.g. `RF25_ind1910_rfp25.nc`, `RF25_ind1911_rfp25.nc`, ...).
pub fn discover_extracts(dir: &Path, pattern: &Regex) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| pattern.is_match(name));
        if matches {
            files.push(path);
        } else {
            debug!("Ignoring {:?}: name does not match {}", path, pattern);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    info!("Discovered {} extracts in {:?}", files.len(), dir);
    Ok(files)
}
