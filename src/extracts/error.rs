use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid value at row {row}, col {col}: {msg}")]
    InvalidValue { row: usize, col: usize, msg: String },

    #[error("Variable not found: {0}")]
    MissingVariable(String),

    #[error("NetCDF error: {0}")]
    Netcdf(String),

    #[error("Unsupported extract format: {0:?}")]
    Unsupported(PathBuf),

    #[error("NetCDF support not compiled in (enable the `netcdf` feature): {0:?}")]
    NetcdfDisabled(PathBuf),
}
