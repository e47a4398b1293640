// Composite matrix: the interchange artifact between preprocessing and the lookup service

pub mod artifact;
pub mod error;
pub mod lookup;

pub use artifact::{read_matrix, write_matrix, MATRIX_FILE_NAME};
pub use error::{LookupError, MatrixError};
pub use lookup::{GridKey, HazardMatrix, DEFAULT_GRID_STEP};
