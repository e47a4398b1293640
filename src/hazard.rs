// Grid-cell hazard extraction
//
// Daily extracts are assembled into one series per grid cell, sliced into nominal
// years, reduced to extreme-rainfall, return-period and drought indicators, then
// normalized across the whole grid into a composite hazard score.

pub mod assembler;
pub mod drought;
pub mod error;
pub mod extreme;
pub mod models;
pub mod normalizer;
pub mod partition;
pub mod pipeline;
pub mod return_period;

pub use assembler::{AssembledGrid, CellSeries, TimeSeriesAssembler};
pub use drought::DroughtProbabilityEstimator;
pub use error::HazardError;
pub use extreme::{ExtremeRainfallEstimator, ExtremeThresholds};
pub use models::*;
pub use normalizer::{
    CompositeHazardNormalizer, CompositeWeights, NormalizationOutcome, NormalizedGrid,
    DEFAULT_COMPOSITE_WEIGHTS,
};
pub use partition::{YearBlock, YearPartitioner};
pub use pipeline::HazardPipeline;
pub use return_period::{ReturnPeriodEstimate, ReturnPeriodEstimator, DEFAULT_RETURN_PERIODS};
