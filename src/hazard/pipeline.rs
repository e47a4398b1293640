use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::hazard::assembler::{AssembledGrid, CellSeries};
use crate::hazard::drought::DroughtProbabilityEstimator;
use crate::hazard::error::HazardError;
use crate::hazard::extreme::{ExtremeRainfallEstimator, ExtremeThresholds};
use crate::hazard::models::RawHazardRecord;
use crate::hazard::normalizer::{CompositeHazardNormalizer, CompositeWeights, NormalizedGrid};
use crate::hazard::partition::YearPartitioner;
use crate::hazard::return_period::ReturnPeriodEstimator;

/// Per-cell estimators plus the grid-wide normalizer
///
/// Cells are independent until normalization, so [`HazardPipeline::compute_raw_records`]
/// fans them out over the rayon pool. Each worker returns an owned record and the ordered
/// `collect` is the only reduction.
#[derive(Debug, Clone)]
pub struct HazardPipeline {
    partitioner: YearPartitioner,
    extreme: ExtremeRainfallEstimator,
    return_period: ReturnPeriodEstimator,
    drought: DroughtProbabilityEstimator,
    normalizer: CompositeHazardNormalizer,
}

impl HazardPipeline {
    pub fn new(
        partitioner: YearPartitioner,
        thresholds: ExtremeThresholds,
        weights: CompositeWeights,
    ) -> Self {
        Self {
            partitioner,
            extreme: ExtremeRainfallEstimator::new(thresholds),
            return_period: ReturnPeriodEstimator::default(),
            drought: DroughtProbabilityEstimator,
            normalizer: CompositeHazardNormalizer::new(weights),
        }
    }

    /// Pipeline with default thresholds and weights over an inclusive year span
    pub fn for_span(start_year: i32, end_year: i32) -> Result<Self, HazardError> {
        Ok(Self::new(
            YearPartitioner::from_span(start_year, end_year)?,
            ExtremeThresholds::default(),
            CompositeWeights::default(),
        ))
    }

    /// Raw indicators for one cell; `None` when partitioning leaves no year blocks
    pub fn compute_cell(&self, cell: &CellSeries) -> Option<RawHazardRecord> {
        let blocks = self.partitioner.partition(&cell.daily);
        if blocks.is_empty() {
            debug!(
                "Cell {},{} has no year blocks ({} days over {} years)",
                cell.point.lat,
                cell.point.lon,
                cell.total_days(),
                self.partitioner.year_count()
            );
            return None;
        }

        let annual_maxima: Vec<f64> = blocks.iter().map(|b| b.annual_maximum()).collect();
        let annual_totals: Vec<f64> = blocks.iter().map(|b| b.annual_total()).collect();

        Some(RawHazardRecord {
            point: cell.point,
            extreme: self.extreme.estimate(&cell.daily),
            return_levels: self.return_period.estimate(&annual_maxima)?.to_return_levels()?,
            drought: self.drought.estimate(&annual_totals)?,
        })
    }

    /// Pass 1 over every cell, in parallel, preserving cell order
    pub fn compute_raw_records(&self, cells: &[CellSeries]) -> Vec<RawHazardRecord> {
        cells
            .par_iter()
            .filter_map(|cell| self.compute_cell(cell))
            .collect()
    }

    /// Both passes: per-cell indicators, then the normalization barrier
    #[instrument(skip(self, grid), fields(cells = grid.cells.len()))]
    pub fn run(&self, grid: &AssembledGrid) -> Result<NormalizedGrid, HazardError> {
        let raw = self.compute_raw_records(&grid.cells);
        info!(
            "Computed raw indicators for {} of {} cells",
            raw.len(),
            grid.cells.len()
        );
        self.normalizer.normalize(&raw)
    }
}
