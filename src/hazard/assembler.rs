//! Per-cell daily series assembly
//!
//! Extracts are merged one at a time, in chronological order, into one accumulator per
//! grid cell. Each extract is read once for the whole grid rather than once per cell.
use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::extracts::{ExtractError, GridExtract};
use crate::hazard::models::{CellId, GridPoint};

/// Minimum record length for a cell to be retained: 30 years of 365 days
pub const MIN_YEARS: usize = 30;
pub const DAYS_PER_YEAR: usize = 365;

/// One grid cell's concatenated daily rainfall (mm), in source order
#[derive(Debug, Clone, PartialEq)]
pub struct CellSeries {
    pub point: GridPoint,
    pub daily: Vec<f32>,
}

impl CellSeries {
    pub fn total_days(&self) -> usize {
        self.daily.len()
    }

    /// True when no day carries a finite observation (masked/ocean cells)
    pub fn is_masked(&self) -> bool {
        !self.daily.iter().any(|v| v.is_finite())
    }
}

/// Result of assembling every extract
#[derive(Debug, Default)]
pub struct AssembledGrid {
    /// Retained cells in latitude-major order
    pub cells: Vec<CellSeries>,
    pub extracts_merged: usize,
    pub extracts_skipped: usize,
    pub insufficient_cells: usize,
    pub masked_cells: usize,
}

pub struct TimeSeriesAssembler {
    min_days: usize,
    cells: BTreeMap<CellId, CellSeries>,
    extracts_merged: usize,
    extracts_skipped: usize,
}

impl TimeSeriesAssembler {
    pub fn new(min_days: usize) -> Self {
        Self {
            min_days,
            cells: BTreeMap::new(),
            extracts_merged: 0,
            extracts_skipped: 0,
        }
    }

    /// Assembler with the 30-year minimum
    pub fn with_default_minimum() -> Self {
        Self::new(MIN_YEARS * DAYS_PER_YEAR)
    }

    /// Append every cell slice of one extract to its cell's series
    ///
    /// Must be called in chronological extract order; slices are appended as-is.
    pub fn merge_extract(&mut self, extract: GridExtract) {
        let slice_count = extract.cells.len();
        for slice in extract.cells {
            self.cells
                .entry(slice.point.cell_id())
                .and_modify(|series| series.daily.extend_from_slice(&slice.values))
                .or_insert_with(|| CellSeries {
                    point: slice.point,
                    daily: slice.values,
                });
        }
        self.extracts_merged += 1;
        debug!(
            "Merged extract {:?} ({} cells, {} accumulated)",
            extract.source,
            slice_count,
            self.cells.len()
        );
    }

    /// Note an extract that could not be read; the run carries on without it
    pub fn record_skipped(&mut self, path: &Path, error: &ExtractError) {
        warn!("Skipping unreadable extract {:?}: {}", path, error);
        self.extracts_skipped += 1;
    }

    /// Apply the data-sufficiency policy and hand back retained cells
    pub fn finish(self) -> AssembledGrid {
        let mut grid = AssembledGrid {
            extracts_merged: self.extracts_merged,
            extracts_skipped: self.extracts_skipped,
            ..AssembledGrid::default()
        };

        for series in self.cells.into_values() {
            if series.total_days() < self.min_days {
                grid.insufficient_cells += 1;
            } else if series.is_masked() {
                grid.masked_cells += 1;
            } else {
                grid.cells.push(series);
            }
        }

        info!(
            retained = grid.cells.len(),
            insufficient = grid.insufficient_cells,
            masked = grid.masked_cells,
            extracts_merged = grid.extracts_merged,
            extracts_skipped = grid.extracts_skipped,
            "Assembled daily series"
        );

        grid
    }
}
