use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::config::PipelineConfig;
use crate::extracts::{discover_extracts, AnyExtractReader, ExtractReader};
use crate::hazard::{
    AssembledGrid, HazardError, HazardPipeline, NormalizationOutcome, TimeSeriesAssembler,
    YearPartitioner,
};
use crate::matrix::{write_matrix, MatrixError};

/// Error types for preprocessing runs
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("No extracts matching the pattern in {0:?}")]
    NoExtracts(PathBuf),

    #[error("Failed to list extracts: {0}")]
    Discovery(#[from] std::io::Error),

    #[error("Invalid extract pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Hazard computation failed: {0}")]
    Hazard(#[from] HazardError),

    #[error("Failed to write composite matrix: {0}")]
    Matrix(#[from] MatrixError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Summary of one preprocessing run
#[derive(Debug, Clone)]
pub struct PreprocessStats {
    pub extracts_found: usize,
    pub extracts_merged: usize,
    pub extracts_skipped: usize,
    pub cells_retained: usize,
    pub insufficient_cells: usize,
    pub masked_cells: usize,
    pub cells_written: usize,
    pub outcome: NormalizationOutcome,
    pub output_path: PathBuf,
    pub duration_secs: f64,
}

/// Builds the composite matrix from a directory of daily extracts
///
/// 1. Discovers extracts (lexical order = chronological order)
/// 2. Decodes them concurrently, merging each into the assembler in file order
/// 3. Computes per-cell indicators on the rayon pool
/// 4. Normalizes across the grid and writes the artifact
#[derive(Clone)]
pub struct PreprocessService {
    config: PipelineConfig,
    reader: Arc<dyn ExtractReader>,
    progress: Option<ProgressBar>,
}

impl PreprocessService {
    pub fn new(config: PipelineConfig) -> Self {
        let reader = AnyExtractReader::new(config.fill_value, config.netcdf_variables.clone());
        Self::with_reader(config, Arc::new(reader))
    }

    pub fn with_reader(config: PipelineConfig, reader: Arc<dyn ExtractReader>) -> Self {
        Self {
            config,
            reader,
            progress: None,
        }
    }

    /// Advance `progress` once per extract read
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Single pass over every extract, building all cell series at once
    #[instrument(skip(self), fields(data_dir = ?self.config.data_dir))]
    pub async fn assemble(&self) -> Result<(AssembledGrid, usize), PreprocessError> {
        let pattern = Regex::new(&self.config.extract_pattern)?;
        let mut files = discover_extracts(&self.config.data_dir, &pattern)?;
        // A previous run's matrix can sit in the data directory and match the pattern
        if let Ok(output) = std::fs::canonicalize(&self.config.output_path) {
            files.retain(|path| std::fs::canonicalize(path).map_or(true, |p| p != output));
        }
        if files.is_empty() {
            return Err(PreprocessError::NoExtracts(self.config.data_dir.clone()));
        }
        let extracts_found = files.len();

        if let Some(pb) = &self.progress {
            pb.set_length(extracts_found as u64);
        }

        let mut assembler = TimeSeriesAssembler::new(self.config.min_days);

        // `buffered` keeps results in file order while up to N extracts decode at once
        let mut decoded = stream::iter(files)
            .map(|path| {
                let reader = Arc::clone(&self.reader);
                async move {
                    let task_path = path.clone();
                    let result = tokio::task::spawn_blocking(move || reader.read(&task_path)).await;
                    (path, result)
                }
            })
            .buffered(self.config.parallel_reads.max(1));

        while let Some((path, result)) = decoded.next().await {
            match result? {
                Ok(extract) => assembler.merge_extract(extract),
                Err(e) => assembler.record_skipped(&path, &e),
            }
            if let Some(pb) = &self.progress {
                pb.inc(1);
            }
        }

        Ok((assembler.finish(), extracts_found))
    }

    /// Full run: assemble, compute, normalize, write
    #[instrument(skip(self), fields(output = ?self.config.output_path))]
    pub async fn run(&self) -> Result<PreprocessStats, PreprocessError> {
        let start_time = Instant::now();

        // Fail on a bad span before touching any extract
        let pipeline = HazardPipeline::new(
            YearPartitioner::from_span(self.config.start_year, self.config.end_year)?,
            self.config.thresholds,
            self.config.weights,
        );

        let (grid, extracts_found) = self.assemble().await?;
        if grid.extracts_skipped > 0 {
            warn!(
                "{} of {} extracts could not be read and were skipped",
                grid.extracts_skipped, extracts_found
            );
        }

        let extracts_merged = grid.extracts_merged;
        let extracts_skipped = grid.extracts_skipped;
        let cells_retained = grid.cells.len();
        let insufficient_cells = grid.insufficient_cells;
        let masked_cells = grid.masked_cells;

        info!("Computing hazard indicators for {} cells", cells_retained);
        let normalized = tokio::task::spawn_blocking(move || pipeline.run(&grid)).await??;

        let output_path = self.config.output_path.clone();
        let cells_written = normalized.records.len();
        let records = normalized.records;
        let write_path = output_path.clone();
        tokio::task::spawn_blocking(move || write_matrix(&write_path, &records)).await??;

        let stats = PreprocessStats {
            extracts_found,
            extracts_merged,
            extracts_skipped,
            cells_retained,
            insufficient_cells,
            masked_cells,
            cells_written,
            outcome: normalized.outcome,
            output_path,
            duration_secs: start_time.elapsed().as_secs_f64(),
        };

        info!(
            cells_written = stats.cells_written,
            extracts_skipped = stats.extracts_skipped,
            duration_secs = %format!("{:.2}", stats.duration_secs),
            "Preprocessing completed"
        );

        Ok(stats)
    }
}
