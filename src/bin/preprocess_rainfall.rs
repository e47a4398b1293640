use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rain_hazard_service::config::PipelineConfig;
use rain_hazard_service::extracts::{NetcdfVariables, DEFAULT_EXTRACT_PATTERN};
use rain_hazard_service::hazard::assembler::DAYS_PER_YEAR;
use rain_hazard_service::hazard::{CompositeWeights, ExtremeThresholds, NormalizationOutcome};
use rain_hazard_service::matrix::MATRIX_FILE_NAME;
use rain_hazard_service::services::PreprocessService;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "preprocess-rainfall")]
#[command(about = "Build the composite rainfall hazard matrix from daily gridded extracts", long_about = None)]
struct Cli {
    /// Directory holding the daily extracts (CSV, or NetCDF with the `netcdf` feature)
    #[arg(long, env = "RAINFALL_DATA_DIR")]
    data_dir: PathBuf,

    /// Regex selecting extract file names; matches are read in lexical order
    #[arg(long, default_value = DEFAULT_EXTRACT_PATTERN)]
    pattern: String,

    /// First year of the record
    #[arg(long, default_value = "1910")]
    start_year: i32,

    /// Last year of the record (inclusive)
    #[arg(long, default_value = "2023")]
    end_year: i32,

    /// Minimum record length in years; shorter cells are dropped
    #[arg(long, default_value = "30")]
    min_years: usize,

    /// Output CSV (default: <data-dir>/preprocessed_composite_matrix.csv)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of extracts decoded concurrently
    #[arg(long, default_value = "5")]
    parallel: usize,

    /// Worker threads for per-cell computation (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Heavy rainfall threshold in mm/day (ER100)
    #[arg(long, default_value = "100")]
    heavy_mm: f64,

    /// Very heavy rainfall threshold in mm/day (ER150)
    #[arg(long, default_value = "150")]
    very_heavy_mm: f64,

    #[arg(long, default_value = "0.4")]
    drought_weight: f64,

    #[arg(long, default_value = "0.3")]
    extreme_weight: f64,

    #[arg(long, default_value = "0.3")]
    return_period_weight: f64,

    /// Source value marking a missing day
    #[arg(long, default_value = "-999", allow_hyphen_values = true)]
    fill_value: f32,

    /// Treat every finite value as data
    #[arg(long)]
    no_fill_value: bool,

    /// NetCDF latitude variable
    #[arg(long, default_value = "LATITUDE")]
    lat_var: String,

    /// NetCDF longitude variable
    #[arg(long, default_value = "LONGITUDE")]
    lon_var: String,

    /// NetCDF rainfall variable
    #[arg(long, default_value = "RAINFALL")]
    rain_var: String,
}

impl Cli {
    fn into_config(self) -> PipelineConfig {
        let mut config = PipelineConfig::new(self.data_dir);
        if let Some(output) = self.output {
            config.output_path = output;
        }
        config.extract_pattern = self.pattern;
        config.start_year = self.start_year;
        config.end_year = self.end_year;
        config.min_days = self.min_years * DAYS_PER_YEAR;
        config.parallel_reads = self.parallel;
        config.thresholds = ExtremeThresholds {
            heavy_mm: self.heavy_mm,
            very_heavy_mm: self.very_heavy_mm,
        };
        config.weights = CompositeWeights {
            drought: self.drought_weight,
            extreme_rainfall: self.extreme_weight,
            return_period: self.return_period_weight,
        };
        config.fill_value = (!self.no_fill_value).then_some(self.fill_value);
        config.netcdf_variables = NetcdfVariables {
            latitude: self.lat_var,
            longitude: self.lon_var,
            rainfall: self.rain_var,
        };
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
        info!("Using {} worker threads", threads);
    }

    let config = cli.into_config();
    info!(
        "Preprocessing {:?} ({}-{}, {} years)",
        config.data_dir,
        config.start_year,
        config.end_year,
        config.year_count()
    );

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );
    pb.set_message("Reading extracts...");

    let service = PreprocessService::new(config).with_progress(pb.clone());
    let stats = match service.run().await {
        Ok(stats) => stats,
        Err(e) => {
            pb.abandon_with_message("✗ Preprocessing failed");
            error!("Preprocessing failed: {}", e);
            return Err(e.into());
        }
    };
    pb.finish_with_message(format!("✓ Read {} extracts", stats.extracts_found));

    println!("\n{}", "=".repeat(60));
    println!("Preprocessing Summary");
    println!("{}", "=".repeat(60));
    println!("Extracts Found:     {}", stats.extracts_found);
    println!("Extracts Merged:    {}", stats.extracts_merged);
    println!("Extracts Skipped:   {}", stats.extracts_skipped);
    println!("{}", "-".repeat(60));
    println!("Cells Retained:     {}", stats.cells_retained);
    println!("Short Records:      {}", stats.insufficient_cells);
    println!("Fully Masked:       {}", stats.masked_cells);
    println!("Cells Written:      {}", stats.cells_written);
    match stats.outcome {
        NormalizationOutcome::Normalized {
            min_rp_avg,
            max_rp_avg,
        } => println!("RP_Avg Range:       {min_rp_avg:.2} - {max_rp_avg:.2} mm"),
        NormalizationOutcome::Degenerate { rp_avg } => {
            println!("RP_Avg Range:       degenerate ({rp_avg:.2} mm everywhere)")
        }
    }
    println!("{}", "-".repeat(60));
    println!("Output:             {:?}", stats.output_path);
    println!("Total Time:         {:.2}s", stats.duration_secs);
    println!("{}", "=".repeat(60));
    println!();

    if stats.output_path.file_name().and_then(|n| n.to_str()) != Some(MATRIX_FILE_NAME) {
        info!(
            "Matrix written under a custom name; set MATRIX_PATH={:?} for the service",
            stats.output_path
        );
    }

    Ok(())
}
