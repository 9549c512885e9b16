//! CLI entry point for the short-term count rater.
//!
//! Provides subcommands for running the full ratio estimation over a count
//! dataset and for listing the intersections a dataset contains.

use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use stc_rater::analyzers::error::AnalysisError;
use stc_rater::analyzers::pipeline::analyze_intersection;
use stc_rater::analyzers::types::{RunSummary, SkippedIntersection};
use stc_rater::config::AnalysisConfig;
use stc_rater::ingest::{load_counts, load_holidays, load_intersections};
use stc_rater::output::{write_errors, write_results, write_summary};
use tracing::Instrument;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "stc_rater")]
#[command(about = "A tool to rate short-term pedestrian count estimates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full estimation over a dataset and write the result tables
    Run(RunArgs),
    /// List the intersections found in a dataset
    ListIntersections(ListArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// Dataset name; resolves <data-path>/<DATASET>.csv plus the matching
    /// _intersections.csv and _holidays.csv side files
    #[arg(value_name = "DATASET", default_value = "milton")]
    dataset: String,

    /// Directory holding the dataset and its side files
    #[arg(short, long, default_value = "data")]
    data_path: String,

    /// Directory to write the result tables to
    #[arg(short, long, default_value = "outs")]
    out_path: String,

    /// First day of the analysis period (inclusive)
    #[arg(long, default_value = "2021-10-01")]
    start_date: NaiveDate,

    /// Last day of the analysis period (inclusive)
    #[arg(long, default_value = "2022-09-30")]
    end_date: NaiveDate,

    /// Hard cap on a single 15-minute directional count
    #[arg(long, default_value_t = 100)]
    max_15min: u32,

    /// Hard cap on an adjusted daily directional volume
    #[arg(long, default_value_t = 500.0)]
    max_24h: f64,

    /// Minimum valid 15-minute records for a day to count
    #[arg(long, default_value_t = 72)]
    min_24h: u32,

    /// Number of short-term count days per simulated estimate
    #[arg(long, default_value_t = 1)]
    stc_num: usize,

    /// Number of resampling trials when --stc-num is above 1
    #[arg(short, long, default_value_t = 100)]
    repeat: usize,

    /// Percentile reported alongside the error bounds
    #[arg(short, long, default_value_t = 85.0)]
    percentile: f64,

    /// Base random seed for the resampling trials
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Maximum number of intersections analyzed concurrently
    #[arg(short, long, default_value_t = 5)]
    concurrency: usize,

    /// Gzip compress the error table
    #[arg(long, default_value_t = false)]
    gzip: bool,
}

#[derive(Parser)]
struct ListArgs {
    /// Dataset name; resolves <data-path>/<DATASET>.csv
    #[arg(value_name = "DATASET", default_value = "milton")]
    dataset: String,

    /// Directory holding the dataset
    #[arg(short, long, default_value = "data")]
    data_path: String,

    /// First day of the analysis period (inclusive)
    #[arg(long, default_value = "2021-10-01")]
    start_date: NaiveDate,

    /// Last day of the analysis period (inclusive)
    #[arg(long, default_value = "2022-09-30")]
    end_date: NaiveDate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/stc_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("stc_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_analysis(&args).await?,
        Commands::ListIntersections(args) => list_intersections(&args)?,
    }

    Ok(())
}

/// Analyzes every listed intersection concurrently and writes the results,
/// errors, and summary outputs.
#[tracing::instrument(
    skip(args),
    fields(dataset = %args.dataset, stc_num = args.stc_num, repeat = args.repeat)
)]
async fn run_analysis(args: &RunArgs) -> Result<()> {
    if args.end_date < args.start_date {
        bail!(
            "end date {} precedes start date {}",
            args.end_date,
            args.start_date
        );
    }

    let config = AnalysisConfig {
        max_sub_interval: args.max_15min,
        max_daily_volume: args.max_24h,
        min_daily_samples: args.min_24h,
        sample_size: args.stc_num,
        repeat: args.repeat,
        percentile: args.percentile,
        seed: args.seed,
        ..AnalysisConfig::default()
    };
    config.validate()?;

    let data_file = format!("{}/{}.csv", args.data_path, args.dataset);
    let intersections_file = format!("{}/{}_intersections.csv", args.data_path, args.dataset);
    let holidays_file = format!("{}/{}_holidays.csv", args.data_path, args.dataset);

    let intersections = load_intersections(&intersections_file)?;
    let holidays = load_holidays(&holidays_file)?;
    info!(
        intersections = intersections.len(),
        holidays = holidays.len(),
        "Side inputs loaded"
    );

    let table = load_counts(&data_file, args.start_date, args.end_date)?;
    info!(
        records = table.record_count(),
        intersections = table.intersection_names().len(),
        skipped_rows = table.rows_skipped,
        "Count data loaded"
    );

    // Create output directory if it doesn't exist
    std::fs::create_dir_all(&args.out_path)?;

    let table = Arc::new(table);
    let holidays = Arc::new(holidays);
    let config = Arc::new(config);
    let semaphore = Arc::new(tokio::sync::Semaphore::new(args.concurrency));

    let mut tasks = vec![];

    for (index, name) in intersections.iter().enumerate() {
        let sem = semaphore.clone();
        let table = table.clone();
        let holidays = holidays.clone();
        let config = config.clone();
        let name = name.clone();

        let span = tracing::info_span!("analyze_intersection", intersection = %name);

        let task = tokio::spawn(
            async move {
                let _permit = sem.acquire().await.unwrap();

                // Offset the seed per intersection so runs stay reproducible
                // while intersections draw independent samples.
                let seed = config.seed.wrapping_add(index as u64);
                let outcome = match table.series(&name) {
                    Some(series) => analyze_intersection(&name, series, &holidays, &config, seed),
                    None => Err(AnalysisError::NoRecords),
                };
                (name, outcome)
            }
            .instrument(span),
        );

        tasks.push(task);
    }

    let mut results = Vec::new();
    let mut error_rows = Vec::new();
    let mut skipped = Vec::new();

    // Collect in spawn order so output rows follow the intersection list.
    for task in tasks {
        let (name, outcome) = task.await?;
        match outcome {
            Ok(analysis) => {
                info!(
                    intersection = %name,
                    valid_days = analysis.result.valid_daily_counts,
                    stc_days = analysis.result.valid_stc_days,
                    aadpt = analysis.result.aadpt,
                    "Intersection analyzed"
                );
                results.push(analysis.result);
                error_rows.extend(analysis.error_rows);
            }
            Err(e) => {
                warn!(intersection = %name, kind = e.kind(), error = %e, "Intersection skipped");
                skipped.push(SkippedIntersection {
                    intersection: name,
                    kind: e.kind().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let results_path = format!("{}/{}_results.csv", args.out_path, args.dataset);
    write_results(&results_path, &results)?;

    let errors_path = write_errors(
        &format!("{}/{}_errors.csv", args.out_path, args.dataset),
        &error_rows,
        args.gzip,
    )?;

    let summary = RunSummary {
        generated_at: Utc::now(),
        dataset: args.dataset.clone(),
        seed: args.seed,
        sample_size: args.stc_num,
        repeat: args.repeat,
        percentile: args.percentile,
        intersections_processed: results.len(),
        intersections_skipped: skipped.len(),
        skipped,
    };
    let summary_path = format!("{}/{}_summary.json", args.out_path, args.dataset);
    write_summary(&summary_path, &summary)?;

    info!(
        processed = summary.intersections_processed,
        skipped = summary.intersections_skipped,
        results = %results_path,
        errors = %errors_path,
        "Run complete"
    );

    Ok(())
}

/// Lists every intersection in the dataset with its record count and span.
fn list_intersections(args: &ListArgs) -> Result<()> {
    let data_file = format!("{}/{}.csv", args.data_path, args.dataset);
    let table = load_counts(&data_file, args.start_date, args.end_date)?;

    let names = table.intersection_names();
    for name in &names {
        let series = table.series(name).unwrap_or(&[]);
        let first = series
            .first()
            .map(|r| r.timestamp.date().to_string())
            .unwrap_or_default();
        let last = series
            .last()
            .map(|r| r.timestamp.date().to_string())
            .unwrap_or_default();

        info!(
            intersection = %name,
            records = series.len(),
            first = %first,
            last = %last,
            "Intersection"
        );
    }

    info!(
        total = names.len(),
        records = table.record_count(),
        "Intersection list summary"
    );

    Ok(())
}
