//! LiftLog - Training Log Analyzer
//!
//! A CLI tool that reads a CSV workout log and produces a progress
//! chart, rep totals, personal bests and per-day workout details.
//!
//! Exit codes:
//!   0 - Success (including a date lookup with no sessions)
//!   1 - Runtime error (bad arguments, config, load failure, etc.)

mod analysis;
mod chart;
mod cli;
mod config;
mod loader;
mod models;
mod report;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use loader::{LoadOptions, WorkoutLog};
use models::{LogSource, Record, ReportMetadata, WorkoutReport};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `general.verbose` applies
    let mut config = match load_config(&args, Path::new(".")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(config.log_level(&args));

    info!("LiftLog v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run_report(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .liftlog.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the log source, excluded exercises, and chart options.");
    Ok(())
}

/// Initialize logging at the given level.
///
/// `RUST_LOG` takes precedence over the level implied by flags and config.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load the log, aggregate it, and write the chart and report.
async fn run_report(args: Args, config: Config) -> Result<i32> {
    let input = config.data.source.clone().ok_or_else(|| {
        anyhow!(
            "No training log given: pass --input or set data.source in {}",
            CONFIG_FILE_NAME
        )
    })?;
    let source = LogSource::parse(&input);

    // Step 1: Load the log. Nothing below runs until it has fully resolved.
    println!("📥 Loading training log: {}", source);
    let options = LoadOptions::from(&config.data);
    let log = loader::load_log(&source, &options)
        .await
        .context("No data: the training log could not be loaded")?;

    // Step 2: Aggregate the active records
    let excluded = config.excluded_set();
    let active = log.active(&excluded);
    info!(
        "{} active records ({} excluded)",
        active.len(),
        log.records().len() - active.len()
    );

    let lookup_key = args.lookup_date().map(|d| d.format(models::DATE_KEY_FORMAT).to_string());
    let report = build_report(&log, &active, &config, lookup_key.as_deref());

    // Step 3: Chart
    let mut chart_saved = None;
    if config.chart.enabled {
        let path = PathBuf::from(&config.chart.path);
        let chart_options = chart::ChartOptions::from(&config.chart);
        match chart::render_svg(&report.series, &path, &chart_options) {
            Ok(()) => {
                info!("Chart saved to {}", path.display());
                chart_saved = Some(path);
            }
            Err(e) => warn!("Skipping chart: {:#}", e),
        }
    }

    // Step 4: Report
    let output_path = report_path(&args, &config);
    match args.format {
        OutputFormat::Json => {
            let json = report::generate_json_report(&report)?;
            std::fs::write(&output_path, json).with_context(|| {
                format!("Failed to write report to {}", output_path.display())
            })?;
        }
        OutputFormat::Markdown => {
            report::write_report(&report, &output_path).with_context(|| {
                format!("Failed to write report to {}", output_path.display())
            })?;
        }
    }

    // Print summary
    let load = report.metadata.load;
    println!("\n📊 Training Summary:");
    println!(
        "   Records: {} loaded | {} skipped | {} excluded",
        load.loaded, load.rejected, report.metadata.records_excluded
    );
    for line in report::generate_console_summary(&report).lines() {
        println!("   {}", line);
    }

    if let Some(ref lookup) = report.lookup {
        println!("\n📅 Workout on {}:", lookup.date);
        for line in report::generate_lookup_text(lookup, &report.metadata.weight_unit).lines() {
            println!("   {}", line);
        }
    }

    if let Some(path) = chart_saved {
        println!("\n📈 Chart: {}", path.display());
    }
    println!("\n✅ Report saved to: {}", output_path.display());

    Ok(0)
}

/// Assemble the full report from the loaded log and its active records.
fn build_report(
    log: &WorkoutLog,
    active: &[Record],
    config: &Config,
    lookup_key: Option<&str>,
) -> WorkoutReport {
    let mut excluded_exercises = config.data.excluded_exercises.clone();
    excluded_exercises.sort();

    let range = analysis::date_range(active);

    let metadata = ReportMetadata {
        source: log.source().clone(),
        generated_at: Utc::now(),
        load: log.summary(),
        records_excluded: log.records().len() - active.len(),
        active_records: active.len(),
        first_date: range.map(|(first, _)| first),
        last_date: range.map(|(_, last)| last),
        excluded_exercises,
        weight_unit: config.report.weight_unit.clone(),
    };

    WorkoutReport {
        metadata,
        series: analysis::group_series(active),
        total_reps: analysis::total_reps(active),
        personal_bests: analysis::personal_bests(active),
        lookup: lookup_key.map(|key| analysis::lookup_sessions(active, key)),
    }
}

/// Where the report goes. JSON output gets a `.json` name unless one was given.
fn report_path(args: &Args, config: &Config) -> PathBuf {
    let path = PathBuf::from(&config.general.output);
    if args.output.is_none() && args.format == OutputFormat::Json {
        return path.with_extension("json");
    }
    path
}

/// Load configuration from `--config`, else from `.liftlog.toml` in `dir`, else defaults.
///
/// A config file that exists but can't be read or parsed is an error.
fn load_config(args: &Args, dir: &Path) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    let config = Config::load_default(dir)
        .with_context(|| format!("Failed to load {}", CONFIG_FILE_NAME))?;
    Ok(config.unwrap_or_default())
}
