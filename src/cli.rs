//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::DATE_KEY_FORMAT;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// LiftLog - progress charts and personal bests from a training log
///
/// Reads a CSV workout log, draws working weight over time for every
/// exercise, and reports total reps and personal bests.
///
/// Examples:
///   liftlog --input documents/training_log.csv
///   liftlog --input https://example.com/training_log.csv --format json
///   liftlog --input training_log.csv --exclude "Barbell Row" --date 2024-01-08
///   liftlog --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Training log to read (file path or http(s) URL)
    ///
    /// Falls back to `data.source` in .liftlog.toml when omitted.
    #[arg(short, long, value_name = "PATH|URL", env = "LIFTLOG_INPUT")]
    pub input: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .liftlog.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path for the SVG progress chart
    #[arg(long, value_name = "FILE", conflicts_with = "no_chart")]
    pub chart: Option<PathBuf>,

    /// Do not render the progress chart
    #[arg(long)]
    pub no_chart: bool,

    /// Exercises to leave out of every view (comma-separated)
    ///
    /// Added to `data.excluded_exercises` from the config file.
    /// Example: --exclude "Barbell Row,Face Pull"
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Show every set logged on this day (YYYY-MM-DD)
    #[arg(short, long, value_name = "DATE")]
    pub date: Option<String>,

    /// Format of the Date column in the log (chrono syntax)
    #[arg(long, value_name = "FMT")]
    pub date_format: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .liftlog.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref date) = self.date {
            if self.lookup_date().is_none() {
                return Err(format!("Invalid --date '{}': expected YYYY-MM-DD", date));
            }
        }

        if let Some(ref input) = self.input {
            if input.trim().is_empty() {
                return Err("Input must not be empty".to_string());
            }
        }

        if let Some(ref format) = self.date_format {
            if format.trim().is_empty() {
                return Err("Date format must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// The requested lookup date, if it is a valid calendar day.
    pub fn lookup_date(&self) -> Option<NaiveDate> {
        let date = self.date.as_deref()?;
        NaiveDate::parse_from_str(date.trim(), DATE_KEY_FORMAT).ok()
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
