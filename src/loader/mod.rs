//! Training log loading and normalization.
//!
//! This module reads the CSV training log (from disk or over HTTP),
//! turns each raw row into a typed [`Record`], and drops rows that
//! cannot be placed on the calendar.

use crate::models::{LoadSummary, LogSource, Record, TOP_SETS, WARMUP_SLOTS};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default format of the `Date` column.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Errors that leave the tool with no data to report on.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read training log {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch training log from {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("training log request to {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("no workout records found in {0}")]
    Empty(String),
}

/// Why a single row was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("missing exercise name")]
    MissingExercise,

    #[error("missing date")]
    MissingDate,

    #[error("invalid date '{value}' (expected {format})")]
    InvalidDate { value: String, format: String },
}

/// A row exactly as it appears in the CSV file.
///
/// Every column is optional so that files without warm-up or notes
/// columns still deserialize.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Exercise")]
    pub exercise: Option<String>,
    #[serde(rename = "WorkingWeight")]
    pub working_weight: Option<String>,
    #[serde(rename = "Reps1")]
    pub reps1: Option<String>,
    #[serde(rename = "Reps2")]
    pub reps2: Option<String>,
    #[serde(rename = "Reps3")]
    pub reps3: Option<String>,
    #[serde(rename = "WU1")]
    pub wu1: Option<String>,
    #[serde(rename = "WU2")]
    pub wu2: Option<String>,
    #[serde(rename = "WU3")]
    pub wu3: Option<String>,
    #[serde(rename = "WU4")]
    pub wu4: Option<String>,
    #[serde(rename = "WU5")]
    pub wu5: Option<String>,
    #[serde(rename = "WR1")]
    pub wr1: Option<String>,
    #[serde(rename = "WR2")]
    pub wr2: Option<String>,
    #[serde(rename = "WR3")]
    pub wr3: Option<String>,
    #[serde(rename = "WR4")]
    pub wr4: Option<String>,
    #[serde(rename = "WR5")]
    pub wr5: Option<String>,
    #[serde(rename = "Notes")]
    pub notes: Option<String>,
}

impl RawRecord {
    fn top_sets(&self) -> [Option<&str>; TOP_SETS] {
        [
            self.reps1.as_deref(),
            self.reps2.as_deref(),
            self.reps3.as_deref(),
        ]
    }

    fn warmup_weights(&self) -> [Option<&str>; WARMUP_SLOTS] {
        [
            self.wu1.as_deref(),
            self.wu2.as_deref(),
            self.wu3.as_deref(),
            self.wu4.as_deref(),
            self.wu5.as_deref(),
        ]
    }

    fn warmup_reps(&self) -> [Option<&str>; WARMUP_SLOTS] {
        [
            self.wr1.as_deref(),
            self.wr2.as_deref(),
            self.wr3.as_deref(),
            self.wr4.as_deref(),
            self.wr5.as_deref(),
        ]
    }

    /// Convert the raw row into a typed record.
    pub fn normalize(&self, date_format: &str) -> Result<Record, RowError> {
        let exercise = present(self.exercise.as_deref()).ok_or(RowError::MissingExercise)?;
        let date = parse_date(self.date.as_deref(), date_format)?;

        let mut record = Record::new(exercise, date, parse_weight(self.working_weight.as_deref()));
        record.reps = self.top_sets().map(parse_count);
        record.warmup_weights = self.warmup_weights().map(parse_load);
        record.warmup_reps = self.warmup_reps().map(parse_count);
        record.notes = present(self.notes.as_deref()).map(String::from);

        Ok(record)
    }
}

/// Options controlling how a log is loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// `chrono` format of the `Date` column.
    pub date_format: String,
    /// Timeout applied to HTTP fetches.
    pub fetch_timeout: Duration,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&crate::config::DataConfig> for LoadOptions {
    fn from(config: &crate::config::DataConfig) -> Self {
        Self {
            date_format: config.date_format.clone(),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_seconds),
        }
    }
}

/// The loaded record set: the single source of truth for a run.
#[derive(Debug, Clone)]
pub struct WorkoutLog {
    source: LogSource,
    records: Vec<Record>,
    summary: LoadSummary,
}

impl WorkoutLog {
    /// Wrap an already-normalized record set.
    pub fn new(source: LogSource, records: Vec<Record>, summary: LoadSummary) -> Self {
        Self {
            source,
            records,
            summary,
        }
    }

    pub fn source(&self) -> &LogSource {
        &self.source
    }

    /// Every loaded record, in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn summary(&self) -> LoadSummary {
        self.summary
    }

    /// Records not belonging to an excluded exercise.
    pub fn active(&self, excluded: &HashSet<String>) -> Vec<Record> {
        crate::analysis::filter_active(&self.records, excluded)
    }
}

/// Load and normalize a training log.
///
/// Resolves only once the whole file has been read and parsed; callers
/// render from the returned log and nothing else.
pub async fn load_log(source: &LogSource, options: &LoadOptions) -> Result<WorkoutLog, LoadError> {
    info!("Loading training log from {}", source);

    let text = match source {
        LogSource::File(path) => read_file(path).await?,
        LogSource::Url(url) => fetch_url(url, options.fetch_timeout).await?,
    };

    let (records, summary) = parse_log(&text, &options.date_format)?;
    if records.is_empty() {
        return Err(LoadError::Empty(source.to_string()));
    }

    info!(
        "Loaded {} records ({} rejected) from {}",
        summary.loaded, summary.rejected, source
    );

    Ok(WorkoutLog::new(source.clone(), records, summary))
}

async fn read_file(path: &str) -> Result<String, LoadError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: PathBuf::from(path),
            source,
        })
}

async fn fetch_url(url: &str, timeout: Duration) -> Result<String, LoadError> {
    let http = |source| LoadError::Http {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(http)?;

    let response = client.get(url).send().await.map_err(http)?;

    if !response.status().is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    response.text().await.map_err(http)
}

/// Parse CSV text into records, skipping rows without a usable date or exercise.
pub fn parse_log(text: &str, date_format: &str) -> Result<(Vec<Record>, LoadSummary), LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    let mut summary = LoadSummary::default();

    for (i, row) in reader.deserialize::<RawRecord>().enumerate() {
        let raw = row?;
        summary.rows_read += 1;
        // +2: one for the header, one for 1-based line numbers
        let line = i + 2;

        match raw.normalize(date_format) {
            Ok(record) => {
                debug!("Line {}: {} on {}", line, record.exercise, record.date_key());
                records.push(record);
            }
            Err(e) => {
                warn!("Skipping line {}: {}", line, e);
                summary.rejected += 1;
            }
        }
    }

    summary.loaded = records.len();
    Ok((records, summary))
}

/// Returns the trimmed value when the cell holds anything.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(value: Option<&str>, format: &str) -> Result<NaiveDate, RowError> {
    let value = present(value).ok_or(RowError::MissingDate)?;
    NaiveDate::parse_from_str(value, format).map_err(|_| RowError::InvalidDate {
        value: value.to_string(),
        format: format.to_string(),
    })
}

/// Working weight: anything that is not a finite, non-negative number becomes 0.
pub fn parse_weight(value: Option<&str>) -> f64 {
    parse_load(value).unwrap_or(0.0)
}

/// A weight cell, or `None` when blank or unusable.
fn parse_load(value: Option<&str>) -> Option<f64> {
    let value = present(value)?;
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => {
            debug!("Ignoring non-numeric weight '{}'", value);
            None
        }
    }
}

/// A repetition cell, or `None` when blank or unusable.
///
/// A logged `0` is kept. Fractional counts are truncated.
pub fn parse_count(value: Option<&str>) -> Option<u32> {
    let value = present(value)?;
    if let Ok(count) = value.parse::<u32>() {
        return Some(count);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v <= u32::MAX as f64 => Some(v as u32),
        _ => {
            debug!("Ignoring non-numeric rep count '{}'", value);
            None
        }
    }
}
