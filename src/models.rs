//! Data models for the workout log.
//!
//! This module contains the core data structures used throughout
//! the application for representing logged sets, derived views, and reports.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical date key used for lookups (`YYYY-MM-DD`).
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Date format used when presenting dates to the user.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Number of top sets recorded per row.
pub const TOP_SETS: usize = 3;

/// Number of warm-up slots recorded per row.
pub const WARMUP_SLOTS: usize = 5;

/// A single warm-up set: weight lifted and repetitions performed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarmupSet {
    pub weight: f64,
    pub reps: u32,
}

impl WarmupSet {
    /// Formats the set as `60kg x 5`.
    pub fn describe(&self, unit: &str) -> String {
        format!("{}{} x {}", format_weight(self.weight), unit, self.reps)
    }
}

/// One logged row: a session of a single exercise on a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Exercise name, compared case-sensitively.
    pub exercise: String,
    /// Calendar day the session took place.
    pub date: NaiveDate,
    /// Load used for the top sets. Never negative.
    pub working_weight: f64,
    /// Top-set repetition counts (`Reps1..Reps3`). `None` when not logged.
    pub reps: [Option<u32>; TOP_SETS],
    /// Warm-up weights (`WU1..WU5`).
    pub warmup_weights: [Option<f64>; WARMUP_SLOTS],
    /// Warm-up repetitions (`WR1..WR5`).
    pub warmup_reps: [Option<u32>; WARMUP_SLOTS],
    /// Free-text notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record {
    /// Creates a record with no reps, warm-ups or notes.
    pub fn new(exercise: impl Into<String>, date: NaiveDate, working_weight: f64) -> Self {
        Self {
            exercise: exercise.into(),
            date,
            working_weight,
            reps: [None; TOP_SETS],
            warmup_weights: [None; WARMUP_SLOTS],
            warmup_reps: [None; WARMUP_SLOTS],
            notes: None,
        }
    }

    /// Returns the canonical `YYYY-MM-DD` key of the record's date.
    pub fn date_key(&self) -> String {
        self.date.format(DATE_KEY_FORMAT).to_string()
    }

    /// Top-set reps that were actually logged, in column order.
    ///
    /// A logged zero is kept; only absent cells are skipped.
    pub fn logged_reps(&self) -> Vec<u32> {
        self.reps.iter().flatten().copied().collect()
    }

    /// Warm-up sets where both weight and reps were logged, in slot order.
    pub fn warmup_sets(&self) -> Vec<WarmupSet> {
        self.warmup_weights
            .iter()
            .zip(self.warmup_reps.iter())
            .filter_map(|(weight, reps)| match (weight, reps) {
                (Some(weight), Some(reps)) => Some(WarmupSet {
                    weight: *weight,
                    reps: *reps,
                }),
                _ => None,
            })
            .collect()
    }

    /// Total repetitions contributed by this record.
    ///
    /// Sums the three top sets and all five warm-up rep cells; every
    /// absent cell contributes zero on its own.
    pub fn rep_total(&self) -> u64 {
        self.reps
            .iter()
            .chain(self.warmup_reps.iter())
            .map(|r| r.map(u64::from).unwrap_or(0))
            .sum()
    }
}

/// A single point of an exercise's progress series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub weight: f64,
}

/// Working weight over time for one exercise, sorted by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSeries {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl ExerciseSeries {
    /// Weight of the earliest session.
    pub fn first_weight(&self) -> Option<f64> {
        self.points.first().map(|p| p.weight)
    }

    /// Weight of the latest session.
    pub fn last_weight(&self) -> Option<f64> {
        self.points.last().map(|p| p.weight)
    }

    /// Change in working weight between the first and last session.
    pub fn change(&self) -> Option<f64> {
        Some(self.last_weight()? - self.first_weight()?)
    }
}

/// Lifetime repetitions logged for one exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepTotal {
    pub exercise: String,
    pub total: u64,
}

/// Heaviest working weight logged for an exercise and the day it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBest {
    pub exercise: String,
    pub weight: f64,
    pub date: NaiveDate,
}

/// Display decomposition of a record matched by a date lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetail {
    pub exercise: String,
    pub working_weight: f64,
    pub warmups: Vec<WarmupSet>,
    pub sets: Vec<u32>,
    /// Notes text, or [`SessionDetail::NO_NOTES`] when none were logged.
    pub notes: String,
}

impl SessionDetail {
    /// Shown when a record has no notes.
    pub const NO_NOTES: &'static str = "None";

    /// Shown when a record has no warm-up sets.
    pub const NO_WARMUPS: &'static str = "None";

    /// Builds the detail view of a single record.
    pub fn from_record(record: &Record) -> Self {
        let notes = record
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(Self::NO_NOTES)
            .to_string();

        Self {
            exercise: record.exercise.clone(),
            working_weight: record.working_weight,
            warmups: record.warmup_sets(),
            sets: record.logged_reps(),
            notes,
        }
    }

    /// Warm-ups joined as `40kg x 8, 50kg x 5`, or `None`.
    pub fn warmups_line(&self, unit: &str) -> String {
        if self.warmups.is_empty() {
            return Self::NO_WARMUPS.to_string();
        }
        self.warmups
            .iter()
            .map(|w| w.describe(unit))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Top sets as `60kg x 5, 5, 5`; reps read `0` when none were logged.
    pub fn sets_line(&self, unit: &str) -> String {
        let reps = if self.sets.is_empty() {
            "0".to_string()
        } else {
            self.sets
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("{}{} x {}", format_weight(self.working_weight), unit, reps)
    }
}

/// Result of looking up a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateLookup {
    /// The lookup key as supplied (`YYYY-MM-DD`).
    pub date: String,
    pub sessions: Vec<SessionDetail>,
}

impl DateLookup {
    /// Whether nothing was logged that day.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Row counts produced by loading a log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Data rows read from the file (header excluded).
    pub rows_read: usize,
    /// Rows that became records.
    pub loaded: usize,
    /// Rows dropped because they had no usable date or exercise.
    pub rejected: usize,
}

/// Where a workout log came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum LogSource {
    File(String),
    Url(String),
}

impl LogSource {
    /// Classifies an input string as a URL or a filesystem path.
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            LogSource::Url(input.to_string())
        } else {
            LogSource::File(input.to_string())
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSource::File(path) => write!(f, "{}", path),
            LogSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the log was loaded from.
    pub source: LogSource,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Loader row counts.
    pub load: LoadSummary,
    /// Records removed by the exclusion list.
    pub records_excluded: usize,
    /// Records that fed the aggregations.
    pub active_records: usize,
    /// Earliest active session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_date: Option<NaiveDate>,
    /// Latest active session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_date: Option<NaiveDate>,
    /// Exercises hidden from every view, sorted.
    pub excluded_exercises: Vec<String>,
    /// Unit appended to weights.
    pub weight_unit: String,
}

/// The complete workout report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutReport {
    pub metadata: ReportMetadata,
    pub series: Vec<ExerciseSeries>,
    pub total_reps: Vec<RepTotal>,
    pub personal_bests: Vec<PersonalBest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<DateLookup>,
}

/// Formats a weight without a trailing `.0` (`60`, `62.5`).
pub fn format_weight(weight: f64) -> String {
    format!("{}", weight)
}
