//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.liftlog.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".liftlog.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input data settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "workout_report.md".to_string()
}

/// Where the training log lives and how to read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path or `http(s)://` URL of the training log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// `chrono` format of the `Date` column.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Exercises hidden from every chart, table and lookup.
    #[serde(default)]
    pub excluded_exercises: Vec<String>,

    /// Timeout for fetching a remote log.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: None,
            date_format: default_date_format(),
            excluded_exercises: Vec::new(),
            fetch_timeout_seconds: default_fetch_timeout(),
        }
    }
}

fn default_date_format() -> String {
    crate::loader::DEFAULT_DATE_FORMAT.to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

/// Progress chart settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Render the chart at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Output path of the SVG.
    #[serde(default = "default_chart_path")]
    pub path: String,

    #[serde(default = "default_chart_width")]
    pub width: u32,

    #[serde(default = "default_chart_height")]
    pub height: u32,

    #[serde(default = "default_chart_title")]
    pub title: String,

    /// Y-axis caption.
    #[serde(default = "default_y_label")]
    pub y_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_chart_path(),
            width: default_chart_width(),
            height: default_chart_height(),
            title: default_chart_title(),
            y_label: default_y_label(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_chart_path() -> String {
    "weight_progress.svg".to_string()
}

fn default_chart_width() -> u32 {
    1280
}

fn default_chart_height() -> u32 {
    720
}

fn default_chart_title() -> String {
    "Working Weight Over Time".to_string()
}

fn default_y_label() -> String {
    "Weight (kg)".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Unit appended to every weight.
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            weight_unit: default_weight_unit(),
        }
    }
}

fn default_weight_unit() -> String {
    "kg".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load `.liftlog.toml` from `dir`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default(dir: &Path) -> Result<Option<Self>> {
        let default_path = dir.join(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(&default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings when given
    /// explicitly. Excluded exercises from both places are combined.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.data.source = Some(input.clone());
        }

        if let Some(ref format) = args.date_format {
            self.data.date_format = format.clone();
        }

        if let Some(ref excluded) = args.exclude {
            for name in excluded {
                let name = name.trim();
                if !name.is_empty() && !self.data.excluded_exercises.iter().any(|e| e == name) {
                    self.data.excluded_exercises.push(name.to_string());
                }
            }
        }

        if let Some(ref output) = args.output {
            self.general.output = output.to_string_lossy().to_string();
        }

        if let Some(ref chart) = args.chart {
            self.chart.path = chart.to_string_lossy().to_string();
            self.chart.enabled = true;
        }
        if args.no_chart {
            self.chart.enabled = false;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Effective log level. `--quiet` wins over a verbose config.
    pub fn log_level(&self, args: &crate::cli::Args) -> tracing::Level {
        if args.quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            args.log_level()
        }
    }

    /// The exclusion list as a set, ready for filtering.
    ///
    /// Names are trimmed to match the trimmed CSV cells.
    pub fn excluded_set(&self) -> HashSet<String> {
        self.data
            .excluded_exercises
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let mut config = Config::default();
        config.data.excluded_exercises = vec!["Barbell Row".to_string()];
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, "workout_report.md");
        assert_eq!(config.data.date_format, "%d/%m/%Y");
        assert!(config.data.excluded_exercises.is_empty());
        assert!(config.chart.enabled);
        assert_eq!(config.report.weight_unit, "kg");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "progress.md"
verbose = true

[data]
source = "documents/training_log.csv"
excluded_exercises = ["Barbell Row", "Face Pull"]

[chart]
width = 800
y_label = "Weight (lb)"

[report]
weight_unit = "lb"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "progress.md");
        assert!(config.general.verbose);
        assert_eq!(
            config.data.source.as_deref(),
            Some("documents/training_log.csv")
        );
        assert_eq!(config.data.date_format, "%d/%m/%Y");
        assert_eq!(config.chart.width, 800);
        assert_eq!(config.chart.height, 720);
        assert_eq!(config.chart.y_label, "Weight (lb)");
        assert_eq!(config.report.weight_unit, "lb");

        let excluded = config.excluded_set();
        assert!(excluded.contains("Barbell Row"));
        assert!(excluded.contains("Face Pull"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[data]\nexcluded_exercises = [\"Dips\"]\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data.excluded_exercises, vec!["Dips"]);

        std::fs::write(&path, "[data\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.data.excluded_exercises = vec!["Barbell Row".to_string()];

        let mut args = make_args();
        args.input = Some("log.csv".to_string());
        args.exclude = Some(vec!["Dips".to_string(), "Barbell Row".to_string()]);
        args.output = Some(PathBuf::from("out.json"));
        args.no_chart = true;

        config.merge_with_args(&args);

        assert_eq!(config.data.source.as_deref(), Some("log.csv"));
        assert_eq!(config.data.excluded_exercises, vec!["Barbell Row", "Dips"]);
        assert_eq!(config.general.output, "out.json");
        assert!(!config.chart.enabled);
    }

    #[test]
    fn test_merge_keeps_config_when_args_absent() {
        let mut config = Config::default();
        config.data.source = Some("from-config.csv".to_string());

        config.merge_with_args(&make_args());

        assert_eq!(config.data.source.as_deref(), Some("from-config.csv"));
        assert_eq!(config.general.output, "workout_report.md");
        assert!(config.chart.enabled);
    }

    #[test]
    fn test_load_default_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_default(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[data]\nexcluded_exercises = [\"Barbell Row\"]\n[chart\n",
        )
        .unwrap();
        assert!(Config::load_default(dir.path()).is_err());
    }

    #[test]
    fn test_excluded_set_trims_config_names() {
        let mut config = Config::default();
        config.data.excluded_exercises = vec![
            " Barbell Row ".to_string(),
            "Dips".to_string(),
            "  ".to_string(),
        ];

        let excluded = config.excluded_set();
        assert_eq!(excluded.len(), 2);
        assert!(excluded.contains("Barbell Row"));
        assert!(excluded.contains("Dips"));
    }

    #[test]
    fn test_log_level_honours_config_verbose() {
        let mut config = Config::default();
        let mut args = make_args();
        assert_eq!(config.log_level(&args), tracing::Level::INFO);

        config.general.verbose = true;
        assert_eq!(config.log_level(&args), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(config.log_level(&args), tracing::Level::ERROR);

        config.general.verbose = false;
        args.quiet = false;
        args.verbose = true;
        config.merge_with_args(&args);
        assert_eq!(config.log_level(&args), tracing::Level::DEBUG);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[chart]"));
        assert!(toml_str.contains("Barbell Row"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data.excluded_exercises, vec!["Barbell Row"]);
    }
}
