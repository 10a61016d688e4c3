//! Heatmap service configuration.
//!
//! Loaded from a YAML file (with `${VAR}` / `${VAR:-default}` substitution)
//! or, when no file is given, from `HEATMAP_*` environment variables on top
//! of the defaults. Command-line flags are applied last by the binary.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use climate_common::PipelineOptions;
use serde::{Deserialize, Serialize};
use station_parser::{CsvLayout, Element, Granularity, UshcnFilter};
use tracing::Level;

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// Delimited station export
    #[default]
    Csv,
    /// USHCN daily fixed-width file
    Ushcn,
}

/// Top-level heatmap configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Palette table (colorbrewer JSON)
    pub palettes: Option<PathBuf>,

    /// Directory the rendered PNG is written to
    pub output_dir: PathBuf,

    pub logging: LoggingConfig,

    pub input: InputConfig,

    pub options: PipelineOptions,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            palettes: None,
            output_dir: PathBuf::from("."),
            logging: LoggingConfig::default(),
            input: InputConfig::default(),
            options: PipelineOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Parsed log level; unknown names fall back to INFO.
    pub fn max_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}

/// How the input file is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub format: InputFormat,

    /// Column layout of delimited exports
    pub csv: CsvLayout,

    /// USHCN station to keep; all stations when unset
    pub station: Option<String>,

    /// USHCN element to keep
    pub element: Element,

    /// Treat quality-flagged USHCN values as missing
    pub reject_flagged: bool,

    /// Daily rows (366 columns) or monthly rows (12 columns)
    pub granularity: Granularity,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            format: InputFormat::Csv,
            csv: CsvLayout::default(),
            station: None,
            element: Element::Tmax,
            reject_flagged: true,
            granularity: Granularity::Daily,
        }
    }
}

impl InputConfig {
    pub fn ushcn_filter(&self) -> UshcnFilter {
        let filter = UshcnFilter::new(self.element)
            .granularity(self.granularity)
            .reject_flagged(self.reject_flagged);
        match &self.station {
            Some(station) => filter.station(station.clone()),
            None => filter,
        }
    }
}

impl HeatmapConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;
        let config: HeatmapConfig =
            serde_yaml::from_str(&expanded).context("Failed to parse config YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(palettes) = env::var("HEATMAP_PALETTES") {
            config.palettes = Some(PathBuf::from(palettes));
        }
        if let Ok(dir) = env::var("HEATMAP_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(level) = env::var("HEATMAP_LOG_LEVEL") {
            config.logging.level = level;
        }
        config
    }

    pub fn validate(&self) -> Result<()> {
        self.options.validate().context("Invalid pipeline options")?;
        Ok(())
    }

    /// Palette table path, or an error naming both ways to set it.
    pub fn palettes_path(&self) -> Result<&Path> {
        self.palettes
            .as_deref()
            .context("No palette table configured; set `palettes` or HEATMAP_PALETTES")
    }
}

/// Expand environment variables in YAML content.
/// Supports ${VAR} and ${VAR:-default} syntax
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .with_context(|| format!("Unclosed variable substitution: ${{{}", after))?;
        result.push_str(&resolve_var_expr(&after[..end])?);
        rest = &after[end + 1..];
    }
    result.push_str(rest);

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_vars_simple() {
        env::set_var("HEATMAP_TEST_STATION", "btv");
        let result = expand_env_vars("station: ${HEATMAP_TEST_STATION}\n").unwrap();
        assert_eq!(result, "station: btv\n");
    }

    #[test]
    fn test_expand_env_vars_with_default() {
        env::remove_var("HEATMAP_TEST_UNSET");
        let result = expand_env_vars("dir: ${HEATMAP_TEST_UNSET:-/tmp/out}").unwrap();
        assert_eq!(result, "dir: /tmp/out");
    }

    #[test]
    fn test_expand_env_vars_missing_required() {
        env::remove_var("HEATMAP_TEST_REQUIRED");
        assert!(expand_env_vars("${HEATMAP_TEST_REQUIRED}").is_err());
        assert!(expand_env_vars("${HEATMAP_TEST_REQUIRED").is_err());
    }

    #[test]
    fn test_yaml_sections() {
        let config = HeatmapConfig::from_yaml(
            r#"
palettes: /etc/heatmap/colorbrewer.json
output_dir: out
logging:
  level: debug
input:
  format: ushcn
  station: "300042"
  element: TMIN
  granularity: monthly
options:
  palette: Spectral
  recursion: 1
  fill_null: false
"#,
        )
        .unwrap();

        assert_eq!(config.palettes, Some(PathBuf::from("/etc/heatmap/colorbrewer.json")));
        assert_eq!(config.logging.max_level(), Level::DEBUG);
        assert_eq!(config.input.format, InputFormat::Ushcn);
        assert_eq!(config.input.element, Element::Tmin);
        assert_eq!(config.input.granularity, Granularity::Monthly);
        assert_eq!(config.options.palette, "Spectral");
        assert!(!config.options.fill_null);
        assert_eq!(config.options.bins, 8);

        let filter = config.input.ushcn_filter();
        assert_eq!(filter.station.as_deref(), Some("300042"));
        assert_eq!(filter.element, Element::Tmin);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let err = HeatmapConfig::from_yaml("options:\n  continuity: 2.0\n").unwrap_err();
        assert!(format!("{err:#}").contains("continuity"));
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let logging = LoggingConfig {
            level: "chatty".to_string(),
            json: false,
        };
        assert_eq!(logging.max_level(), Level::INFO);
    }

    #[test]
    fn test_missing_palettes_path() {
        assert!(HeatmapConfig::default().palettes_path().is_err());
    }
}
