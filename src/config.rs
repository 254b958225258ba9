//! Configuration Module
//! Chart, data source and report settings, read from an optional JSON file.

use crate::charts::parse_hex_color;
use crate::data::ColumnMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Default config file, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "gapchart.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Presentation of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub label: String,
    /// `#rrggbb` or `#rgb`.
    pub color: String,
    pub border_radius: f32,
}

/// Value axis range and title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub min: f64,
    pub max: f64,
    pub title: String,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            min: 15.0,
            max: 65.0,
            title: "Good degree rate: First or 2:1 (%)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

/// Decorative marker appended to report sub-headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrnamentConfig {
    /// Class token selecting the decorated elements.
    pub class_name: String,
    pub glyph: String,
    pub color: String,
    pub font_size: String,
}

impl Default for OrnamentConfig {
    fn default() -> Self {
        Self {
            class_name: "sub-h2".to_string(),
            glyph: "\u{2726}".to_string(),
            color: "#c9a84c".to_string(),
            font_size: "0.85rem".to_string(),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapChartConfig {
    /// File path or http(s) URL loaded at startup.
    pub source: Option<String>,
    pub columns: ColumnMap,
    pub first_series: SeriesStyle,
    pub second_series: SeriesStyle,
    pub axis: AxisConfig,
    pub legend: LegendPosition,
    /// Appended to values in tooltips and tables.
    pub value_suffix: String,
    pub fetch_timeout_secs: u64,
    pub report_title: String,
    pub ornament: OrnamentConfig,
}

impl Default for GapChartConfig {
    fn default() -> Self {
        Self {
            source: None,
            columns: ColumnMap::default(),
            first_series: SeriesStyle {
                label: "Elf students".to_string(),
                color: "#7a9e82".to_string(),
                border_radius: 4.0,
            },
            second_series: SeriesStyle {
                label: "Dwarf students".to_string(),
                color: "#c9a84c".to_string(),
                border_radius: 4.0,
            },
            axis: AxisConfig::default(),
            legend: LegendPosition::default(),
            value_suffix: "%".to_string(),
            fetch_timeout_secs: 30,
            report_title: "Degree outcome gap".to_string(),
            ornament: OrnamentConfig::default(),
        }
    }
}

impl GapChartConfig {
    /// Read and validate a JSON config. Absent keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file means defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for color in [
            &self.first_series.color,
            &self.second_series.color,
            &self.ornament.color,
        ] {
            if parse_hex_color(color).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "color {color:?} is not #rrggbb or #rgb"
                )));
            }
        }

        if !(self.axis.min.is_finite() && self.axis.max.is_finite())
            || self.axis.min >= self.axis.max
        {
            return Err(ConfigError::Invalid(format!(
                "axis min {} must be below max {}",
                self.axis.min, self.axis.max
            )));
        }

        if self.columns.first == self.columns.second {
            return Err(ConfigError::Invalid(format!(
                "both series read column {:?}",
                self.columns.first
            )));
        }

        if self.columns.label.is_empty() {
            return Err(ConfigError::Invalid("label column is empty".to_string()));
        }

        if self.ornament.class_name.split_whitespace().count() != 1 {
            return Err(ConfigError::Invalid(format!(
                "ornament class {:?} must be a single class token",
                self.ornament.class_name
            )));
        }

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GapChartConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.columns.label, "academic_year");
        assert_eq!(config.axis.min, 15.0);
        assert_eq!(config.axis.max, 65.0);
        assert_eq!(config.legend, LegendPosition::Bottom);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GapChartConfig::from_json(
            r#"{ "source": "data/gap.csv", "axis": { "max": 80 }, "legend": "top" }"#,
        )
        .unwrap();

        assert_eq!(config.source.as_deref(), Some("data/gap.csv"));
        assert_eq!(config.axis.min, 15.0);
        assert_eq!(config.axis.max, 80.0);
        assert_eq!(config.legend, LegendPosition::Top);
        assert_eq!(config.first_series.label, "Elf students");
    }

    #[test]
    fn rejects_bad_color() {
        let mut config = GapChartConfig::default();
        config.second_series.color = "goldenrod".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_inverted_axis() {
        let err = GapChartConfig::from_json(r#"{ "axis": { "min": 70, "max": 20 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_same_column_twice() {
        let mut config = GapChartConfig::default();
        config.columns.second = config.columns.first.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            GapChartConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn json_round_trip() {
        let config = GapChartConfig::default();
        let back = GapChartConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = GapChartConfig::load_or_default(Path::new("does/not/exist.json")).unwrap();
        assert_eq!(config, GapChartConfig::default());
    }
}
