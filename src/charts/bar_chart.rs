//! Bar Chart Description
//! Plain data handed to chart collaborators. Serializes to a Chart.js config.

use crate::config::{GapChartConfig, LegendPosition, SeriesStyle};
use crate::data::ExtractedSeries;
use serde::Serialize;

/// Parse `#rrggbb` or `#rgb` into RGB components.
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        6 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some([channel(0)?, channel(2)?, channel(4)?])
        }
        3 => {
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 1], 16)
                    .ok()
                    .map(|v| v * 17)
            };
            Some([channel(0)?, channel(1)?, channel(2)?])
        }
        _ => None,
    }
}

/// One of the two datasets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    /// Non-finite values serialize as `null`.
    pub data: Vec<f64>,
    pub background_color: String,
    pub border_radius: f32,
}

impl Dataset {
    fn new(style: &SeriesStyle, data: &[f64]) -> Self {
        Self {
            label: style.label.clone(),
            data: data.to_vec(),
            background_color: style.color.clone(),
            border_radius: style.border_radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBody {
    pub labels: Vec<String>,
    pub datasets: [Dataset; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueAxis {
    pub min: f64,
    pub max: f64,
    pub title: AxisTitle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: ValueAxis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendOptions {
    pub position: LegendPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: LegendOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    /// `"y"` lays categories out vertically with horizontal bars.
    pub index_axis: String,
    pub responsive: bool,
    pub plugins: Plugins,
    pub scales: Scales,
}

/// Horizontal grouped bar chart: one label per category, exactly two datasets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ChartBody,
    pub options: ChartOptions,
    #[serde(skip)]
    pub value_suffix: String,
}

impl BarChartSpec {
    pub fn from_series(series: &ExtractedSeries, config: &GapChartConfig) -> Self {
        Self {
            kind: "bar".to_string(),
            data: ChartBody {
                labels: series.labels.clone(),
                datasets: [
                    Dataset::new(&config.first_series, &series.first),
                    Dataset::new(&config.second_series, &series.second),
                ],
            },
            options: ChartOptions {
                index_axis: "y".to_string(),
                responsive: true,
                plugins: Plugins {
                    legend: LegendOptions {
                        position: config.legend,
                    },
                },
                scales: Scales {
                    x: ValueAxis {
                        min: config.axis.min,
                        max: config.axis.max,
                        title: AxisTitle {
                            display: !config.axis.title.is_empty(),
                            text: config.axis.title.clone(),
                        },
                    },
                },
            },
            value_suffix: config.value_suffix.clone(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.data.labels
    }

    pub fn datasets(&self) -> &[Dataset; 2] {
        &self.data.datasets
    }

    pub fn value_axis(&self) -> &ValueAxis {
        &self.options.scales.x
    }

    pub fn legend_position(&self) -> LegendPosition {
        self.options.plugins.legend.position
    }

    pub fn is_empty(&self) -> bool {
        self.data.labels.is_empty()
    }

    /// Hover text for a bar, e.g. `" Elf students: 40.3%"`. `None` for missing values.
    pub fn tooltip_label(&self, dataset: usize, value: f64) -> Option<String> {
        if !value.is_finite() {
            return None;
        }
        let dataset = self.data.datasets.get(dataset)?;
        Some(format!(" {}: {}{}", dataset.label, value, self.value_suffix))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample() -> BarChartSpec {
        let series = ExtractedSeries {
            labels: vec!["2019".to_string(), "2020".to_string()],
            first: vec![55.2, f64::NAN],
            second: vec![40.0, 41.5],
        };
        BarChartSpec::from_series(&series, &GapChartConfig::default())
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#7a9e82"), Some([0x7a, 0x9e, 0x82]));
        assert_eq!(parse_hex_color("#C9A84C"), Some([0xc9, 0xa8, 0x4c]));
        assert_eq!(parse_hex_color("#fff"), Some([255, 255, 255]));
        assert_eq!(parse_hex_color("7a9e82"), None);
        assert_eq!(parse_hex_color("#7a9e8"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn builds_two_styled_datasets() {
        let spec = sample();
        let [first, second] = spec.datasets();

        assert_eq!(spec.labels(), &["2019".to_string(), "2020".to_string()]);
        assert_eq!(first.label, "Elf students");
        assert_eq!(first.background_color, "#7a9e82");
        assert_eq!(first.border_radius, 4.0);
        assert_eq!(second.label, "Dwarf students");
        assert_eq!(second.data, vec![40.0, 41.5]);
        assert_eq!(spec.value_axis().min, 15.0);
    }

    #[test]
    fn json_matches_chartjs_shape() {
        let json: Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();

        assert_eq!(json["type"], "bar");
        assert_eq!(json["options"]["indexAxis"], "y");
        assert_eq!(json["options"]["plugins"]["legend"]["position"], "bottom");
        assert_eq!(json["options"]["scales"]["x"]["max"], 65.0);
        assert_eq!(json["data"]["datasets"][0]["backgroundColor"], "#7a9e82");
        assert_eq!(json["data"]["datasets"][0]["borderRadius"], 4.0);
        assert_eq!(json["data"]["datasets"][0]["data"][1], Value::Null);
        assert!(json.get("value_suffix").is_none());
    }

    #[test]
    fn tooltip_format() {
        let spec = sample();
        assert_eq!(
            spec.tooltip_label(0, 55.2).as_deref(),
            Some(" Elf students: 55.2%")
        );
        assert_eq!(
            spec.tooltip_label(1, 40.0).as_deref(),
            Some(" Dwarf students: 40%")
        );
        assert_eq!(spec.tooltip_label(0, f64::NAN), None);
        assert_eq!(spec.tooltip_label(2, 10.0), None);
    }
}
