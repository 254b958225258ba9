//! Series Extractor Module
//! Turns parsed rows into one label series and two index-aligned value series.

use super::Row;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Values at or beyond this magnitude carry no fractional digits in an f64.
const ROUNDING_LIMIT: f64 = 1e15;

/// Which columns feed the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Category column; rows without a value here are dropped.
    pub label: String,
    pub first: String,
    pub second: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            label: "academic_year".to_string(),
            first: "elf_good".to_string(),
            second: "dwarf_good".to_string(),
        }
    }
}

impl ColumnMap {
    pub fn new(
        label: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// All configured column names, label first.
    pub fn names(&self) -> [&str; 3] {
        [&self.label, &self.first, &self.second]
    }
}

/// Label and value series, aligned by index.
///
/// `first` and `second` hold one-decimal percentages; a cell that failed to
/// parse is `NaN` in its slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedSeries {
    pub labels: Vec<String>,
    pub first: Vec<f64>,
    pub second: Vec<f64>,
}

/// One category of an [`ExtractedSeries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint<'a> {
    pub label: &'a str,
    pub first: f64,
    pub second: f64,
}

impl ExtractedSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SeriesPoint<'_>> + '_ {
        self.labels
            .iter()
            .zip(self.first.iter().zip(self.second.iter()))
            .map(|(label, (&first, &second))| SeriesPoint {
                label,
                first,
                second,
            })
    }

}

/// Extract chart series from rows.
///
/// Rows whose label cell is missing or empty are skipped entirely. Input order
/// is kept, since it decides category order on the chart axis. Never fails:
/// malformed percentages become `NaN`.
pub fn extract_series(rows: &[Row], columns: &ColumnMap) -> ExtractedSeries {
    let mut series = ExtractedSeries {
        labels: Vec::with_capacity(rows.len()),
        first: Vec::with_capacity(rows.len()),
        second: Vec::with_capacity(rows.len()),
    };
    let mut skipped = 0usize;

    for row in rows {
        let Some(label) = row.get(&columns.label).filter(|label| !label.is_empty()) else {
            skipped += 1;
            continue;
        };

        series.labels.push(label.to_string());
        series.first.push(percentage_cell(row, &columns.first));
        series.second.push(percentage_cell(row, &columns.second));
    }

    debug!(
        kept = series.len(),
        skipped,
        label_column = %columns.label,
        "extracted chart series"
    );
    series
}

fn percentage_cell(row: &Row, column: &str) -> f64 {
    row.get(column)
        .map(parse_percentage)
        .map(round_to_tenth)
        .unwrap_or(f64::NAN)
}

/// Parse a percentage cell such as `"42.3"`, `" 42.3 "` or `"42.3%"`.
///
/// Anything else, including spelled-out `inf` or `NaN`, yields `NaN`.
pub fn parse_percentage(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').map(str::trim_end).unwrap_or(trimmed);
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(f64::NAN)
}

/// Round to one decimal place, halves away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_LIMIT {
        return value;
    }
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: &str, first: &str, second: &str) -> Row {
        [
            ("academic_year", year),
            ("elf_good", first),
            ("dwarf_good", second),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn drops_rows_without_label_and_rounds() {
        let rows = vec![row("", "50", "30"), row("2020", "40.25", "20.05")];
        let series = extract_series(&rows, &ColumnMap::default());

        assert_eq!(series.labels, vec!["2020"]);
        assert_eq!(series.first, vec![40.3]);
        assert_eq!(series.second, vec![20.1]);
    }

    #[test]
    fn missing_label_column_is_excluded() {
        let rows: Vec<Row> = vec![
            [("elf_good", "50"), ("dwarf_good", "30")].into_iter().collect(),
            row("2021", "41", "22"),
        ];
        let series = extract_series(&rows, &ColumnMap::default());
        assert_eq!(series.labels, vec!["2021"]);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn keeps_input_order() {
        let rows = vec![
            row("2019", "60", "10"),
            row("2020", "20", "50"),
            row("2021", "35", "35"),
        ];
        let series = extract_series(&rows, &ColumnMap::default());
        assert_eq!(series.labels, vec!["2019", "2020", "2021"]);
        assert_eq!(series.first, vec![60.0, 20.0, 35.0]);
    }

    #[test]
    fn malformed_value_becomes_nan_in_its_slot_only() {
        let rows = vec![row("2022", "n/a", "10.0")];
        let series = extract_series(&rows, &ColumnMap::default());

        assert_eq!(series.len(), 1);
        assert!(series.first[0].is_nan());
        assert_eq!(series.second[0], 10.0);
    }

    #[test]
    fn spelled_out_infinity_becomes_nan() {
        let rows = vec![row("2019", "inf", "NaN"), row("2020", "infinity", "1e2")];
        let series = extract_series(&rows, &ColumnMap::default());

        assert!(series.first.iter().all(|v| v.is_nan()));
        assert!(series.second[0].is_nan());
        assert_eq!(series.second[1], 100.0);
    }

    #[test]
    fn missing_value_column_becomes_nan() {
        let rows: Vec<Row> = vec![[("academic_year", "2023"), ("elf_good", "44.44")]
            .into_iter()
            .collect()];
        let series = extract_series(&rows, &ColumnMap::default());
        assert_eq!(series.first, vec![44.4]);
        assert!(series.second[0].is_nan());
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = extract_series(&[], &ColumnMap::default());
        assert!(series.is_empty());
        assert!(series.first.is_empty());
        assert!(series.second.is_empty());
    }

    #[test]
    fn extraction_is_repeatable() {
        let rows = vec![row("2019", "12.34", "n/a"), row("2020", "56.78", "9.99")];
        let columns = ColumnMap::default();
        let a = extract_series(&rows, &columns);
        let b = extract_series(&rows, &columns);

        assert_eq!(a.labels, b.labels);
        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.first), bits(&b.first));
        assert_eq!(bits(&a.second), bits(&b.second));
    }

    #[test]
    fn custom_columns() {
        let rows: Vec<Row> = vec![[("year", "2018"), ("a", "1.06"), ("b", "2")]
            .into_iter()
            .collect()];
        let series = extract_series(&rows, &ColumnMap::new("year", "a", "b"));
        assert_eq!(series.labels, vec!["2018"]);
        assert_eq!(series.first, vec![1.1]);
        assert_eq!(series.second, vec![2.0]);
    }

    #[test]
    fn parse_percentage_variants() {
        assert_eq!(parse_percentage("42.3"), 42.3);
        assert_eq!(parse_percentage("  42.3 "), 42.3);
        assert_eq!(parse_percentage("42.3%"), 42.3);
        assert_eq!(parse_percentage("-5"), -5.0);
        assert!(parse_percentage("").is_nan());
        assert!(parse_percentage("abc").is_nan());
        assert!(parse_percentage("%").is_nan());
        assert!(parse_percentage("inf").is_nan());
        assert!(parse_percentage("+Infinity").is_nan());
        assert!(parse_percentage("-INF%").is_nan());
        assert!(parse_percentage("NaN").is_nan());
        assert_eq!(parse_percentage("1e2"), 100.0);
    }

    #[test]
    fn rounding_halves_away_from_zero() {
        assert_eq!(round_to_tenth(40.25), 40.3);
        assert_eq!(round_to_tenth(-40.25), -40.3);
        assert_eq!(round_to_tenth(0.04), 0.0);
        assert!(round_to_tenth(f64::NAN).is_nan());
        assert_eq!(round_to_tenth(f64::INFINITY), f64::INFINITY);
        assert_eq!(round_to_tenth(1e300), 1e300);
    }

    #[test]
    fn iter_zips_points() {
        let rows = vec![row("2019", "50", "40")];
        let series = extract_series(&rows, &ColumnMap::default());
        let points: Vec<_> = series.iter().collect();
        assert_eq!(
            points,
            vec![SeriesPoint {
                label: "2019",
                first: 50.0,
                second: 40.0
            }]
        );
    }
}
