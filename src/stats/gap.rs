//! Gap Summary Module
//! Per-year difference between the two cohorts plus descriptive statistics.

use crate::data::{round_to_tenth, ExtractedSeries};
use statrs::statistics::Statistics;

/// Gap for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct YearGap {
    pub label: String,
    pub first: f64,
    pub second: f64,
    /// `first - second` in percentage points, one decimal; `NaN` if either side is.
    pub gap: f64,
}

/// Gap statistics across all categories.
#[derive(Debug, Clone, PartialEq)]
pub struct GapSummary {
    pub years: Vec<YearGap>,
    /// Mean of the finite gaps, `NaN` when there are none.
    pub mean_gap: f64,
    /// Sample standard deviation of the finite gaps, `NaN` below two values.
    pub std_dev: f64,
    /// Index into `years` of the largest absolute gap.
    pub widest: Option<usize>,
    /// Index into `years` of the smallest absolute gap.
    pub narrowest: Option<usize>,
}

impl GapSummary {
    pub fn from_series(series: &ExtractedSeries) -> Self {
        let years: Vec<YearGap> = series
            .iter()
            .map(|point| YearGap {
                label: point.label.to_string(),
                first: point.first,
                second: point.second,
                gap: round_to_tenth(point.first - point.second),
            })
            .collect();

        let finite: Vec<(usize, f64)> = years
            .iter()
            .enumerate()
            .filter(|(_, y)| y.gap.is_finite())
            .map(|(i, y)| (i, y.gap))
            .collect();

        let gaps: Vec<f64> = finite.iter().map(|&(_, g)| g).collect();
        let (mean_gap, std_dev) = if gaps.is_empty() {
            (f64::NAN, f64::NAN)
        } else {
            (gaps.iter().mean(), gaps.iter().std_dev())
        };

        let by_magnitude = |a: &&(usize, f64), b: &&(usize, f64)| {
            a.1.abs()
                .partial_cmp(&b.1.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        };
        let widest = finite.iter().max_by(by_magnitude).map(|&(i, _)| i);
        let narrowest = finite.iter().min_by(by_magnitude).map(|&(i, _)| i);

        Self {
            years,
            mean_gap,
            std_dev,
            widest,
            narrowest,
        }
    }

    pub fn widest_year(&self) -> Option<&YearGap> {
        self.widest.and_then(|i| self.years.get(i))
    }

    pub fn narrowest_year(&self) -> Option<&YearGap> {
        self.narrowest.and_then(|i| self.years.get(i))
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}
