//! Gap Chart - good degree rate comparison across academic years
//!
//! Loads a CSV of per-year outcome percentages for two cohorts, extracts
//! index-aligned chart series and hands them to chart and report writers.

pub mod charts;
pub mod config;
pub mod data;
pub mod report;
pub mod stats;

pub use config::GapChartConfig;
pub use data::{extract_series, ColumnMap, DataLoader, DataSource, ExtractedSeries, Row};
