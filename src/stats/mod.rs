//! Stats module - cohort gap summary

mod gap;

pub use gap::{GapSummary, YearGap};
