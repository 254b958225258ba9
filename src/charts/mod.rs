//! Charts module - chart description, interactive plot and static export

/// Thickness of one bar, in category units.
pub const BAR_THICKNESS: f64 = 0.38;
/// Space between the two bars of a category.
pub const BAR_GAP: f64 = 0.02;
/// Distance from the category center to each bar's center.
pub const BAR_OFFSET: f64 = (BAR_THICKNESS + BAR_GAP) / 2.0;

mod bar_chart;
mod plotter;
mod renderer;

pub use bar_chart::{parse_hex_color, BarChartSpec, Dataset, ValueAxis};
pub use plotter::ChartPlotter;
pub use renderer::{BarRect, RenderError, StaticChartRenderer};
