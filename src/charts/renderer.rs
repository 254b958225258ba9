//! Static Chart Renderer
//! Draws the grouped horizontal bar chart to PNG or SVG with plotters.
//!
//! Layout:
//! 1. Plot area: category labels on the left, value axis with title below
//! 2. Legend strip: colored swatch + dataset label, above or below the plot

use crate::charts::{parse_hex_color, BarChartSpec, BAR_GAP, BAR_THICKNESS};
use crate::config::LegendPosition;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;
use tracing::info;

const LEGEND_HEIGHT: i32 = 36;
const SWATCH: i32 = 14;
const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to render: the chart has no categories")]
    Empty,
    #[error("Unsupported image format: {0:?} (expected .png or .svg)")]
    UnsupportedFormat(String),
    #[error("Drawing failed: {0}")]
    Draw(String),
}

/// One bar in chart coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub category: usize,
    pub dataset: usize,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Category center on the y axis; the first category is drawn on top.
    pub fn category_center(index: usize, count: usize) -> f64 {
        count.saturating_sub(index + 1) as f64
    }

    /// Bar geometry. Missing values and values at or below the axis minimum draw nothing.
    pub fn bar_layout(spec: &BarChartSpec) -> Vec<BarRect> {
        let axis = spec.value_axis();
        let count = spec.labels().len();
        let mut rects = Vec::new();

        for (dataset_index, dataset) in spec.datasets().iter().enumerate() {
            for (category, &value) in dataset.data.iter().enumerate().take(count) {
                if !value.is_finite() {
                    continue;
                }
                let x1 = value.min(axis.max);
                if x1 <= axis.min {
                    continue;
                }

                let center = Self::category_center(category, count);
                let (y0, y1) = if dataset_index == 0 {
                    (center + BAR_GAP / 2.0, center + BAR_GAP / 2.0 + BAR_THICKNESS)
                } else {
                    (center - BAR_GAP / 2.0 - BAR_THICKNESS, center - BAR_GAP / 2.0)
                };

                rects.push(BarRect {
                    category,
                    dataset: dataset_index,
                    x0: axis.min,
                    x1,
                    y0,
                    y1,
                });
            }
        }

        rects
    }

    /// Render to `path`; the extension picks PNG or SVG.
    pub fn render_to_file(
        spec: &BarChartSpec,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if spec.is_empty() {
            return Err(RenderError::Empty);
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "png" => {
                let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
                Self::draw_chart(&root, spec).map_err(draw_error)?;
                root.present().map_err(draw_error)?;
            }
            "svg" => {
                let root = SVGBackend::new(path, (width, height)).into_drawing_area();
                Self::draw_chart(&root, spec).map_err(draw_error)?;
                root.present().map_err(draw_error)?;
            }
            _ => return Err(RenderError::UnsupportedFormat(ext)),
        }

        info!(path = %path.display(), width, height, "chart image written");
        Ok(())
    }

    /// Render to an SVG document held in memory.
    pub fn render_svg_string(
        spec: &BarChartSpec,
        width: u32,
        height: u32,
    ) -> Result<String, RenderError> {
        if spec.is_empty() {
            return Err(RenderError::Empty);
        }

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            Self::draw_chart(&root, spec).map_err(draw_error)?;
            root.present().map_err(draw_error)?;
        }
        Ok(svg)
    }

    fn draw_chart<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &BarChartSpec,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let (_, height) = root.dim_in_pixel();
        let legend_on_top = spec.legend_position() == LegendPosition::Top;
        let (plot_area, legend_area) = if legend_on_top {
            let (legend, plot) = root.split_vertically(LEGEND_HEIGHT);
            (plot, legend)
        } else {
            root.split_vertically((height as i32 - LEGEND_HEIGHT).max(0))
        };

        let axis = spec.value_axis();
        let labels = spec.labels();
        let count = labels.len();
        let label_style = TextStyle::from((FONT, 13).into_font());
        let label_width = labels
            .iter()
            .map(|l| root.estimate_text_size(l, &label_style).map(|(w, _)| w))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .max()
            .unwrap_or(0);

        let mut chart = ChartBuilder::on(&plot_area)
            .margin(16)
            .x_label_area_size(44)
            .y_label_area_size(label_width as i32 + 16)
            .build_cartesian_2d(axis.min..axis.max, -0.5f64..(count as f64 - 0.5))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_label_formatter(&|_: &f64| String::new())
            .x_desc(axis.title.text.as_str())
            .axis_desc_style((FONT, 14))
            .label_style((FONT, 12))
            .draw()?;

        let layout = Self::bar_layout(spec);
        for (dataset_index, dataset) in spec.datasets().iter().enumerate() {
            let color = rgb(&dataset.background_color);
            chart.draw_series(
                layout
                    .iter()
                    .filter(|r| r.dataset == dataset_index)
                    .map(|r| Rectangle::new([(r.x0, r.y0), (r.x1, r.y1)], color.filled())),
            )?;
        }

        let anchored = label_style.pos(Pos::new(HPos::Right, VPos::Center));
        for (i, label) in labels.iter().enumerate() {
            let (px, py) = chart.backend_coord(&(axis.min, Self::category_center(i, count)));
            root.draw(&Text::new(label.clone(), (px - 8, py), anchored.clone()))?;
        }

        Self::draw_legend(&legend_area, spec)
    }

    fn draw_legend<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        spec: &BarChartSpec,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let (width, height) = area.dim_in_pixel();
        let text_style = TextStyle::from((FONT, 13).into_font())
            .pos(Pos::new(HPos::Left, VPos::Center));
        let spacing = 24i32;

        let mut entries = Vec::with_capacity(2);
        for dataset in spec.datasets() {
            let (w, _) = area.estimate_text_size(&dataset.label, &text_style)?;
            entries.push((dataset, SWATCH + 6 + w as i32));
        }
        let total: i32 = entries.iter().map(|(_, w)| w).sum::<i32>() + spacing;

        let mut x = match spec.legend_position() {
            LegendPosition::Left => 16,
            LegendPosition::Right => width as i32 - total - 16,
            _ => (width as i32 - total) / 2,
        };
        let cy = height as i32 / 2;

        for (dataset, entry_width) in entries {
            area.draw(&Rectangle::new(
                [(x, cy - SWATCH / 2), (x + SWATCH, cy + SWATCH / 2)],
                rgb(&dataset.background_color).filled(),
            ))?;
            area.draw(&Text::new(
                dataset.label.clone(),
                (x + SWATCH + 6, cy),
                text_style.clone(),
            ))?;
            x += entry_width + spacing;
        }

        Ok(())
    }
}

fn rgb(hex: &str) -> RGBColor {
    let [r, g, b] = parse_hex_color(hex).unwrap_or([128, 128, 128]);
    RGBColor(r, g, b)
}

fn draw_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(err.to_string())
}
