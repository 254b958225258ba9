//! Chart Plotter Module
//! Interactive horizontal bar chart and gap table using egui_plot.

use crate::charts::{parse_hex_color, BarChartSpec, BAR_OFFSET, BAR_THICKNESS};
use crate::config::LegendPosition;
use crate::stats::GapSummary;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Corner, GridMark, Legend, Plot};

/// Positive gaps favour the first cohort.
const GAP_POSITIVE: Color32 = Color32::from_rgb(122, 158, 130);
const GAP_NEGATIVE: Color32 = Color32::from_rgb(220, 53, 69);

/// Draws the interactive bar chart and its companion widgets.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Dataset color, gray if the configured value does not parse.
    pub fn series_color(hex: &str) -> Color32 {
        parse_hex_color(hex)
            .map(|[r, g, b]| Color32::from_rgb(r, g, b))
            .unwrap_or(Color32::GRAY)
    }

    /// Plot position of a category; the first category sits at the top.
    pub fn category_position(index: usize, count: usize) -> f64 {
        count.saturating_sub(index + 1) as f64
    }

    /// Category index for a y-axis mark, if it lands on one.
    pub fn category_at(value: f64, count: usize) -> Option<usize> {
        let rounded = value.round();
        if (value - rounded).abs() > 1e-6 || rounded < 0.0 || rounded >= count as f64 {
            return None;
        }
        Some(count - 1 - rounded as usize)
    }

    /// Bars for one dataset. Missing values get no bar; the rest are clamped to the axis.
    pub fn bars_for(spec: &BarChartSpec, dataset_index: usize) -> Vec<Bar> {
        let Some(dataset) = spec.datasets().get(dataset_index) else {
            return Vec::new();
        };
        let axis = spec.value_axis();
        let count = spec.labels().len();
        let offset = if dataset_index == 0 {
            BAR_OFFSET
        } else {
            -BAR_OFFSET
        };

        dataset
            .data
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| {
                let length = v.clamp(axis.min, axis.max) - axis.min;
                let name = spec.tooltip_label(dataset_index, v).unwrap_or_default();
                Bar::new(Self::category_position(i, count) + offset, length)
                    .base_offset(axis.min)
                    .width(BAR_THICKNESS)
                    .name(name)
            })
            .collect()
    }

    fn legend_corner(position: LegendPosition) -> Corner {
        match position {
            LegendPosition::Top => Corner::LeftTop,
            LegendPosition::Bottom => Corner::LeftBottom,
            LegendPosition::Left => Corner::LeftTop,
            LegendPosition::Right => Corner::RightTop,
        }
    }

    /// Draw the grouped horizontal bar chart.
    pub fn draw_bar_chart(ui: &mut egui::Ui, spec: &BarChartSpec, height: f32) {
        let labels = spec.labels().to_vec();
        let count = labels.len();
        let axis = spec.value_axis();

        let charts: Vec<BarChart> = spec
            .datasets()
            .iter()
            .enumerate()
            .map(|(i, dataset)| {
                BarChart::new(Self::bars_for(spec, i))
                    .horizontal()
                    .color(Self::series_color(&dataset.background_color))
                    .name(&dataset.label)
                    .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| bar.name.clone()))
            })
            .collect();

        Plot::new("gap_bar_chart")
            .height(height)
            .legend(Legend::default().position(Self::legend_corner(spec.legend_position())))
            .x_axis_label(axis.title.text.clone())
            .include_x(axis.min)
            .include_x(axis.max)
            .include_y(-0.5)
            .include_y(count as f64 - 0.5)
            .allow_scroll(false)
            .y_grid_spacer(move |_input| {
                (0..count)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .y_axis_formatter(move |mark, _range| {
                Self::category_at(mark.value, labels.len())
                    .and_then(|i| labels.get(i).cloned())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    /// Draw the per-year gap table.
    pub fn draw_gap_table(ui: &mut egui::Ui, summary: &GapSummary, spec: &BarChartSpec) {
        let [first, second] = spec.datasets();
        let suffix = &spec.value_suffix;
        let fmt = |v: f64| {
            if v.is_finite() {
                format!("{v:.1}{suffix}")
            } else {
                "-".to_string()
            }
        };

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("gap_table")
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Year").strong().size(11.0));
                        ui.label(RichText::new(&first.label).strong().size(11.0));
                        ui.label(RichText::new(&second.label).strong().size(11.0));
                        ui.label(RichText::new("Gap (pp)").strong().size(11.0));
                        ui.end_row();

                        let default_text_color = ui.visuals().text_color();
                        for (i, year) in summary.years.iter().enumerate() {
                            let highlight = summary.widest == Some(i);
                            let gap_color = if !year.gap.is_finite() {
                                default_text_color
                            } else if year.gap >= 0.0 {
                                GAP_POSITIVE
                            } else {
                                GAP_NEGATIVE
                            };

                            let mut label = RichText::new(&year.label).size(11.0);
                            if highlight {
                                label = label.strong();
                            }
                            ui.label(label);
                            ui.label(RichText::new(fmt(year.first)).size(11.0));
                            ui.label(RichText::new(fmt(year.second)).size(11.0));
                            let gap = if year.gap.is_finite() {
                                format!("{:+.1}", year.gap)
                            } else {
                                "-".to_string()
                            };
                            ui.label(RichText::new(gap).size(11.0).color(gap_color));
                            ui.end_row();
                        }
                    });

                ui.add_space(6.0);
                if summary.mean_gap.is_finite() {
                    let spread = if summary.std_dev.is_finite() {
                        format!(" (sd {:.2})", summary.std_dev)
                    } else {
                        String::new()
                    };
                    ui.label(
                        RichText::new(format!("Mean gap: {:+.2} pp{}", summary.mean_gap, spread))
                            .size(11.0),
                    );
                }
                if let Some(widest) = summary.widest_year() {
                    ui.label(
                        RichText::new(format!("Widest gap: {} ({:+.1} pp)", widest.label, widest.gap))
                            .size(11.0),
                    );
                }
                if let Some(narrowest) = summary.narrowest_year() {
                    ui.label(
                        RichText::new(format!(
                            "Narrowest gap: {} ({:+.1} pp)",
                            narrowest.label, narrowest.gap
                        ))
                        .size(11.0),
                    );
                }
            });
    }
}
