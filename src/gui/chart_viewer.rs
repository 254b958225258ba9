//! Chart Viewer Widget
//! Right side panel showing the bar chart card and the gap table.

use egui::{Color32, RichText, ScrollArea};
use gapchart::charts::{BarChartSpec, ChartPlotter};
use gapchart::stats::GapSummary;

const CHART_HEIGHT: f32 = 420.0;
const CARD_MAX_WIDTH: f32 = 960.0;

/// Holds the chart currently on screen.
#[derive(Default)]
pub struct ChartViewer {
    pub spec: Option<BarChartSpec>,
    pub summary: Option<GapSummary>,
    /// Shown in the card title.
    pub source_name: String,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.spec = None;
        self.summary = None;
        self.source_name.clear();
    }

    pub fn set_chart(&mut self, spec: BarChartSpec, summary: GapSummary, source_name: String) {
        self.spec = Some(spec);
        self.summary = Some(summary);
        self.source_name = source_name;
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(spec) = &self.spec else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Frame::none()
                    .rounding(8.0)
                    .stroke(egui::Stroke::new(1.0, Color32::from_rgb(201, 168, 76)))
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_max_width(CARD_MAX_WIDTH);

                        ui.label(
                            RichText::new(format!("Good degree rate: {}", self.source_name))
                                .size(18.0)
                                .strong(),
                        );
                        ui.add_space(8.0);

                        if spec.is_empty() {
                            ui.label(
                                RichText::new("No labelled rows in this file")
                                    .size(14.0)
                                    .color(Color32::GRAY),
                            );
                            return;
                        }

                        ChartPlotter::draw_bar_chart(ui, spec, CHART_HEIGHT);

                        if let Some(summary) = &self.summary {
                            ui.add_space(10.0);
                            ui.label(RichText::new("Gap by year").size(14.0).strong());
                            ChartPlotter::draw_gap_table(ui, summary, spec);
                        }
                    });
            });
    }
}
