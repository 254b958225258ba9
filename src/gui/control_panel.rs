//! Control Panel Widget
//! Left side panel with the data source, export buttons and status.

use egui::{Color32, RichText};
use gapchart::DataSource;

/// Left side control panel with source selection and export controls.
pub struct ControlPanel {
    pub source: Option<DataSource>,
    /// Text of the URL/path field.
    pub location: String,
    pub open_after_export: bool,
    pub progress: f32,
    pub status: String,
    /// Set once a chart is loaded.
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            source: None,
            location: String::new(),
            open_after_export: false,
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, busy: bool) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Gap Chart")
                    .size(22.0)
                    .color(Color32::from_rgb(122, 158, 130)),
            );
            ui.label(
                RichText::new("Good degree outcomes by year")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let source_text = self
                        .source
                        .as_ref()
                        .map(DataSource::display_name)
                        .unwrap_or_else(|| "No source selected".to_string());

                    ui.label(RichText::new(&source_text).size(12.0).color(
                        if self.source.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!busy, |ui| {
                            if ui.button("📂 Browse").clicked() {
                                action = ControlPanelAction::BrowseCsv;
                            }
                        });
                    });
                });

                ui.add_space(6.0);
                ui.label(RichText::new("CSV path or URL:").size(11.0));
                ui.horizontal(|ui| {
                    let field = ui.add(
                        egui::TextEdit::singleline(&mut self.location)
                            .hint_text("https://…/outcomes.csv")
                            .desired_width(200.0),
                    );
                    let submitted =
                        field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    let can_load = !busy && !self.location.trim().is_empty();
                    ui.add_enabled_ui(can_load, |ui| {
                        if ui.button("Load").clicked() || (submitted && can_load) {
                            action = ControlPanelAction::LoadLocation;
                        }
                    });
                });

                ui.add_space(4.0);
                ui.add_enabled_ui(!busy && self.source.is_some(), |ui| {
                    if ui.small_button("🔄 Reload").clicked() {
                        action = ControlPanelAction::Reload;
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.label(RichText::new("💾 Export").size(14.0).strong());
        ui.add_space(8.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled && !busy, |ui| {
                let size = egui::vec2(200.0, 30.0);
                if ui
                    .add(egui::Button::new(RichText::new("🖼 Chart image (PNG/SVG)").size(14.0)).min_size(size))
                    .clicked()
                {
                    action = ControlPanelAction::ExportImage;
                }
                ui.add_space(4.0);
                if ui
                    .add(egui::Button::new(RichText::new("{ } Chart config (JSON)").size(14.0)).min_size(size))
                    .clicked()
                {
                    action = ControlPanelAction::ExportJson;
                }
                ui.add_space(4.0);
                if ui
                    .add(egui::Button::new(RichText::new("📄 Report page").size(14.0)).min_size(size))
                    .clicked()
                {
                    action = ControlPanelAction::ExportReport;
                }
            });
            ui.add_space(6.0);
            ui.checkbox(&mut self.open_after_export, "Open file after export");
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(busy),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    LoadLocation,
    Reload,
    ExportImage,
    ExportJson,
    ExportReport,
}
