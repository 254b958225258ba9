//! Gap Chart Main Application
//! Main window with control panel and chart viewer.

use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use anyhow::{Context, Result};
use egui::SidePanel;
use gapchart::charts::{BarChartSpec, StaticChartRenderer};
use gapchart::report::ReportWriter;
use gapchart::stats::GapSummary;
use gapchart::{extract_series, DataLoader, DataSource, GapChartConfig};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use tracing::{error, info};

const EXPORT_WIDTH: u32 = 1200;
const EXPORT_HEIGHT: u32 = 800;

/// Loading result from background thread
enum LoadResult {
    Progress(f32, String),
    Complete {
        spec: BarChartSpec,
        summary: GapSummary,
        rows: usize,
    },
    Error(String),
}

/// Everything queued on `rx`, and whether the sending thread is gone.
fn drain_load_results(rx: &Receiver<LoadResult>) -> (Vec<LoadResult>, bool) {
    let mut results = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(result) => results.push(result),
            Err(TryRecvError::Empty) => return (results, false),
            Err(TryRecvError::Disconnected) => return (results, true),
        }
    }
}

/// Main application window.
pub struct GapChartApp {
    config: GapChartConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl GapChartApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: GapChartConfig) -> Self {
        let mut app = Self {
            config,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };

        if let Some(source) = app.config.source.clone() {
            app.control_panel.location = source.clone();
            app.start_loading(DataSource::parse(&source));
        }
        app
    }

    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.location = path.display().to_string();
            self.start_loading(DataSource::File(path));
        }
    }

    /// Load, extract and summarize in a background thread.
    fn start_loading(&mut self, source: DataSource) {
        if self.is_loading {
            return;
        }

        self.chart_viewer.clear();
        self.control_panel.export_enabled = false;
        self.control_panel.source = Some(source.clone());
        self.control_panel
            .set_progress(5.0, &format!("Loading {}...", source.display_name()));
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let config = self.config.clone();
        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(10.0, "Reading CSV...".to_string()));

            let loader = DataLoader::new(config.fetch_timeout());
            let table = match loader.load_for(&source, &config.columns) {
                Ok(table) => table,
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                    return;
                }
            };

            let _ = tx.send(LoadResult::Progress(60.0, "Extracting series...".to_string()));

            let series = extract_series(&table.rows, &config.columns);
            let spec = BarChartSpec::from_series(&series, &config);
            let summary = GapSummary::from_series(&series);

            let _ = tx.send(LoadResult::Complete {
                spec,
                summary,
                rows: table.row_count(),
            });
        });
    }

    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;
            let (results, disconnected) = drain_load_results(&rx);

            for result in results {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    LoadResult::Complete {
                        spec,
                        summary,
                        rows,
                    } => {
                        let years = spec.labels().len();
                        let name = self
                            .control_panel
                            .source
                            .as_ref()
                            .map(DataSource::display_name)
                            .unwrap_or_default();
                        self.chart_viewer.set_chart(spec, summary, name);
                        self.control_panel.export_enabled = years > 0;
                        self.control_panel.set_progress(
                            100.0,
                            &format!("Loaded {} rows, {} years charted", rows, years),
                        );
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(message) => {
                        error!(%message, "loading failed");
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", message));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            // A worker that panicked drops its sender without reporting.
            if should_keep_receiver && disconnected {
                error!("loader thread exited without a result");
                self.control_panel
                    .set_progress(0.0, "Error: loader stopped unexpectedly");
                self.is_loading = false;
                should_keep_receiver = false;
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn save_path(filter: &str, extensions: &[&str], file_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(filter, extensions)
            .set_file_name(file_name)
            .save_file()
    }

    fn export_image(&self, path: &Path) -> Result<()> {
        let spec = self.current_spec()?;
        StaticChartRenderer::render_to_file(spec, path, EXPORT_WIDTH, EXPORT_HEIGHT)
            .with_context(|| format!("rendering chart to {}", path.display()))
    }

    fn export_json(&self, path: &Path) -> Result<()> {
        let json = self.current_spec()?.to_json().context("serializing chart")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }

    fn export_report(&self, path: &Path) -> Result<()> {
        let spec = self.current_spec()?;
        let svg = StaticChartRenderer::render_svg_string(spec, EXPORT_WIDTH, EXPORT_HEIGHT)
            .context("rendering chart for report")?;
        ReportWriter::new(&self.config)
            .write(path, spec, self.chart_viewer.summary.as_ref(), Some(&svg))
            .with_context(|| format!("writing report to {}", path.display()))
    }

    fn current_spec(&self) -> Result<&BarChartSpec> {
        self.chart_viewer
            .spec
            .as_ref()
            .context("no chart loaded")
    }

    fn handle_export(&mut self, action: &ControlPanelAction) {
        let picked = match action {
            ControlPanelAction::ExportImage => {
                Self::save_path("Chart image", &["png", "svg"], "gap_chart.png")
            }
            ControlPanelAction::ExportJson => {
                Self::save_path("Chart config", &["json"], "gap_chart.json")
            }
            ControlPanelAction::ExportReport => {
                Self::save_path("Report page", &["xhtml", "html"], "gap_report.xhtml")
            }
            _ => return,
        };
        let Some(path) = picked else {
            return; // User cancelled
        };

        self.control_panel.set_progress(50.0, "Exporting...");
        let result = match action {
            ControlPanelAction::ExportImage => self.export_image(&path),
            ControlPanelAction::ExportJson => self.export_json(&path),
            _ => self.export_report(&path),
        };

        match result {
            Ok(()) => {
                info!(path = %path.display(), "export complete");
                self.control_panel
                    .set_progress(100.0, &format!("Exported {}", path.display()));
                if self.control_panel.open_after_export {
                    if let Err(e) = open::that(&path) {
                        error!(error = %e, "could not open exported file");
                    }
                }
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {e:#}"));
            }
        }
    }
}

impl eframe::App for GapChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.is_loading);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::LoadLocation => {
                            let source = DataSource::parse(&self.control_panel.location);
                            self.start_loading(source);
                        }
                        ControlPanelAction::Reload => {
                            if let Some(source) = self.control_panel.source.clone() {
                                self.start_loading(source);
                            }
                        }
                        ControlPanelAction::ExportImage
                        | ControlPanelAction::ExportJson
                        | ControlPanelAction::ExportReport => self.handle_export(&action),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_worker_is_not_disconnected() {
        let (tx, rx) = channel();
        tx.send(LoadResult::Progress(10.0, "Reading CSV...".to_string()))
            .unwrap();

        let (results, disconnected) = drain_load_results(&rx);
        assert_eq!(results.len(), 1);
        assert!(!disconnected);
    }

    #[test]
    fn panicked_worker_is_reported_as_disconnected() {
        let (tx, rx) = channel::<LoadResult>();
        let handle = thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(10.0, "Reading CSV...".to_string()));
            panic!("parser blew up");
        });
        assert!(handle.join().is_err());

        let (results, disconnected) = drain_load_results(&rx);
        assert!(matches!(results.as_slice(), [LoadResult::Progress(..)]));
        assert!(disconnected);
    }

    #[test]
    fn results_sent_before_exit_are_kept() {
        let (tx, rx) = channel();
        tx.send(LoadResult::Error("boom".to_string())).unwrap();
        drop(tx);

        let (results, disconnected) = drain_load_results(&rx);
        assert!(matches!(results.as_slice(), [LoadResult::Error(m)] if m == "boom"));
        assert!(disconnected);
    }
}
