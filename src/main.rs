//! Gap Chart - desktop viewer for the good degree rate comparison chart.

mod gui;

use eframe::egui;
use gapchart::config::CONFIG_FILE_NAME;
use gapchart::GapChartConfig;
use gui::GapChartApp;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match GapChartConfig::load_or_default(Path::new(CONFIG_FILE_NAME)) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration, using defaults");
            GapChartConfig::default()
        }
    };
    info!(source = ?config.source, "starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([960.0, 600.0])
            .with_title("Gap Chart"),
        ..Default::default()
    };

    eframe::run_native(
        "Gap Chart",
        options,
        Box::new(|cc| Ok(Box::new(GapChartApp::new(cc, config)))),
    )
}
