#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

use timeline_planner::config::EngineConfig;
use timeline_planner::logging;

fn main() -> eframe::Result<()> {
    let config = EngineConfig::load_or_default();
    if let Err(e) = logging::init_logging(&config.log_level) {
        eprintln!("log level '{}' rejected ({e}), using {}", config.log_level, logging::default_log_level());
        if let Err(e) = logging::init_logging(logging::default_log_level()) {
            eprintln!("logging disabled: {e}");
        }
    }
    log::info!("engine settings: {:?}", config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Timeline Planner"),
        ..Default::default()
    };

    eframe::run_native(
        "Timeline Planner",
        options,
        Box::new(|cc| Ok(Box::new(app::TimelineApp::new(cc, config)))),
    )
}
