mod aicrowd;
mod app;
mod config;
mod data;
mod error;
mod hub;
mod state;
mod ui;
mod worker;

use app::DatasetFetcherApp;
use config::Settings;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::from_env();
    log::info!(
        "Hub endpoint {}, datasets-server {}, aicrowd program '{}'",
        settings.hub_endpoint,
        settings.datasets_server,
        settings.aicrowd_program
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([600.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dataset Fetcher",
        options,
        Box::new(move |cc| Ok(Box::new(DatasetFetcherApp::new(&cc.egui_ctx, settings)))),
    )
}
