mod client;
mod config;
mod format;
mod model;
mod ui;
mod view;

use eframe::egui;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use ui::StockApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stockscope=info")),
        )
        .init();

    let config = AppConfig::default();
    let title = config.page_title.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size())
            .with_min_inner_size(config.min_window_size()),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            ui::set_custom_style(&cc.egui_ctx);
            Ok(Box::new(StockApp::new(&config)?))
        }),
    )
}
