use clap::Parser;
use eframe::egui;

use modboard::app::DashboardApp;
use modboard::config::Config;

fn main() -> eframe::Result {
    env_logger::init();
    let config = Config::parse();
    log::debug!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Modboard – Interdependent Filters",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(&config)))),
    )
}
