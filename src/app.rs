use std::time::Duration;

use eframe::egui;

use crate::config::Config;
use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    /// Create the app and start loading the configured dataset.
    pub fn new(config: &Config) -> Self {
        let mut state = AppState::default();
        state.start_load(config.dataset_path());
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.loading() && !self.state.poll_load() {
            // Keep polling the loader thread while idle.
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Filters above the table ----
        egui::TopBottomPanel::top("filter_panel")
            .resizable(true)
            .min_height(80.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                panels::filter_panel(ui, &mut self.state);
                ui.add_space(4.0);
            });

        // ---- Central panel: table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let state = &mut self.state;
            table::data_table(ui, &mut state.pager, &state.engine);
        });
    }
}
