use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::multi_select::multi_select;

/// Width of one selector in the filter grid.
const SELECTOR_WIDTH: f32 = 220.0;

// ---------------------------------------------------------------------------
// Filter panel – one multi-select per filterable column
// ---------------------------------------------------------------------------

/// Render the filter panel.
pub fn filter_panel(ui: &mut Ui, state: &mut AppState) {
    if state.loading() {
        ui.horizontal(|ui: &mut Ui| {
            ui.spinner();
            ui.label("Loading filters...");
        });
        return;
    }

    let columns = state.engine.filter_columns().to_vec();
    if columns.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.weak("No filter columns found in the dataset");
        });
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Filters");
        let active = state.engine.active_filter_count();
        if active > 0 {
            ui.label(
                RichText::new(format!("{active} active"))
                    .small()
                    .color(Color32::from_rgb(30, 64, 175))
                    .background_color(Color32::from_rgb(219, 234, 254)),
            );
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .id_salt("filter_panel")
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for col in &columns {
                    let selector = state.selectors.entry(col.clone()).or_default();
                    ui.allocate_ui(egui::vec2(SELECTOR_WIDTH, 0.0), |ui: &mut Ui| {
                        ui.vertical(|ui: &mut Ui| {
                            ui.set_width(SELECTOR_WIDTH);
                            multi_select(ui, selector, &mut state.engine, col);
                        });
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        if ui
            .add_enabled(state.engine.active_filter_count() > 0, egui::Button::new("Reset filters"))
            .clicked()
        {
            state.reset_filters();
        }

        ui.separator();

        if state.engine.is_initialized() {
            ui.label(format!(
                "{} records loaded, {} visible",
                state.engine.total_rows(),
                state.engine.filtered_indices().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.start_load(path);
    }
}
