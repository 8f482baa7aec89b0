use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::filter::FilterEngine;
use crate::data::model::FilterValue;

/// Height of one option row in points.
const ITEM_HEIGHT: f32 = 40.0;
/// Max height of the scrollable option list.
const CONTAINER_HEIGHT: f32 = 176.0;

// ---------------------------------------------------------------------------
// Widget-local state
// ---------------------------------------------------------------------------

/// Presentation state owned by one column's selector. Never touches the
/// filter selections themselves.
#[derive(Debug, Clone, Default)]
pub struct MultiSelectState {
    pub open: bool,
    pub search: String,
    /// Set when the search text changed; the list scrolls back to the top.
    reset_scroll: bool,
}

impl MultiSelectState {
    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search != self.search {
            self.search = search;
            self.reset_scroll = true;
        }
    }
}

/// Options whose printed form contains the (lower-cased) search text.
pub fn matching_options(options: &[FilterValue], search: &str) -> Vec<FilterValue> {
    if search.is_empty() {
        return options.to_vec();
    }
    let needle = search.to_lowercase();
    options
        .iter()
        .filter(|opt| opt.to_string().contains(&needle))
        .copied()
        .collect()
}

/// Trigger button caption.
pub fn display_text(label: &str, selected_count: usize) -> String {
    if selected_count == 0 {
        format!("Select {label}")
    } else {
        format!("{label} ({selected_count})")
    }
}

/// A requested change to the column's selection.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SelectionChange {
    Toggle(FilterValue),
    ClearAll,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the searchable multi-choice list for `column`. Selection changes
/// go through `engine`.
pub fn multi_select(ui: &mut Ui, state: &mut MultiSelectState, engine: &mut FilterEngine, column: &str) {
    let label = column.to_uppercase();
    let selected = engine.selection(column).cloned().unwrap_or_default();
    let options = matching_options(engine.available_options(column), &state.search);

    let arrow = if state.open { "▲" } else { "▼" };
    let trigger = format!("{}  {arrow}", display_text(&label, selected.len()));
    if ui
        .add_sized([ui.available_width(), 24.0], egui::Button::new(trigger))
        .clicked()
    {
        state.open = !state.open;
    }

    if !state.open {
        return;
    }

    let mut change = None;

    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        let mut search = state.search.clone();
        ui.add(egui::TextEdit::singleline(&mut search).hint_text("Type to search..."));
        state.set_search(search);

        ui.separator();
        let clear = egui::Button::new(
            RichText::new(format!("Clear All ({})", selected.len())).color(egui::Color32::RED),
        );
        if ui.add_enabled(!selected.is_empty(), clear).clicked() {
            change = Some(SelectionChange::ClearAll);
        }
        ui.separator();

        let mut scroll = ScrollArea::vertical()
            .id_salt(("multi_select", column))
            .max_height(CONTAINER_HEIGHT)
            .auto_shrink([false, true]);
        if std::mem::take(&mut state.reset_scroll) {
            scroll = scroll.vertical_scroll_offset(0.0);
        }
        scroll.show_rows(ui, ITEM_HEIGHT, options.len(), |ui: &mut Ui, range| {
            for value in &options[range] {
                ui.horizontal(|ui: &mut Ui| {
                    ui.set_height(ITEM_HEIGHT);
                    let mut checked = selected.contains(value);
                    if ui.checkbox(&mut checked, value.to_string()).changed() {
                        change = Some(SelectionChange::Toggle(*value));
                    }
                });
            }
        });

        if options.is_empty() && !state.search.is_empty() {
            ui.weak(format!("No options match \"{}\"", state.search));
        }
    });

    let result = match change {
        Some(SelectionChange::Toggle(value)) => engine.toggle_value(column, value),
        Some(SelectionChange::ClearAll) => engine.clear_selection(column),
        None => Ok(()),
    };
    if let Err(e) = result {
        log::debug!("Ignoring selection change: {e}");
    }
}
