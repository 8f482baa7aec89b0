use std::ops::Range;

use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilterEngine;
use crate::data::model::{CellValue, ID_COLUMN};

pub const ROWS_PER_PAGE: usize = 100;
pub const VISIBLE_ROWS: usize = 20;

// ---------------------------------------------------------------------------
// Pagination / windowing state
// ---------------------------------------------------------------------------

/// Which slice of the filtered rows is on screen: a page of
/// [`ROWS_PER_PAGE`] rows, of which a window of [`VISIBLE_ROWS`] is shown.
///
/// Purely presentational; never influences which rows pass the filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TablePager {
    /// 1-based page number.
    pub page: usize,
    /// Offset of the window within the page.
    pub visible_start: usize,
}

impl Default for TablePager {
    fn default() -> Self {
        Self {
            page: 1,
            visible_start: 0,
        }
    }
}

impl TablePager {
    pub fn total_pages(total: usize) -> usize {
        total.div_ceil(ROWS_PER_PAGE)
    }

    /// Row range (into the filtered rows) of the current page.
    pub fn page_range(&self, total: usize) -> Range<usize> {
        let start = ((self.page - 1) * ROWS_PER_PAGE).min(total);
        start..(start + ROWS_PER_PAGE).min(total)
    }

    /// Row range (into the filtered rows) of the visible window.
    pub fn visible_range(&self, total: usize) -> Range<usize> {
        let page = self.page_range(total);
        let start = (page.start + self.visible_start).min(page.end);
        start..(start + VISIBLE_ROWS).min(page.end)
    }

    pub fn can_scroll_up(&self) -> bool {
        self.visible_start > 0
    }

    pub fn can_scroll_down(&self, total: usize) -> bool {
        self.visible_start + VISIBLE_ROWS < self.page_range(total).len()
    }

    pub fn scroll_up(&mut self) {
        if self.can_scroll_up() {
            self.visible_start -= VISIBLE_ROWS;
        }
    }

    pub fn scroll_down(&mut self, total: usize) {
        if self.can_scroll_down(total) {
            self.visible_start += VISIBLE_ROWS;
        }
    }

    /// Jump to `page`, clamped to the available pages, and reset the window.
    pub fn go_to_page(&mut self, page: usize, total: usize) {
        self.page = page.clamp(1, Self::total_pages(total).max(1));
        self.visible_start = 0;
    }

    /// Keep page and window in bounds after the row count changed.
    pub fn clamp(&mut self, total: usize) {
        let last = Self::total_pages(total).max(1);
        if self.page > last {
            self.go_to_page(last, total);
        }
        let page_len = self.page_range(total).len();
        if self.visible_start >= page_len {
            self.visible_start = page_len.saturating_sub(1) / VISIBLE_ROWS * VISIBLE_ROWS;
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the filtered rows with pagination controls.
pub fn data_table(ui: &mut Ui, pager: &mut TablePager, engine: &FilterEngine) {
    let visible = engine.filtered_indices();
    let total = visible.len();
    pager.clamp(total);

    ui.heading(format!("Data Table ({total} records)"));
    ui.separator();

    let display_columns: Vec<&str> = std::iter::once(ID_COLUMN)
        .chain(engine.filter_columns().iter().map(String::as_str))
        .collect();
    let window = pager.visible_range(total);
    let page_start = pager.page_range(total).start;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(48.0))
        .columns(Column::remainder().at_least(64.0), display_columns.len())
        .header(22.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("#");
            });
            for col in &display_columns {
                let title = if *col == ID_COLUMN {
                    "Number".to_string()
                } else {
                    col.to_uppercase()
                };
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            let Some(dataset) = engine.dataset() else {
                return;
            };
            for idx in window.clone() {
                let row = &dataset.rows[visible[idx]];
                body.row(20.0, |mut table_row| {
                    table_row.col(|ui: &mut Ui| {
                        ui.weak((idx + 1).to_string());
                    });
                    for col in &display_columns {
                        let text = row.get(col).unwrap_or(&CellValue::Empty).to_string();
                        table_row.col(|ui: &mut Ui| {
                            if *col == ID_COLUMN {
                                ui.label(RichText::new(text).strong());
                            } else {
                                ui.label(text);
                            }
                        });
                    }
                });
            }
        });

    ui.separator();
    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(pager.can_scroll_up(), egui::Button::new("↑ Scroll Up"))
            .clicked()
        {
            pager.scroll_up();
        }
        if ui
            .add_enabled(pager.can_scroll_down(total), egui::Button::new("↓ Scroll Down"))
            .clicked()
        {
            pager.scroll_down(total);
        }
        let page_len = pager.page_range(total).len();
        ui.label(format!(
            "Showing {}-{} of {page_len} in page",
            (window.start - page_start + 1).min(page_len),
            window.end - page_start
        ));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            let pages = TablePager::total_pages(total);
            if ui
                .add_enabled(pager.page < pages, egui::Button::new("Next"))
                .clicked()
            {
                pager.go_to_page(pager.page + 1, total);
            }
            ui.label(format!("Page {} of {pages}", pager.page));
            if ui
                .add_enabled(pager.page > 1, egui::Button::new("Previous"))
                .clicked()
            {
                pager.go_to_page(pager.page - 1, total);
            }
        });
    });
}
