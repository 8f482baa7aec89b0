use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::data::filter::FilterEngine;
use crate::data::loader::{spawn_load, PendingLoad};
use crate::data::model::Dataset;
use crate::ui::multi_select::MultiSelectState;
use crate::ui::table::TablePager;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Dataset, selections and derived views.
    pub engine: FilterEngine,

    /// Load in flight, if any.
    pub pending: Option<PendingLoad>,

    /// Per-column selector state (open flag, search text).
    pub selectors: BTreeMap<String, MultiSelectState>,

    /// Table pagination.
    pub pager: TablePager,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Whether a dataset load is in progress.
    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start loading `path` in the background.
    pub fn start_load(&mut self, path: PathBuf) {
        log::info!("Loading dataset from {}", path.display());
        self.status_message = None;
        self.pending = Some(spawn_load(path));
    }

    /// Check on the pending load; returns `true` once it has been ingested.
    pub fn poll_load(&mut self) -> bool {
        let Some(result) = self.pending.as_ref().and_then(PendingLoad::poll) else {
            return false;
        };
        let path = self.pending.take().map(|p| p.path).unwrap_or_default();
        match result {
            Ok(dataset) => self.set_dataset(dataset),
            // Failed loads leave the engine as it was.
            Err(e) => {
                self.status_message = Some(format!("Could not load {}: {e:#}", path.display()));
            }
        }
        true
    }

    /// Ingest a newly loaded dataset and reset all presentation state.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        match self.engine.initialize(dataset) {
            Ok(()) => {
                self.selectors = self
                    .engine
                    .filter_columns()
                    .iter()
                    .map(|col| (col.clone(), MultiSelectState::default()))
                    .collect();
                self.pager = TablePager::default();
            }
            Err(e) => {
                log::warn!("Rejected dataset: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Clear every column's selection.
    pub fn reset_filters(&mut self) {
        self.engine.clear_all();
        self.pager = TablePager::default();
    }
}
