use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::FilterError;

use super::model::{Dataset, FilterValue, Row, ID_COLUMN};

// ---------------------------------------------------------------------------
// Filter state: which values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: column_name → set of selected values.
/// An empty set means "no constraint from this column".
pub type FilterState = BTreeMap<String, BTreeSet<FilterValue>>;

/// Whether `row` passes every non-empty selection in `filters`, ignoring the
/// column named `skip`.
fn row_passes(row: &Row, filters: &FilterState, skip: Option<&str>) -> bool {
    filters.iter().all(|(col, selected)| {
        if selected.is_empty() || skip == Some(col.as_str()) {
            return true;
        }
        row.filter_value(col)
            .is_some_and(|val| selected.contains(&val))
    })
}

// ---------------------------------------------------------------------------
// FilterEngine
// ---------------------------------------------------------------------------

/// Owns the loaded dataset and the filter selections, and keeps the two
/// derived views (filtered rows, per-column options) in step with them.
///
/// Derived views are recomputed on every mutation, so any read after a
/// mutation returns observes it.
#[derive(Debug, Default)]
pub struct FilterEngine {
    /// `None` until [`FilterEngine::initialize`] succeeds.
    dataset: Option<Dataset>,
    filters: FilterState,
    /// Indices of rows passing every active filter (cached).
    visible: Vec<usize>,
    /// Sorted option list per filterable column (cached).
    options: BTreeMap<String, Vec<FilterValue>>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a loaded dataset and start with one empty selection
    /// per filterable column.
    ///
    /// On error the engine is left exactly as it was.
    pub fn initialize(&mut self, dataset: Dataset) -> Result<(), FilterError> {
        let headers: HashSet<&str> = dataset.headers.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        for col in &dataset.filter_columns {
            if col == ID_COLUMN {
                return Err(FilterError::ReservedColumn(col.clone()));
            }
            if !seen.insert(col.as_str()) {
                return Err(FilterError::DuplicateColumn(col.clone()));
            }
            if !headers.contains(col.as_str()) {
                return Err(FilterError::ColumnNotInHeader(col.clone()));
            }
        }

        self.filters = dataset
            .filter_columns
            .iter()
            .map(|col| (col.clone(), BTreeSet::new()))
            .collect();
        self.dataset = Some(dataset);
        self.recompute();
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Number of rows in the loaded dataset, before filtering.
    pub fn total_rows(&self) -> usize {
        self.dataset.as_ref().map_or(0, Dataset::len)
    }

    /// Filterable columns in header order; empty until initialized.
    pub fn filter_columns(&self) -> &[String] {
        self.dataset
            .as_ref()
            .map_or(&[], |ds| ds.filter_columns.as_slice())
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Current selection of `column` (`None` for unknown columns).
    pub fn selection(&self, column: &str) -> Option<&BTreeSet<FilterValue>> {
        self.filters.get(column)
    }

    /// Total number of selected values across all columns.
    pub fn active_filter_count(&self) -> usize {
        self.filters.values().map(BTreeSet::len).sum()
    }

    /// Replace the selection of one column. Values are stored in canonical
    /// form; NaN is dropped.
    pub fn set_selection(
        &mut self,
        column: &str,
        selection: BTreeSet<FilterValue>,
    ) -> Result<(), FilterError> {
        let slot = self
            .filters
            .get_mut(column)
            .ok_or_else(|| FilterError::unknown_column(column))?;
        *slot = selection
            .into_iter()
            .filter_map(FilterValue::normalized)
            .collect();
        self.recompute();
        Ok(())
    }

    /// Add `value` to the selection of `column`, or remove it if present.
    pub fn toggle_value(&mut self, column: &str, value: FilterValue) -> Result<(), FilterError> {
        let mut selection = self
            .selection(column)
            .cloned()
            .ok_or_else(|| FilterError::unknown_column(column))?;
        let Some(value) = value.normalized() else {
            return Ok(());
        };
        if !selection.remove(&value) {
            selection.insert(value);
        }
        self.set_selection(column, selection)
    }

    pub fn clear_selection(&mut self, column: &str) -> Result<(), FilterError> {
        self.set_selection(column, BTreeSet::new())
    }

    /// Clear every column's selection.
    pub fn clear_all(&mut self) {
        self.filters.values_mut().for_each(BTreeSet::clear);
        self.recompute();
    }

    /// Indices (into the dataset rows) of rows passing all active filters,
    /// in source order.
    pub fn filtered_indices(&self) -> &[usize] {
        &self.visible
    }

    /// Rows passing all active filters, in source order.
    pub fn filtered_rows(&self) -> Vec<&Row> {
        match &self.dataset {
            Some(ds) => self.visible.iter().map(|&i| &ds.rows[i]).collect(),
            None => Vec::new(),
        }
    }

    /// Sorted distinct values offered for `column`.
    ///
    /// Computed over the full dataset when no other column is filtered,
    /// otherwise over the rows passing every other column's filter. The
    /// column's own selection is always included.
    pub fn available_options(&self, column: &str) -> &[FilterValue] {
        self.options.get(column).map_or(&[], Vec::as_slice)
    }

    /// Rebuild both derived views from the dataset and current filters.
    fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            self.visible.clear();
            self.options.clear();
            return;
        };

        self.visible = ds
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row_passes(row, &self.filters, None))
            .map(|(i, _)| i)
            .collect();

        self.options = self
            .filters
            .iter()
            .map(|(column, selected)| {
                let others_active = self
                    .filters
                    .iter()
                    .any(|(other, vals)| other != column && !vals.is_empty());

                let mut unique: BTreeSet<FilterValue> = if others_active {
                    ds.rows
                        .iter()
                        .filter(|row| row_passes(row, &self.filters, Some(column)))
                        .filter_map(|row| row.filter_value(column))
                        .collect()
                } else {
                    ds.rows
                        .iter()
                        .filter_map(|row| row.filter_value(column))
                        .collect()
                };
                unique.extend(selected.iter().copied());

                (column.clone(), unique.into_iter().collect())
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn vals(v: &[f64]) -> BTreeSet<FilterValue> {
        v.iter().copied().map(FilterValue).collect()
    }

    fn opts(v: &[f64]) -> Vec<FilterValue> {
        v.iter().copied().map(FilterValue).collect()
    }

    /// Rows numbered 1..=n with the given mod columns.
    fn mod_dataset(n: i64, mods: &[i64]) -> Dataset {
        let mut headers = vec![ID_COLUMN.to_string()];
        headers.extend(mods.iter().map(|m| format!("mod{m}")));
        let rows = (1..=n)
            .map(|i| {
                let mut row: Row = [(ID_COLUMN, CellValue::Number(i as f64))]
                    .into_iter()
                    .collect();
                for m in mods {
                    row.values
                        .insert(format!("mod{m}"), CellValue::Number((i % m) as f64));
                }
                row
            })
            .collect();
        Dataset::new(headers, rows)
    }

    fn ids(engine: &FilterEngine) -> Vec<f64> {
        engine
            .filtered_rows()
            .iter()
            .filter_map(|r| r.id().and_then(CellValue::as_f64))
            .collect()
    }

    #[test]
    fn uninitialized_engine_reports_empty_views() {
        let engine = FilterEngine::new();
        assert!(!engine.is_initialized());
        assert!(engine.filtered_rows().is_empty());
        assert!(engine.available_options("mod3").is_empty());
        assert!(engine.filter_columns().is_empty());
    }

    #[test]
    fn initialize_creates_empty_selection_per_column() {
        let mut engine = FilterEngine::new();
        engine.initialize(mod_dataset(12, &[3, 4])).unwrap();
        assert_eq!(engine.filter_columns(), ["mod3", "mod4"]);
        assert!(engine.filters().values().all(BTreeSet::is_empty));
        assert_eq!(engine.filtered_rows().len(), 12);
        assert_eq!(engine.available_options("mod3"), opts(&[0.0, 1.0, 2.0]));
    }

    #[test]
    fn mod3_selection_keeps_matching_rows_in_order() {
        let rows = vec![
            Row::from_iter([("number", CellValue::Number(1.0)), ("mod3", CellValue::Number(0.0))]),
            Row::from_iter([("number", CellValue::Number(2.0)), ("mod3", CellValue::Number(1.0))]),
            Row::from_iter([("number", CellValue::Number(3.0)), ("mod3", CellValue::Number(0.0))]),
        ];
        let mut engine = FilterEngine::new();
        engine
            .initialize(Dataset::new(vec!["number".into(), "mod3".into()], rows))
            .unwrap();
        engine.set_selection("mod3", vals(&[0.0])).unwrap();
        assert_eq!(ids(&engine), vec![1.0, 3.0]);
    }

    #[test]
    fn options_of_other_columns_follow_filtered_subset() {
        let mut engine = FilterEngine::new();
        engine.initialize(mod_dataset(12, &[3, 4])).unwrap();
        engine.set_selection("mod3", vals(&[0.0])).unwrap();

        // Rows 3, 6, 9, 12 → mod4 values 3, 2, 1, 0.
        assert_eq!(engine.available_options("mod4"), opts(&[0.0, 1.0, 2.0, 3.0]));
        assert_eq!(engine.available_options("mod3"), opts(&[0.0, 1.0, 2.0]));

        engine.set_selection("mod4", vals(&[2.0])).unwrap();
        assert_eq!(ids(&engine), vec![6.0]);
        // mod3 is now restricted by mod4 = 2 → rows 2, 6, 10 → 2, 0, 1.
        assert_eq!(engine.available_options("mod3"), opts(&[0.0, 1.0, 2.0]));
        // mod4 is restricted by mod3 = 0 only.
        assert_eq!(engine.available_options("mod4"), opts(&[0.0, 1.0, 2.0, 3.0]));
    }

    #[test]
    fn selection_never_vanishes_from_options() {
        let mut engine = FilterEngine::new();
        engine.initialize(mod_dataset(12, &[2, 4])).unwrap();
        // mod4 = 1 only occurs on odd rows.
        engine.set_selection("mod4", vals(&[1.0])).unwrap();
        engine.set_selection("mod2", vals(&[0.0])).unwrap();
        assert!(engine.filtered_rows().is_empty());
        assert!(engine.available_options("mod4").contains(&FilterValue(1.0)));
        assert!(engine.available_options("mod2").contains(&FilterValue(0.0)));
    }

    #[test]
    fn negative_zero_and_nan_selections_are_canonicalized() {
        let mut engine = FilterEngine::new();
        engine.initialize(mod_dataset(6, &[2])).unwrap();
        engine
            .set_selection("mod2", vals(&[-0.0, f64::NAN]))
            .unwrap();

        assert_eq!(engine.selection("mod2"), Some(&vals(&[0.0])));
        assert_eq!(ids(&engine), vec![2.0, 4.0, 6.0]);
        assert_eq!(engine.available_options("mod2"), opts(&[0.0, 1.0]));
        assert_eq!(
            engine
                .available_options("mod2")
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            ["0", "1"]
        );

        engine.toggle_value("mod2", FilterValue(-0.0)).unwrap();
        assert_eq!(engine.selection("mod2"), Some(&vals(&[])));
        engine.toggle_value("mod2", FilterValue(f64::NAN)).unwrap();
        assert_eq!(engine.active_filter_count(), 0);
    }

    #[test]
    fn clear_restores_unfiltered_rows() {
        let mut engine = FilterEngine::new();
        engine.initialize(mod_dataset(10, &[3])).unwrap();
        let before = ids(&engine);
        engine.set_selection("mod3", vals(&[1.0, 2.0])).unwrap();
        assert_ne!(ids(&engine), before);
        engine.clear_selection("mod3").unwrap();
        assert_eq!(ids(&engine), before);
    }

    #[test]
    fn unknown_column_is_rejected_without_side_effects() {
        let mut engine = FilterEngine::new();
        engine.initialize(mod_dataset(10, &[3])).unwrap();
        engine.set_selection("mod3", vals(&[1.0])).unwrap();
        let rows = ids(&engine);
        let options = engine.available_options("mod3").to_vec();

        let err = engine.set_selection("mod9", vals(&[0.0])).unwrap_err();
        assert_eq!(err, FilterError::UnknownColumn("mod9".into()));
        assert!(engine.toggle_value("number", FilterValue(1.0)).is_err());
        assert_eq!(ids(&engine), rows);
        assert_eq!(engine.available_options("mod3"), options);
        assert!(engine.selection("mod9").is_none());
    }

    #[test]
    fn set_selection_before_initialize_fails() {
        let mut engine = FilterEngine::new();
        assert!(engine.set_selection("mod3", vals(&[1.0])).is_err());
        assert!(engine.filtered_rows().is_empty());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut engine = FilterEngine::new();
        engine.initialize(mod_dataset(6, &[3])).unwrap();
        engine.toggle_value("mod3", FilterValue(2.0)).unwrap();
        assert_eq!(engine.selection("mod3"), Some(&vals(&[2.0])));
        assert_eq!(ids(&engine), vec![2.0, 5.0]);
        engine.toggle_value("mod3", FilterValue(2.0)).unwrap();
        assert_eq!(engine.selection("mod3"), Some(&vals(&[])));
        assert_eq!(engine.filtered_rows().len(), 6);
    }

    #[test]
    fn active_count_and_clear_all() {
        let mut engine = FilterEngine::new();
        engine.initialize(mod_dataset(12, &[3, 4])).unwrap();
        engine.set_selection("mod3", vals(&[0.0, 1.0])).unwrap();
        engine.set_selection("mod4", vals(&[3.0])).unwrap();
        assert_eq!(engine.active_filter_count(), 3);
        engine.clear_all();
        assert_eq!(engine.active_filter_count(), 0);
        assert_eq!(engine.filtered_rows().len(), 12);
    }

    #[test]
    fn text_cells_never_match_a_selection() {
        let rows = vec![
            Row::from_iter([("number", CellValue::Number(1.0)), ("mod3", CellValue::Text("x".into()))]),
            Row::from_iter([("number", CellValue::Number(2.0)), ("mod3", CellValue::Number(2.0))]),
            Row::from_iter([("number", CellValue::Number(3.0))]),
        ];
        let mut engine = FilterEngine::new();
        engine
            .initialize(Dataset::new(vec!["number".into(), "mod3".into()], rows))
            .unwrap();
        assert_eq!(engine.available_options("mod3"), opts(&[2.0]));
        assert_eq!(engine.filtered_rows().len(), 3);
        engine.set_selection("mod3", vals(&[2.0])).unwrap();
        assert_eq!(ids(&engine), vec![2.0]);
    }

    #[test]
    fn initialize_rejects_reserved_and_duplicate_columns() {
        let mut engine = FilterEngine::new();
        let mut ds = mod_dataset(3, &[3]);
        ds.filter_columns.push(ID_COLUMN.to_string());
        assert_eq!(
            engine.initialize(ds),
            Err(FilterError::ReservedColumn(ID_COLUMN.into()))
        );
        assert!(!engine.is_initialized());

        let mut ds = mod_dataset(3, &[3]);
        ds.filter_columns.push("mod3".into());
        assert_eq!(
            engine.initialize(ds),
            Err(FilterError::DuplicateColumn("mod3".into()))
        );

        let mut ds = mod_dataset(3, &[3]);
        ds.filter_columns.push("mod5".into());
        assert_eq!(
            engine.initialize(ds),
            Err(FilterError::ColumnNotInHeader("mod5".into()))
        );
        assert!(!engine.is_initialized());
        assert!(engine.filtered_rows().is_empty());
    }

    #[test]
    fn reinitialize_replaces_dataset_and_filters() {
        let mut engine = FilterEngine::new();
        engine.initialize(mod_dataset(6, &[3])).unwrap();
        engine.set_selection("mod3", vals(&[0.0])).unwrap();
        engine.initialize(mod_dataset(8, &[4])).unwrap();
        assert_eq!(engine.filter_columns(), ["mod4"]);
        assert!(engine.selection("mod3").is_none());
        assert_eq!(engine.filtered_rows().len(), 8);
    }
}
