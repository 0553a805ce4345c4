// The grid state machine: owns rows, columns and view state, and derives
// the visible page by running search, column filters, sort and pagination
// in that order.

mod selection;
mod sort;

pub use selection::SelectionState;
pub use sort::{compare_cells, SortDirection, SortKey};

use crate::cell::{CellValue, GridRow};
use crate::classify::{classify_columns, ColumnClass, FacetEntry};
use crate::column::{check_unique_ids, ColumnDescriptor, ColumnKind};
use crate::config::GridConfig;
use crate::error::Result;
use crate::filter::{passes_all, FilterDescriptor, FilterStore, FilterValue};
use crate::persist::{FilterPersistence, FilterSync, Hydration};
use crate::refresh::AutoRefresh;
use crate::search::matches_global;
use crate::storage::KeyValueStore;
use std::collections::BTreeSet;
use std::time::Duration;

type RowKeyFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;
type RowPredicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type FiltersCallback = Box<dyn Fn(Vec<FilterDescriptor>) + Send>;
type RefreshCallback = Box<dyn Fn() + Send + Sync>;

/// Everything about a grid that is not the data itself.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    pub sorting: Vec<SortKey>,
    pub filters: FilterStore,
    pub global_query: String,
    /// Keys of selected rows.
    pub selected: BTreeSet<String>,
    /// Keys of expanded rows.
    pub expanded: BTreeSet<String>,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for GridState {
    fn default() -> Self {
        GridState {
            sorting: Vec::new(),
            filters: FilterStore::new(),
            global_query: String::new(),
            selected: BTreeSet::new(),
            expanded: BTreeSet::new(),
            page_index: 0,
            page_size: GridConfig::default().page_size,
        }
    }
}

/// One rendered page of the grid.
#[derive(Debug)]
pub struct GridView<'a, T> {
    pub rows: Vec<&'a T>,
    /// Positions of `rows` in the grid's source rows.
    pub row_indices: Vec<usize>,
    pub total_rows: usize,
    /// Rows passing search and filters, across all pages.
    pub filtered_rows: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
}

pub struct GridBuilder<T> {
    rows: Vec<T>,
    columns: Vec<ColumnDescriptor<T>>,
    config: GridConfig,
    state: Option<GridState>,
    row_key: Option<RowKeyFn<T>>,
    can_select: Option<RowPredicate<T>>,
    can_expand: Option<RowPredicate<T>>,
    persistence: Option<FilterPersistence>,
    on_filters_change: Option<FiltersCallback>,
    on_refresh: Option<RefreshCallback>,
    auto_refresh_enabled: bool,
}

impl<T: GridRow> GridBuilder<T> {
    pub fn new(rows: Vec<T>, columns: Vec<ColumnDescriptor<T>>) -> Self {
        GridBuilder {
            rows,
            columns,
            config: GridConfig::default(),
            state: None,
            row_key: None,
            can_select: None,
            can_expand: None,
            persistence: None,
            on_filters_change: None,
            on_refresh: None,
            auto_refresh_enabled: false,
        }
    }

    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from an explicit state instead of the config defaults.
    pub fn initial_state(mut self, state: GridState) -> Self {
        self.state = Some(state);
        self
    }

    /// Stable identity for selection and expansion. Without one, a row's
    /// key is its position in the source rows.
    pub fn row_key<F>(mut self, key: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.row_key = Some(Box::new(key));
        self
    }

    pub fn selectable<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.can_select = Some(Box::new(predicate));
        self
    }

    pub fn expandable<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.can_expand = Some(Box::new(predicate));
        self
    }

    /// Persist the filter list under `key`. Stored filters replace the
    /// initial ones when the grid is built.
    pub fn persist<S>(mut self, storage: S, key: impl Into<String>) -> Self
    where
        S: KeyValueStore + 'static,
    {
        self.persistence = Some(FilterPersistence::new(Box::new(storage), key));
        self
    }

    /// Called with the full filter list once changes settle for the
    /// configured debounce period.
    pub fn on_filters_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(Vec<FilterDescriptor>) + Send + 'static,
    {
        self.on_filters_change = Some(Box::new(callback));
        self
    }

    /// Called on the configured interval while auto-refresh is enabled.
    pub fn on_refresh<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_refresh = Some(Box::new(callback));
        self
    }

    pub fn auto_refresh_enabled(mut self, enabled: bool) -> Self {
        self.auto_refresh_enabled = enabled;
        self
    }

    pub fn build(self) -> Result<Grid<T>> {
        let GridBuilder {
            rows,
            columns,
            config,
            state,
            row_key,
            can_select,
            can_expand,
            persistence,
            on_filters_change,
            on_refresh,
            auto_refresh_enabled,
        } = self;

        check_unique_ids(&columns)?;

        let mut state = state.unwrap_or_else(|| GridState {
            page_size: config.page_size,
            ..GridState::default()
        });
        state.page_size = state.page_size.max(1);

        let mut sync = FilterSync::new();
        if let Some(persistence) = persistence {
            sync = sync.with_persistence(persistence);
        }
        if let Some(callback) = on_filters_change {
            sync = sync.with_notifier(config.debounce(), callback);
        }

        let auto_refresh = on_refresh.map(|callback| {
            let mut refresh = AutoRefresh::new(config.refresh_interval(), callback);
            refresh.set_enabled(auto_refresh_enabled);
            refresh
        });

        log::debug!(
            "Building grid with {} rows and {} columns",
            rows.len(),
            columns.len()
        );

        let mut grid = Grid {
            rows,
            columns,
            config,
            state,
            row_key,
            can_select,
            can_expand,
            sync,
            auto_refresh,
        };
        grid.normalize_state();
        grid.hydrate_filters();
        Ok(grid)
    }
}

/// A client-side data grid over rows of type `T`.
pub struct Grid<T> {
    rows: Vec<T>,
    columns: Vec<ColumnDescriptor<T>>,
    config: GridConfig,
    state: GridState,
    row_key: Option<RowKeyFn<T>>,
    can_select: Option<RowPredicate<T>>,
    can_expand: Option<RowPredicate<T>>,
    sync: FilterSync,
    auto_refresh: Option<AutoRefresh>,
}

impl<T: GridRow> Grid<T> {
    /// A grid with default config and no persistence.
    pub fn new(rows: Vec<T>, columns: Vec<ColumnDescriptor<T>>) -> Result<Self> {
        GridBuilder::new(rows, columns).build()
    }

    pub fn builder(rows: Vec<T>, columns: Vec<ColumnDescriptor<T>>) -> GridBuilder<T> {
        GridBuilder::new(rows, columns)
    }

    // ── Data ────────────────────────────────────────────────────────

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Replace the data. View state, including filters and selection, is kept.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
    }

    pub fn columns(&self) -> &[ColumnDescriptor<T>] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&ColumnDescriptor<T>> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    // ── Pipeline ────────────────────────────────────────────────────

    fn filtered_indices(&self) -> Vec<usize> {
        let query = self.state.global_query.as_str();
        let filters = self.state.filters.as_slice();
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                matches_global(*row, query) && passes_all(*row, &self.columns, filters)
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn sorted_indices(&self) -> Vec<usize> {
        let indices = self.filtered_indices();
        let keys: Vec<(&ColumnDescriptor<T>, SortDirection)> = self
            .state
            .sorting
            .iter()
            .filter_map(|key| {
                self.column(&key.column)
                    .filter(|c| c.sortable)
                    .map(|c| (c, key.direction))
            })
            .collect();
        if keys.is_empty() {
            return indices;
        }

        let directions: Vec<SortDirection> = keys.iter().map(|(_, d)| *d).collect();
        let mut keyed: Vec<(usize, Vec<CellValue>)> = indices
            .into_iter()
            .map(|i| {
                let values = keys.iter().map(|(c, _)| c.value(&self.rows[i])).collect();
                (i, values)
            })
            .collect();
        // sort_by is stable, so ties keep source order
        keyed.sort_by(|a, b| sort::compare_keyed(&a.1, &b.1, &directions));
        keyed.into_iter().map(|(i, _)| i).collect()
    }

    fn page_slice(&self, ordered: &[usize]) -> Vec<usize> {
        let size = self.state.page_size;
        let start = self.state.page_index.saturating_mul(size).min(ordered.len());
        let end = start.saturating_add(size).min(ordered.len());
        ordered[start..end].to_vec()
    }

    /// The current page.
    pub fn view(&self) -> GridView<'_, T> {
        let ordered = self.sorted_indices();
        let row_indices = self.page_slice(&ordered);
        GridView {
            rows: row_indices.iter().map(|&i| &self.rows[i]).collect(),
            row_indices,
            total_rows: self.rows.len(),
            filtered_rows: ordered.len(),
            page_index: self.state.page_index,
            page_size: self.state.page_size,
            page_count: page_count(ordered.len(), self.state.page_size),
        }
    }

    /// Every row passing search and filters, sorted, ignoring pagination.
    pub fn filtered_rows(&self) -> Vec<&T> {
        self.sorted_indices()
            .into_iter()
            .map(|i| &self.rows[i])
            .collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered_indices().len()
    }

    // ── Filters ─────────────────────────────────────────────────────

    pub fn filters(&self) -> &[FilterDescriptor] {
        self.state.filters.as_slice()
    }

    pub fn filter_value(&self, column_id: &str) -> Option<&FilterValue> {
        self.state.filters.get(column_id)
    }

    pub fn set_filter(&mut self, column_id: &str, value: FilterValue) {
        self.state.filters.upsert(column_id, value);
        self.after_filter_change();
    }

    pub fn remove_filter(&mut self, column_id: &str) -> bool {
        let removed = self.state.filters.remove(column_id);
        if removed {
            self.after_filter_change();
        }
        removed
    }

    pub fn clear_filters(&mut self) {
        if self.state.filters.is_empty() {
            return;
        }
        self.state.filters.clear();
        self.after_filter_change();
    }

    pub fn set_filters(&mut self, list: Vec<FilterDescriptor>) {
        self.state.filters.set_all(list);
        self.after_filter_change();
    }

    pub fn global_query(&self) -> &str {
        &self.state.global_query
    }

    /// Set the free-text query. It is not persisted.
    pub fn set_global_query(&mut self, query: impl Into<String>) {
        self.state.global_query = query.into();
        if self.config.reset_page_on_filter_change {
            self.state.page_index = 0;
        }
    }

    /// Fire a pending change notification without waiting out the debounce.
    pub fn flush_filter_notifications(&self) {
        self.sync.flush();
    }

    pub fn is_filter_notification_pending(&self) -> bool {
        self.sync.is_notify_pending()
    }

    pub fn persist_key(&self) -> Option<&str> {
        self.sync.persistence().map(FilterPersistence::key)
    }

    /// Move persistence to another key and hydrate from it. When nothing is
    /// stored there, the current filters are written to it instead.
    pub fn set_persist_key(&mut self, key: impl Into<String>) {
        match self.sync.persistence_mut() {
            Some(persistence) => persistence.set_key(key),
            None => return,
        }
        self.hydrate_filters();
    }

    fn hydrate_filters(&mut self) {
        match self.sync.hydrate(&mut self.state.filters) {
            Hydration::Restored => self.after_filter_change(),
            Hydration::Missing => self.sync.persist(self.state.filters.as_slice()),
            // An unreadable slot may still hold the user's filters
            Hydration::Unavailable | Hydration::Skipped => {}
        }
    }

    /// Run a caller-supplied initial state through the same rules as the
    /// setters.
    fn normalize_state(&mut self) {
        let sorting = std::mem::take(&mut self.state.sorting);
        self.set_sorting(sorting);
        let selected = std::mem::take(&mut self.state.selected);
        self.set_selection(selected);
        let expanded = std::mem::take(&mut self.state.expanded);
        self.set_expanded(expanded);
    }

    fn after_filter_change(&mut self) {
        if self.config.reset_page_on_filter_change {
            self.state.page_index = 0;
        }
        self.sync.changed(self.state.filters.as_slice());
    }

    // ── Classification ──────────────────────────────────────────────

    pub fn column_classes(&self) -> Vec<ColumnClass> {
        classify_columns(&self.rows, &self.columns, self.config.facet_limit)
    }

    /// Facet chips for one column. Empty unless it classifies as text.
    pub fn facets(&self, column_id: &str) -> Vec<FacetEntry> {
        self.column_classes()
            .into_iter()
            .find(|class| class.id == column_id)
            .map(|class| class.facets)
            .unwrap_or_default()
    }

    pub fn text_filter_columns(&self) -> Vec<String> {
        self.columns_of_kind(ColumnKind::Text)
    }

    pub fn range_filter_columns(&self) -> Vec<String> {
        self.columns_of_kind(ColumnKind::Numeric)
    }

    fn columns_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.column_classes()
            .into_iter()
            .filter(|class| class.kind == Some(kind))
            .map(|class| class.id)
            .collect()
    }

    // ── Sorting ─────────────────────────────────────────────────────

    pub fn sorting(&self) -> &[SortKey] {
        &self.state.sorting
    }

    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.state
            .sorting
            .iter()
            .find(|key| key.column == column_id)
            .map(|key| key.direction)
    }

    /// Replace the sort keys. Keys for unknown or unsortable columns are
    /// dropped, as are repeats; only the first key survives without
    /// multi-sort.
    pub fn set_sorting(&mut self, keys: Vec<SortKey>) {
        let mut seen = BTreeSet::new();
        let mut sorting: Vec<SortKey> = keys
            .into_iter()
            .filter(|key| self.column(&key.column).map_or(false, |c| c.sortable))
            .filter(|key| seen.insert(key.column.clone()))
            .collect();
        if !self.config.multi_sort {
            sorting.truncate(1);
        }
        self.state.sorting = sorting;
    }

    /// Cycle a column through ascending, descending and unsorted. With
    /// `additive` and multi-sort enabled, other keys are kept.
    pub fn toggle_sort(&mut self, column_id: &str, additive: bool) {
        if !self.column(column_id).map_or(false, |c| c.sortable) {
            return;
        }
        let next = match self.sort_direction(column_id) {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        };

        if additive && self.config.multi_sort {
            match next {
                Some(direction) => {
                    match self.state.sorting.iter().position(|k| k.column == column_id) {
                        Some(pos) => self.state.sorting[pos].direction = direction,
                        None => self.state.sorting.push(SortKey {
                            column: column_id.to_string(),
                            direction,
                        }),
                    }
                }
                None => self.state.sorting.retain(|k| k.column != column_id),
            }
        } else {
            self.state.sorting = next
                .map(|direction| {
                    vec![SortKey {
                        column: column_id.to_string(),
                        direction,
                    }]
                })
                .unwrap_or_default();
        }
    }

    pub fn clear_sorting(&mut self) {
        self.state.sorting.clear();
    }

    // ── Pagination ──────────────────────────────────────────────────

    pub fn page_index(&self) -> usize {
        self.state.page_index
    }

    pub fn page_size(&self) -> usize {
        self.state.page_size
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered_count(), self.state.page_size)
    }

    pub fn can_previous_page(&self) -> bool {
        self.state.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.state.page_index + 1 < self.page_count()
    }

    /// Jump to a page, clamped to the last one.
    pub fn set_page_index(&mut self, index: usize) {
        let last = self.page_count().saturating_sub(1);
        self.state.page_index = index.min(last);
    }

    pub fn next_page(&mut self) -> bool {
        if !self.can_next_page() {
            return false;
        }
        self.state.page_index += 1;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.can_previous_page() {
            return false;
        }
        self.state.page_index -= 1;
        true
    }

    pub fn first_page(&mut self) {
        self.state.page_index = 0;
    }

    pub fn last_page(&mut self) {
        self.state.page_index = self.page_count().saturating_sub(1);
    }

    /// Change the page size, keeping the first row of the current page
    /// visible.
    pub fn set_page_size(&mut self, size: usize) {
        let size = size.max(1);
        let top = self.state.page_index * self.state.page_size;
        self.state.page_size = size;
        self.state.page_index = top / size;
    }

    // ── Row identity ────────────────────────────────────────────────

    fn key_at(&self, index: usize) -> String {
        match &self.row_key {
            Some(key) => key(&self.rows[index]),
            None => index.to_string(),
        }
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        match &self.row_key {
            Some(row_key) => self.rows.iter().position(|row| row_key(row) == key),
            None => key.parse::<usize>().ok().filter(|&i| i < self.rows.len()),
        }
    }

    /// The key of a source row.
    pub fn row_key(&self, index: usize) -> Option<String> {
        (index < self.rows.len()).then(|| self.key_at(index))
    }

    // ── Selection ───────────────────────────────────────────────────

    pub fn is_row_selectable(&self, index: usize) -> bool {
        match (&self.can_select, self.rows.get(index)) {
            (_, None) => false,
            (Some(predicate), Some(row)) => predicate(row),
            (None, Some(_)) => true,
        }
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.state.selected.contains(key)
    }

    /// Select or deselect one row. Selecting an unknown or unselectable row
    /// does nothing.
    pub fn set_row_selected(&mut self, key: &str, selected: bool) {
        if !selected {
            self.state.selected.remove(key);
            return;
        }
        if let Some(index) = self.index_of(key) {
            if self.is_row_selectable(index) {
                self.state.selected.insert(key.to_string());
            }
        }
    }

    /// Returns the row's new selection state.
    pub fn toggle_row_selected(&mut self, key: &str) -> bool {
        let selected = !self.is_selected(key);
        self.set_row_selected(key, selected);
        self.is_selected(key)
    }

    /// Replace the selection wholesale. Keys of unknown or unselectable
    /// rows are dropped.
    pub fn set_selection<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.selected = keys
            .into_iter()
            .map(Into::into)
            .filter(|key| {
                self.index_of(key)
                    .map_or(false, |i| self.is_row_selectable(i))
            })
            .collect();
    }

    pub fn clear_selection(&mut self) {
        self.state.selected.clear();
    }

    fn selectable_keys(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .filter(|&&i| self.is_row_selectable(i))
            .map(|&i| self.key_at(i))
            .collect()
    }

    fn selection_state_of(&self, indices: &[usize]) -> SelectionState {
        let keys = self.selectable_keys(indices);
        let selected = keys.iter().filter(|k| self.is_selected(k)).count();
        SelectionState::from_counts(selected, keys.len())
    }

    fn apply_selection(&mut self, keys: Vec<String>, selected: bool) {
        for key in keys {
            if selected {
                self.state.selected.insert(key);
            } else {
                self.state.selected.remove(&key);
            }
        }
    }

    pub fn page_selection_state(&self) -> SelectionState {
        let page = self.page_slice(&self.sorted_indices());
        self.selection_state_of(&page)
    }

    pub fn filtered_selection_state(&self) -> SelectionState {
        self.selection_state_of(&self.filtered_indices())
    }

    pub fn set_all_page_rows_selected(&mut self, selected: bool) {
        let page = self.page_slice(&self.sorted_indices());
        let keys = self.selectable_keys(&page);
        self.apply_selection(keys, selected);
    }

    /// Select every selectable row on the page, or deselect them if they
    /// are all selected already.
    pub fn toggle_all_page_rows_selected(&mut self) {
        let selected = !self.page_selection_state().is_checked();
        self.set_all_page_rows_selected(selected);
    }

    pub fn set_all_filtered_rows_selected(&mut self, selected: bool) {
        let keys = self.selectable_keys(&self.filtered_indices());
        self.apply_selection(keys, selected);
    }

    pub fn toggle_all_filtered_rows_selected(&mut self) {
        let selected = !self.filtered_selection_state().is_checked();
        self.set_all_filtered_rows_selected(selected);
    }

    /// Selected rows in source order.
    pub fn selected_rows(&self) -> Vec<&T> {
        (0..self.rows.len())
            .filter(|&i| self.is_selected(&self.key_at(i)))
            .map(|i| &self.rows[i])
            .collect()
    }

    /// Selected rows present in the current data.
    pub fn selected_count(&self) -> usize {
        self.selected_rows().len()
    }

    // ── Expansion ───────────────────────────────────────────────────

    pub fn is_row_expandable(&self, index: usize) -> bool {
        match (&self.can_expand, self.rows.get(index)) {
            (_, None) => false,
            (Some(predicate), Some(row)) => predicate(row),
            (None, Some(_)) => true,
        }
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.state.expanded.contains(key)
    }

    pub fn set_row_expanded(&mut self, key: &str, expanded: bool) {
        if !expanded {
            self.state.expanded.remove(key);
            return;
        }
        if let Some(index) = self.index_of(key) {
            if self.is_row_expandable(index) {
                self.state.expanded.insert(key.to_string());
            }
        }
    }

    /// Returns the row's new expansion state.
    pub fn toggle_row_expanded(&mut self, key: &str) -> bool {
        let expanded = !self.is_expanded(key);
        self.set_row_expanded(key, expanded);
        self.is_expanded(key)
    }

    /// Replace the expanded set. Keys of unknown or unexpandable rows are
    /// dropped.
    pub fn set_expanded<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.expanded = keys
            .into_iter()
            .map(Into::into)
            .filter(|key| {
                self.index_of(key)
                    .map_or(false, |i| self.is_row_expandable(i))
            })
            .collect();
    }

    fn expandable_keys(&self) -> Vec<String> {
        (0..self.rows.len())
            .filter(|&i| self.is_row_expandable(i))
            .map(|i| self.key_at(i))
            .collect()
    }

    pub fn is_all_rows_expanded(&self) -> bool {
        let keys = self.expandable_keys();
        !keys.is_empty() && keys.iter().all(|k| self.is_expanded(k))
    }

    pub fn set_all_rows_expanded(&mut self, expanded: bool) {
        if expanded {
            let keys = self.expandable_keys();
            self.state.expanded.extend(keys);
        } else {
            self.state.expanded.clear();
        }
    }

    pub fn toggle_all_rows_expanded(&mut self) {
        let expanded = !self.is_all_rows_expanded();
        self.set_all_rows_expanded(expanded);
    }

    // ── Auto-refresh ────────────────────────────────────────────────

    pub fn auto_refresh(&self) -> Option<&AutoRefresh> {
        self.auto_refresh.as_ref()
    }

    pub fn is_auto_refresh_enabled(&self) -> bool {
        self.auto_refresh
            .as_ref()
            .map(AutoRefresh::is_enabled)
            .unwrap_or(false)
    }

    /// No effect when the grid was built without a refresh callback.
    pub fn set_auto_refresh_enabled(&mut self, enabled: bool) {
        if let Some(refresh) = self.auto_refresh.as_mut() {
            refresh.set_enabled(enabled);
        }
    }

    pub fn toggle_auto_refresh(&mut self) -> bool {
        match self.auto_refresh.as_mut() {
            Some(refresh) => refresh.toggle(),
            None => false,
        }
    }

    pub fn set_refresh_interval(&mut self, interval: Duration) {
        if let Some(refresh) = self.auto_refresh.as_mut() {
            refresh.set_interval(interval);
        }
    }
}

impl<T> std::fmt::Debug for Grid<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows.len())
            .field("columns", &self.columns)
            .field("state", &self.state)
            .field("sync", &self.sync)
            .field("auto_refresh", &self.auto_refresh)
            .finish()
    }
}

fn page_count(rows: usize, page_size: usize) -> usize {
    rows.div_ceil(page_size.max(1))
}
