// TableKit - app/table.rs
//
// Table controller: headless state for a sortable, filterable, paged table.
//
// Pipeline on every change: source -> filter -> order -> page.
// `filtered` holds the ordered rows that pass the filter; `active` is the
// slice of `filtered` on the current page (all of it when paging is off).

use crate::app::pager::PagerController;
use crate::core::filter::{apply_filter, RowFilter};
use crate::core::model::{column_keys, normalize_columns, Column, TableAction};
use crate::core::order::{self, OrderBy};
use crate::core::paginator::PaginatorOptions;
use crate::core::value::lookup;
use crate::util::constants::DEFAULT_ROW_KEY;
use crate::util::error::FilterError;
use serde_json::Value;
use std::fmt;

/// Called after a state change whose action is in `change_events`.
pub type ChangeListener = Box<dyn FnMut(TableAction, &TableState) + Send>;

/// Observable table state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableState {
    pub columns: Vec<Column>,
    /// All rows not removed.
    pub source: Vec<Value>,
    /// Rows passing the filter, in display order.
    pub filtered: Vec<Value>,
    /// Rows on the current page.
    pub active: Vec<Value>,
    pub selected: Vec<Value>,
    pub removed: Vec<Value>,
    /// Order most recently applied with `order_by`.
    pub order: Option<OrderBy>,
    pub last_action: Option<TableAction>,
}

/// Construction options.
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub columns: Vec<Column>,
    pub source: Vec<Value>,
    pub selected: Vec<Value>,
    /// Field identifying a row for select/remove; rows without it are
    /// compared by full value.
    pub row_key: String,
    /// Paging configuration; `None` shows every filtered row.
    pub pageable: Option<PaginatorOptions>,
    /// Initial order, also re-applied by `reset(true)`.
    pub orderable: Option<OrderBy>,
    /// Fields searched by text filters; `None` searches the column keys.
    pub filter_keys: Option<Vec<String>>,
    /// Text filter applied at construction.
    pub default_filter: Option<String>,
    pub case_sensitive: bool,
    pub change_events: Vec<TableAction>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            source: Vec::new(),
            selected: Vec::new(),
            row_key: DEFAULT_ROW_KEY.to_string(),
            pageable: None,
            orderable: None,
            filter_keys: None,
            default_filter: None,
            case_sensitive: false,
            change_events: TableAction::default_change_events(),
        }
    }
}

/// Headless table controller.
pub struct TableController {
    state: TableState,
    filter: RowFilter,
    pager: Option<PagerController>,
    row_key: String,
    orderable: Option<OrderBy>,
    change_events: Vec<TableAction>,
    listener: Option<ChangeListener>,
}

impl fmt::Debug for TableController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableController")
            .field("state", &self.state)
            .field("filter", &self.filter)
            .field("pager", &self.pager)
            .field("change_events", &self.change_events)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl TableController {
    pub fn new(options: TableOptions) -> Self {
        let columns = normalize_columns(options.columns);
        let keys = options
            .filter_keys
            .unwrap_or_else(|| column_keys(&columns));

        let mut filter = RowFilter::with_keys(keys);
        filter.case_sensitive = options.case_sensitive;
        if let Some(ref query) = options.default_filter {
            filter.set_text(query);
        }

        let mut controller = Self {
            state: TableState {
                columns,
                source: options.source,
                selected: options.selected,
                ..Default::default()
            },
            filter,
            pager: options.pageable.map(|p| PagerController::new(&p)),
            row_key: options.row_key,
            orderable: options.orderable,
            change_events: options.change_events,
            listener: None,
        };

        controller.state.filtered = controller.filtered_rows();
        if let Some(ref initial) = controller.orderable {
            order::sort(&mut controller.state.filtered, initial.clone(), None);
        }
        controller.refresh_page();

        tracing::debug!(
            rows = controller.state.source.len(),
            filtered = controller.state.filtered.len(),
            paged = controller.pager.is_some(),
            "Table controller created"
        );
        controller
    }

    /// Register the change listener.
    pub fn on_change<F>(mut self, listener: F) -> Self
    where
        F: FnMut(TableAction, &TableState) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn columns(&self) -> &[Column] {
        &self.state.columns
    }

    pub fn active(&self) -> &[Value] {
        &self.state.active
    }

    pub fn filter(&self) -> &RowFilter {
        &self.filter
    }

    pub fn pager(&self) -> Option<&PagerController> {
        self.pager.as_ref()
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Keep rows containing `query` in any searched field.
    pub fn filter_text(&mut self, query: &str) -> &mut Self {
        self.filter.set_text(query);
        self.state.filtered = self.ordered(self.filtered_rows());
        self.dispatch(TableAction::Filter)
    }

    /// Keep rows matching `pattern` in any searched field.
    pub fn filter_regex(&mut self, pattern: &str) -> Result<&mut Self, FilterError> {
        self.filter.set_regex(pattern)?;
        self.state.filtered = self.ordered(self.filtered_rows());
        Ok(self.dispatch(TableAction::Filter))
    }

    /// Keep rows for which `predicate` holds. Text and regex filters are
    /// not applied.
    pub fn filter_with<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&Value) -> bool,
    {
        let rows = self
            .state
            .source
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect();
        self.state.filtered = self.ordered(rows);
        self.dispatch(TableAction::Filter)
    }

    /// Drop text and regex filters.
    pub fn clear_filter(&mut self) -> &mut Self {
        self.filter.clear();
        self.state.filtered = self.ordered(self.filtered_rows());
        self.dispatch(TableAction::Filter)
    }

    // -------------------------------------------------------------------------
    // Ordering
    // -------------------------------------------------------------------------

    /// Sort the filtered rows; the order sticks for later filters.
    pub fn order_by(&mut self, order: impl Into<OrderBy>) -> &mut Self {
        let order = order.into();
        order::sort(&mut self.state.filtered, order.clone(), None);
        self.state.order = Some(order);
        self.dispatch(TableAction::Sort)
    }

    /// Replace the rows on the current page, e.g. after a drag reorder.
    /// Paging is not recomputed.
    pub fn reorder(&mut self, rows: Vec<Value>) -> &mut Self {
        self.state.active = rows;
        self.notify(TableAction::Reorder);
        self
    }

    // -------------------------------------------------------------------------
    // Selection and removal
    // -------------------------------------------------------------------------

    pub fn select(&mut self, row: Value) -> &mut Self {
        self.state.selected.push(row);
        self.notify(TableAction::Select);
        self
    }

    pub fn is_selected(&self, row: &Value) -> bool {
        self.state.selected.iter().any(|r| self.same_row(r, row))
    }

    /// Remove `row` from the table, remembering it for `reset(true)`.
    pub fn remove(&mut self, row: &Value) -> &mut Self {
        let key = self.row_key.clone();
        let keep = |r: &Value| !same_row(&key, r, row);
        self.state.source.retain(|r| keep(r));
        self.state.filtered.retain(|r| keep(r));
        self.state.active.retain(|r| keep(r));
        self.state.removed.push(row.clone());
        self.dispatch(TableAction::Remove)
    }

    /// Clear selection and removal history and show every source row again.
    /// With `restore_removed`, removed rows return to the source and the
    /// initial order is re-applied.
    pub fn reset(&mut self, restore_removed: bool) -> &mut Self {
        if restore_removed {
            let removed = std::mem::take(&mut self.state.removed);
            self.state.source.extend(removed);
        }
        self.filter.clear();
        self.state.removed.clear();
        self.state.selected.clear();
        self.state.filtered = self.state.source.clone();
        if restore_removed {
            if let Some(ref initial) = self.orderable {
                order::sort(&mut self.state.filtered, initial.clone(), None);
            }
        }
        self.dispatch(TableAction::Reset)
    }

    // -------------------------------------------------------------------------
    // Paging
    // -------------------------------------------------------------------------

    /// Go to `page`; false when paging is off or the page does not exist.
    pub fn page_to(&mut self, page: i64) -> bool {
        self.navigate(|pager| pager.to(page))
    }

    pub fn next_page(&mut self) -> bool {
        self.navigate(PagerController::next)
    }

    pub fn previous_page(&mut self) -> bool {
        self.navigate(PagerController::previous)
    }

    pub fn first_page(&mut self) -> bool {
        self.navigate(PagerController::first)
    }

    pub fn last_page(&mut self) -> bool {
        self.navigate(PagerController::last)
    }

    /// Change page size; the current page is clamped to the new range.
    pub fn set_page_size(&mut self, size: i64) -> &mut Self {
        if let Some(ref mut pager) = self.pager {
            pager.update(&PaginatorOptions::new().size(size));
        }
        self.dispatch(TableAction::Page)
    }

    fn navigate<F>(&mut self, step: F) -> bool
    where
        F: FnOnce(&mut PagerController) -> bool,
    {
        let moved = self.pager.as_mut().map_or(false, step);
        if moved {
            self.dispatch(TableAction::Page);
        }
        moved
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn filtered_rows(&self) -> Vec<Value> {
        apply_filter(&self.state.source, &self.filter)
            .into_iter()
            .map(|idx| self.state.source[idx].clone())
            .collect()
    }

    /// Apply the current order (if any) to freshly filtered rows.
    fn ordered(&self, mut rows: Vec<Value>) -> Vec<Value> {
        if let Some(order) = self.state.order.as_ref().or(self.orderable.as_ref()) {
            order::sort(&mut rows, order.clone(), None);
        }
        rows
    }

    fn same_row(&self, a: &Value, b: &Value) -> bool {
        same_row(&self.row_key, a, b)
    }

    /// Sync the pager with `filtered` and recompute `active`.
    fn refresh_page(&mut self) {
        match self.pager {
            Some(ref mut pager) => {
                pager.set_items(self.state.filtered.len());
                self.state.active = pager.get_range(&self.state.filtered).to_vec();
            }
            None => self.state.active = self.state.filtered.clone(),
        }
    }

    fn dispatch(&mut self, action: TableAction) -> &mut Self {
        self.refresh_page();
        self.notify(action);
        self
    }

    fn notify(&mut self, action: TableAction) {
        self.state.last_action = Some(action);
        tracing::debug!(
            action = %action,
            filtered = self.state.filtered.len(),
            active = self.state.active.len(),
            "Table state changed"
        );
        if self.change_events.contains(&action) {
            if let Some(ref mut listener) = self.listener {
                listener(action, &self.state);
            }
        }
    }
}

/// Rows are the same when their `row_key` values match, or when neither has
/// that key and the rows are equal.
fn same_row(row_key: &str, a: &Value, b: &Value) -> bool {
    match (lookup(a, row_key), lookup(b, row_key)) {
        (Some(x), Some(y)) if !x.is_null() && !y.is_null() => x == y,
        _ => a == b,
    }
}
