// TableKit - core/model.rs
//
// Shared table vocabulary: column definitions and controller actions.
// Pure data definitions with no I/O.

use serde::{Deserialize, Serialize};

// =============================================================================
// Columns
// =============================================================================

/// A table column.
///
/// `key` is the dotted path of the column's value inside each record.
/// Columns without a key can still be rendered by the host (e.g. an actions
/// column) but are skipped by filtering and export.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    pub key: Option<String>,
    pub label: Option<String>,
    /// Display position; 1-based when assigned automatically.
    pub index: Option<i64>,
}

impl Column {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_index(mut self, index: i64) -> Self {
        self.index = Some(index);
        self
    }

    /// Header text: the label, else the key, else `Column <index>`.
    pub fn header_label(&self) -> String {
        self.label
            .clone()
            .or_else(|| self.key.clone())
            .unwrap_or_else(|| format!("Column {}", self.index.unwrap_or_default()))
    }
}

impl From<&str> for Column {
    fn from(key: &str) -> Self {
        Column::new(key)
    }
}

impl From<String> for Column {
    fn from(key: String) -> Self {
        Column::new(key)
    }
}

/// Fill in labels and positions, then order columns by position.
///
/// A missing label falls back to the key; a missing index becomes the
/// column's 1-based declaration position. An explicit index of 0 is kept.
/// Columns sharing an index keep their declaration order.
pub fn normalize_columns<C: Into<Column>>(columns: Vec<C>) -> Vec<Column> {
    let mut columns: Vec<Column> = columns
        .into_iter()
        .enumerate()
        .map(|(i, column)| {
            let mut column = column.into();
            if column.label.is_none() {
                column.label = column.key.clone();
            }
            if column.index.is_none() {
                column.index = Some(i64::try_from(i).unwrap_or(i64::MAX).saturating_add(1));
            }
            column
        })
        .collect();
    columns.sort_by_key(|c| c.index);
    columns
}

/// Keys of all columns that have one, in column order.
pub fn column_keys(columns: &[Column]) -> Vec<String> {
    columns.iter().filter_map(|c| c.key.clone()).collect()
}

// =============================================================================
// Table actions
// =============================================================================

/// State transitions of a table controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableAction {
    Filter,
    Sort,
    Select,
    Remove,
    Reset,
    Page,
    Reorder,
}

impl TableAction {
    /// Actions that notify the change listener unless configured otherwise.
    pub fn default_change_events() -> Vec<TableAction> {
        vec![TableAction::Filter, TableAction::Select, TableAction::Remove]
    }

    pub fn label(&self) -> &'static str {
        match self {
            TableAction::Filter => "FILTER",
            TableAction::Sort => "SORT",
            TableAction::Select => "SELECT",
            TableAction::Remove => "REMOVE",
            TableAction::Reset => "RESET",
            TableAction::Page => "PAGE",
            TableAction::Reorder => "REORDER",
        }
    }
}

impl std::fmt::Display for TableAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
