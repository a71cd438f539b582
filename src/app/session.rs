// TableKit - app/session.rs
//
// View persistence: remember a table's order, page, page size and text query
// through a key-value store.
//
// - The store is a trait so hosts can plug in their own backend; an in-memory
//   store and a JSON-file store are provided.
// - FileStore writes atomically (write temp, rename) so a crash during save
//   never corrupts the previous file.
// - Loading never fails loudly: a missing, corrupt or outdated session just
//   yields None and the table starts fresh.

use crate::app::table::TableController;
use crate::core::order::OrderBy;
use crate::util::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, SESSION_FILE_NAME, SESSION_KEY};
use crate::util::error::SessionError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Version stamp for compatibility checks.
///
/// Bump whenever `ViewSession` changes in a breaking way; stored sessions
/// with another version are discarded.
pub const SESSION_VERSION: u32 = 1;

// =============================================================================
// Stores
// =============================================================================

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError>;
}

/// Store that lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a JSON object file (`{"key": "value", ...}`).
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default session file inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SESSION_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&content).map_err(|e| SessionError::Json { source: e })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let io_err = |path: &Path, e: std::io::Error| SessionError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }

        let json =
            serde_json::to_string_pretty(map).map_err(|e| SessionError::Json { source: e })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json.as_bytes()).map_err(|e| io_err(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            io_err(&self.path, e)
        })?;

        tracing::debug!(path = %self.path.display(), entries = map.len(), "Session store written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_map() {
            Ok(mut map) => map.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Cannot read session store");
                None
            }
        }
    }

    /// A corrupt store file is replaced rather than blocking the write.
    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(SessionError::Json { source }) => {
                tracing::warn!(path = %self.path.display(), error = %source, "Replacing malformed session store");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_string(), value);
        self.write_map(&map)
    }
}

// =============================================================================
// View session
// =============================================================================

/// Persisted view of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSession {
    pub version: u32,
    /// Order fields in textual form, e.g. `["-age", "name"]`.
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
    #[serde(default)]
    pub query: String,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for ViewSession {
    fn default() -> Self {
        Self {
            version: SESSION_VERSION,
            order: Vec::new(),
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            query: String::new(),
        }
    }
}

impl ViewSession {
    /// Capture the current view of `table`.
    pub fn from_table(table: &TableController) -> Self {
        let (page, size) = table
            .pager()
            .map(|p| (p.page().max(DEFAULT_PAGE), p.snapshot().size))
            .unwrap_or((DEFAULT_PAGE, DEFAULT_PAGE_SIZE));
        Self {
            version: SESSION_VERSION,
            order: table
                .state()
                .order
                .as_ref()
                .map(OrderBy::to_strings)
                .unwrap_or_default(),
            page,
            size,
            query: table.filter().text_search.clone(),
        }
    }

    /// Apply this view to `table`: query, then order, then size and page.
    pub fn restore_into(&self, table: &mut TableController) {
        table.filter_text(&self.query);
        if !self.order.is_empty() {
            table.order_by(self.order_by());
        }
        if table.pager().is_some() {
            table.set_page_size(self.size);
            if !table.page_to(self.page) {
                tracing::debug!(page = self.page, "Saved page no longer exists");
            }
        }
    }

    /// The stored order, ready for sorting.
    pub fn order_by(&self) -> OrderBy {
        OrderBy::parse_list(&self.order.join(","))
    }
}

/// Save `view` under the session key.
pub fn save_view(store: &mut dyn KeyValueStore, view: &ViewSession) -> Result<(), SessionError> {
    let json = serde_json::to_string(view).map_err(|e| SessionError::Json { source: e })?;
    store.set(SESSION_KEY, json)?;
    tracing::debug!(page = view.page, size = view.size, "View session saved");
    Ok(())
}

/// Load the view stored under the session key.
///
/// Returns `None` when nothing is stored, the data is malformed, or the
/// version differs from `SESSION_VERSION`.
pub fn load_view(store: &dyn KeyValueStore) -> Option<ViewSession> {
    let json = store.get(SESSION_KEY)?;

    let view: ViewSession = serde_json::from_str(&json)
        .map_err(|e| {
            tracing::warn!(error = %e, "Stored view session is malformed, starting fresh");
        })
        .ok()?;

    if view.version != SESSION_VERSION {
        tracing::warn!(
            found = view.version,
            expected = SESSION_VERSION,
            "View session version mismatch, starting fresh"
        );
        return None;
    }

    tracing::debug!(page = view.page, size = view.size, "View session loaded");
    Some(view)
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::table::TableOptions;
    use crate::core::paginator::PaginatorOptions;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_view() -> ViewSession {
        ViewSession {
            order: vec!["-age".to_string(), "name".to_string()],
            page: 2,
            size: 5,
            query: "ann".to_string(),
            ..Default::default()
        }
    }

    fn table() -> TableController {
        let rows = (1..=30)
            .map(|i| json!({ "id": i, "name": format!("name{i}"), "age": 20 + i % 7 }))
            .collect();
        TableController::new(TableOptions {
            columns: vec!["name".into(), "age".into()],
            source: rows,
            pageable: Some(PaginatorOptions::new().size(10)),
            ..Default::default()
        })
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        save_view(&mut store, &sample_view()).unwrap();
        assert_eq!(load_view(&store), Some(sample_view()));
    }

    #[test]
    fn test_load_missing_returns_none() {
        assert!(load_view(&MemoryStore::new()).is_none());

        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert!(load_view(&store).is_none());
    }

    #[test]
    fn test_load_malformed_returns_none() {
        let mut store = MemoryStore::new();
        store.set(SESSION_KEY, "not json {{".to_string()).unwrap();
        assert!(load_view(&store).is_none());
    }

    #[test]
    fn test_load_wrong_version_returns_none() {
        let mut store = MemoryStore::new();
        let view = ViewSession {
            version: 99,
            ..sample_view()
        };
        save_view(&mut store, &view).unwrap();
        assert!(load_view(&store).is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let mut store = MemoryStore::new();
        store.set(SESSION_KEY, r#"{"version":1}"#.to_string()).unwrap();
        let view = load_view(&store).expect("minimal session should load");
        assert_eq!(view.page, DEFAULT_PAGE);
        assert_eq!(view.size, DEFAULT_PAGE_SIZE);
        assert!(view.order.is_empty());
    }

    #[test]
    fn test_file_store_round_trip_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let mut store = FileStore::new(&path);
        store.set("other", "kept".to_string()).unwrap();
        save_view(&mut store, &sample_view()).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(load_view(&reopened), Some(sample_view()));
        assert_eq!(reopened.get("other").as_deref(), Some("kept"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_replaces_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"garbage").unwrap();

        let mut store = FileStore::new(&path);
        assert!(store.get(SESSION_KEY).is_none());
        save_view(&mut store, &sample_view()).unwrap();
        assert_eq!(load_view(&store), Some(sample_view()));
    }

    #[test]
    fn test_capture_and_restore_table_view() {
        let mut saved = table();
        saved.filter_text("1");
        saved.order_by("-age");
        saved.set_page_size(5);
        saved.page_to(2);
        let view = ViewSession::from_table(&saved);
        assert_eq!(view.query, "1");
        assert_eq!(view.order, vec!["-age"]);
        assert_eq!((view.page, view.size), (2, 5));

        let mut restored = table();
        view.restore_into(&mut restored);
        assert_eq!(restored.active(), saved.active());
        assert_eq!(restored.pager().map(|p| p.page()), Some(2));
        assert_eq!(view.order_by().to_strings(), vec!["-age"]);
    }
}
