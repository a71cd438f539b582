// TableKit - platform/config.rs
//
// Platform directory resolution and config.toml loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows) and
// Library (macOS) locations.

use crate::core::order::{FieldSpec, OrderBy};
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for TableKit configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/tablekit/).
    pub config_dir: PathBuf,

    /// Data directory holding the session store.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be
    /// determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are ignored so a newer config file still works with an older
/// binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[pager]` section.
    pub pager: PagerSection,
    /// `[table]` section.
    pub table: TableSection,
    /// `[filter]` section.
    pub filter: FilterSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[pager]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PagerSection {
    /// Rows per page.
    pub size: Option<i64>,
    /// Page-number buttons in the visible window.
    pub pages: Option<i64>,
}

/// `[table]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TableSection {
    /// Initial order, e.g. `["-age", "name"]`.
    pub order: Option<Vec<String>>,
}

/// `[filter]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FilterSection {
    pub case_sensitive: Option<bool>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub page_size: i64,
    pub window_pages: i64,
    /// Initial order; empty keeps input order.
    pub order: OrderBy,
    pub case_sensitive: bool,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: constants::DEFAULT_PAGE_SIZE,
            window_pages: constants::DEFAULT_WINDOW_PAGES,
            order: OrderBy::default(),
            case_sensitive: false,
            log_level: None,
        }
    }
}

/// Read and parse a config file without validating values.
pub fn read_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load and validate the config file at `path`.
///
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults with one warning.
pub fn load_config(path: &Path) -> (AppConfig, Vec<String>) {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match read_config(path) {
        Ok(raw) => {
            tracing::info!(path = %path.display(), "Loaded config.toml");
            validate(raw)
        }
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Validate each field against the named limits, accumulating warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    let mut reject = |field: &str, value: String, expected: String, default: String| {
        let err = ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value,
            expected,
        };
        warnings.push(format!("{err}. Using default ({default})."));
    };

    // -- Pager: size --
    if let Some(size) = raw.pager.size {
        if (constants::MIN_PAGE_SIZE..=constants::MAX_PAGE_SIZE).contains(&size) {
            config.page_size = size;
        } else {
            reject(
                "[pager] size",
                size.to_string(),
                format!("{}-{}", constants::MIN_PAGE_SIZE, constants::MAX_PAGE_SIZE),
                constants::DEFAULT_PAGE_SIZE.to_string(),
            );
        }
    }

    // -- Pager: pages --
    if let Some(pages) = raw.pager.pages {
        if (constants::MIN_WINDOW_PAGES..=constants::MAX_WINDOW_PAGES).contains(&pages) {
            config.window_pages = pages;
        } else {
            reject(
                "[pager] pages",
                pages.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_WINDOW_PAGES,
                    constants::MAX_WINDOW_PAGES
                ),
                constants::DEFAULT_WINDOW_PAGES.to_string(),
            );
        }
    }

    // -- Table: order --
    if let Some(fields) = raw.table.order {
        let blank = fields.iter().any(|f| f.trim().is_empty());
        if fields.len() > constants::MAX_ORDER_FIELDS || blank {
            reject(
                "[table] order",
                format!("{fields:?}"),
                format!(
                    "up to {} non-empty field names",
                    constants::MAX_ORDER_FIELDS
                ),
                "input order".to_string(),
            );
        } else {
            config.order = fields
                .iter()
                .filter_map(|f| f.parse::<FieldSpec>().ok())
                .collect();
        }
    }

    // -- Filter: case_sensitive --
    if let Some(case_sensitive) = raw.filter.case_sensitive {
        config.case_sensitive = case_sensitive;
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            reject(
                "[logging] level",
                level.clone(),
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL.to_string(),
            );
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(constants::CONFIG_FILE_NAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file_uses_defaults_silently() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(&dir.path().join("absent.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.page_size, constants::DEFAULT_PAGE_SIZE);
        assert!(config.order.is_empty());
    }

    #[test]
    fn test_valid_config_is_applied() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[pager]
size = 25
pages = 5

[table]
order = ["-age", "name:asc"]

[filter]
case_sensitive = true

[logging]
level = "DEBUG"

[future]
unknown = 1
"#,
        );
        let (config, warnings) = load_config(&path);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.window_pages, 5);
        assert_eq!(config.order.to_strings(), vec!["-age", "name:asc"]);
        assert!(config.case_sensitive);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back_with_warnings() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[pager]\nsize = 0\npages = 500\n[logging]\nlevel = \"loud\"\n[table]\norder = [\"\"]\n",
        );
        let (config, warnings) = load_config(&path);
        assert_eq!(warnings.len(), 4, "one warning per bad field: {warnings:?}");
        assert_eq!(config.page_size, constants::DEFAULT_PAGE_SIZE);
        assert_eq!(config.window_pages, constants::DEFAULT_WINDOW_PAGES);
        assert!(config.log_level.is_none());
        assert!(config.order.is_empty());
        assert!(warnings[0].contains("[pager] size"));
    }

    #[test]
    fn test_unparseable_file_warns_and_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[pager\nsize = ");
        let (config, warnings) = load_config(&path);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));
        assert_eq!(config.page_size, constants::DEFAULT_PAGE_SIZE);
        assert!(matches!(read_config(&path), Err(ConfigError::TomlParse { .. })));
    }

    #[test]
    fn test_read_config_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = read_config(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
