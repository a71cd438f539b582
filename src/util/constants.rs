// TableKit - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "TableKit";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "TableKit";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Pagination defaults
// =============================================================================

/// Page requested when none is given (pages are 1-based).
pub const DEFAULT_PAGE: i64 = 1;

/// Number of rows shown per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Number of page-number buttons in the visible window.
pub const DEFAULT_WINDOW_PAGES: i64 = 3;

/// Hard cap on the page window of any snapshot, so a huge `pages` input
/// cannot allocate an unbounded `active_pages` list.
pub const MAX_PAGE_WINDOW: i64 = 1_000;

/// Smallest page size accepted from `config.toml`.
/// The paginator itself tolerates anything; config validation is stricter.
pub const MIN_PAGE_SIZE: i64 = 1;

/// Largest page size accepted from `config.toml`.
pub const MAX_PAGE_SIZE: i64 = 10_000;

/// Smallest page window accepted from `config.toml`.
pub const MIN_WINDOW_PAGES: i64 = 1;

/// Largest page window accepted from `config.toml`.
pub const MAX_WINDOW_PAGES: i64 = 50;

// =============================================================================
// Ordering
// =============================================================================

/// Case-sensitive prefix pattern that marks an order indicator as descending.
pub const DESCENDING_PATTERN: &str = r"^(desc|descending|-1|true)";

/// Maximum number of fields in one order specification loaded from config.
pub const MAX_ORDER_FIELDS: usize = 16;

// =============================================================================
// Filtering
// =============================================================================

/// Maximum regex pattern length to prevent ReDoS.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4_096;

// =============================================================================
// Table controller
// =============================================================================

/// Column key used to identify rows when none is configured.
pub const DEFAULT_ROW_KEY: &str = "id";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted `[logging] level` values.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Export
// =============================================================================

/// Maximum number of rows that can be exported in a single operation.
pub const MAX_EXPORT_ROWS: usize = 5_000_000;

// =============================================================================
// Input
// =============================================================================

/// Maximum size of a JSON input file read by the CLI.
pub const MAX_INPUT_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MB

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Session persistence file name (stored in the platform data directory).
pub const SESSION_FILE_NAME: &str = "session.json";

/// Key under which the view session is stored in a key-value store.
pub const SESSION_KEY: &str = "tablekit.view";
