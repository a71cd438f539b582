// TableKit - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
//
// The sorting and pagination core never fails; these errors only cover the
// fallible edges around it: user-supplied regex filters, config files,
// input files, exports and the session store.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all TableKit operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum TableKitError {
    /// Filter operation failed.
    Filter(FilterError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Reading the record input failed.
    Input(InputError),

    /// Session store access failed.
    Session(SessionError),
}

impl fmt::Display for TableKitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Input(e) => write!(f, "Input error: {e}"),
            Self::Session(e) => write!(f, "Session error: {e}"),
        }
    }
}

impl std::error::Error for TableKitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Input(e) => Some(e),
            Self::Session(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to filter operations.
#[derive(Debug)]
pub enum FilterError {
    /// User-provided regex is invalid.
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },

    /// User-provided regex exceeds the maximum allowed length.
    RegexTooLong { length: usize, max_length: usize },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegex { pattern, source } => {
                write!(f, "Invalid filter regex '{pattern}': {source}")
            }
            Self::RegexTooLong { length, max_length } => write!(
                f,
                "Filter regex is {length} chars, exceeds maximum of {max_length}"
            ),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            Self::RegexTooLong { .. } => None,
        }
    }
}

impl From<FilterError> for TableKitError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum row count.
    TooManyRows { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::TooManyRows { count, max } => write!(
                f,
                "Export of {count} rows exceeds maximum of {max}. \
                 Apply filters or paging to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::TooManyRows { .. } => None,
        }
    }
}

impl From<ExportError> for TableKitError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::ValueOutOfRange { .. } => None,
        }
    }
}

impl From<ConfigError> for TableKitError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// Errors related to reading record collections from disk.
#[derive(Debug)]
pub enum InputError {
    /// I/O error reading the input file.
    Io { path: PathBuf, source: io::Error },

    /// Input file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Input is not valid JSON.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Input is valid JSON but not an array of records.
    NotAnArray { path: PathBuf },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Json { path, source } => {
                write!(f, "'{}': invalid JSON: {source}", path.display())
            }
            Self::NotAnArray { path } => {
                write!(f, "'{}': expected a JSON array of records", path.display())
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<InputError> for TableKitError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

/// Errors related to the key-value session store.
#[derive(Debug)]
pub enum SessionError {
    /// I/O error reading or writing the store file.
    Io { path: PathBuf, source: io::Error },

    /// Store contents could not be (de)serialised.
    Json { source: serde_json::Error },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Session store I/O error '{}': {source}", path.display())
            }
            Self::Json { source } => write!(f, "Session data is not valid JSON: {source}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

impl From<SessionError> for TableKitError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

/// Convenience type alias for TableKit results.
pub type Result<T> = std::result::Result<T, TableKitError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_filter_error_preserves_regex_source() {
        let source = regex::Regex::new("[oops").unwrap_err();
        let err: TableKitError = FilterError::InvalidRegex {
            pattern: "[oops".to_string(),
            source,
        }
        .into();

        assert!(err.to_string().starts_with("Filter error: Invalid filter regex '[oops'"));
        let inner = err.source().expect("top-level error keeps its cause");
        assert!(inner.source().is_some(), "regex error should be chained");
    }

    #[test]
    fn test_too_many_rows_message_is_actionable() {
        let err = ExportError::TooManyRows { count: 12, max: 10 };
        let msg = err.to_string();
        assert!(msg.contains("12 rows"));
        assert!(msg.contains("Apply filters"));
        assert!(err.source().is_none());
    }
}
