// TableKit - platform/fs.rs
//
// Reading record collections from disk.

use crate::util::constants::MAX_INPUT_FILE_SIZE;
use crate::util::error::InputError;
use serde_json::Value;
use std::path::Path;

/// Read a JSON array of records from `path`.
///
/// Files larger than `MAX_INPUT_FILE_SIZE` are rejected before reading.
/// Invalid UTF-8 is replaced rather than failing the whole file.
pub fn read_records(path: &Path) -> Result<Vec<Value>, InputError> {
    let io_err = |e| InputError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > MAX_INPUT_FILE_SIZE {
        return Err(InputError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: MAX_INPUT_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    let content = String::from_utf8_lossy(&bytes);

    let value: Value = serde_json::from_str(&content).map_err(|e| InputError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    match value {
        Value::Array(rows) => {
            tracing::debug!(path = %path.display(), rows = rows.len(), "Records loaded");
            Ok(rows)
        }
        _ => Err(InputError::NotAnArray {
            path: path.to_path_buf(),
        }),
    }
}
