// TableKit - core/export.rs
//
// CSV and JSON export of table rows (typically the current page).
// Core layer: writes to any Write trait object.

use crate::core::model::Column;
use crate::core::value::{display_text, lookup};
use crate::util::constants::MAX_EXPORT_ROWS;
use crate::util::error::ExportError;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

fn check_row_count(count: usize) -> Result<(), ExportError> {
    if count > MAX_EXPORT_ROWS {
        return Err(ExportError::TooManyRows {
            count,
            max: MAX_EXPORT_ROWS,
        });
    }
    Ok(())
}

/// Export rows to CSV format.
///
/// Writes one header record of column labels, then one record per row with
/// each keyed column's value. Keyless columns are skipped.
/// `export_path` is only used for error context.
pub fn export_csv<W: Write>(
    rows: &[Value],
    columns: &[Column],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_row_count(rows.len())?;

    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let keyed: Vec<&Column> = columns.iter().filter(|c| c.key.is_some()).collect();
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(keyed.iter().map(|c| c.header_label()))
        .map_err(csv_err)?;

    let mut count = 0;
    for row in rows {
        let record = keyed.iter().map(|c| {
            c.key
                .as_deref()
                .and_then(|key| lookup(row, key))
                .map(display_text)
                .unwrap_or_default()
        });
        csv_writer.write_record(record).map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(rows = count, path = %export_path.display(), "CSV export written");
    Ok(count)
}

/// Export rows to JSON format (pretty-printed array of records).
pub fn export_json<W: Write>(
    rows: &[Value],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_row_count(rows.len())?;

    serde_json::to_writer_pretty(writer, rows).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(rows = rows.len(), path = %export_path.display(), "JSON export written");
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::normalize_columns;
    use serde_json::json;

    fn rows() -> Vec<Value> {
        vec![
            json!({ "name": "amy", "age": 30, "team": { "name": "core" } }),
            json!({ "name": "bob, jr", "age": 22 }),
        ]
    }

    #[test]
    fn test_csv_export() {
        let columns = normalize_columns(vec![
            Column::new("name").with_label("Name"),
            Column::new("age"),
            Column::new("team.name").with_label("Team"),
        ]);
        let mut buf = Vec::new();
        let count = export_csv(&rows(), &columns, &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Name,age,Team");
        assert_eq!(lines[1], "amy,30,core");
        assert_eq!(lines[2], "\"bob, jr\",22,");
    }

    #[test]
    fn test_csv_skips_keyless_columns() {
        let columns = vec![
            Column::new("name"),
            Column {
                label: Some("Actions".to_string()),
                ..Default::default()
            },
        ];
        let mut buf = Vec::new();
        export_csv(&rows(), &columns, &mut buf, Path::new("out.csv")).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(!output.contains("Actions"));
    }

    #[test]
    fn test_json_export() {
        let mut buf = Vec::new();
        let count = export_json(&rows(), &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 2);

        let parsed: Vec<Value> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, rows());
    }
}
