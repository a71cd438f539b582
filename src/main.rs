// TableKit - main.rs
//
// CLI entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Reading a JSON array of records
// 4. filter -> sort -> paginate through the table controller
// 5. Printing the current page and a pager footer

use clap::{Parser, ValueEnum};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tablekit::app::pager::PagerController;
use tablekit::app::table::{TableController, TableOptions};
use tablekit::core::export::{export_csv, export_json};
use tablekit::core::model::{normalize_columns, Column};
use tablekit::core::order::OrderBy;
use tablekit::core::paginator::PaginatorOptions;
use tablekit::core::value::{display_text, lookup};
use tablekit::platform::config::{self, AppConfig, PlatformPaths};
use tablekit::util::{self, error::ExportError, error::TableKitError};

/// Output format for the selected page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

/// TableKit - sort, filter and page through JSON record collections.
#[derive(Parser, Debug)]
#[command(name = "tablekit", version, about)]
struct Cli {
    /// JSON file holding an array of records.
    input: PathBuf,

    /// Comma-separated order, e.g. `-age,name` or `age:desc,name`.
    #[arg(short = 'o', long = "order")]
    order: Option<String>,

    /// Keep rows containing this text in any column.
    #[arg(short = 'f', long = "filter")]
    filter: Option<String>,

    /// Keep rows matching this regex in any column.
    #[arg(short = 'r', long = "regex")]
    regex: Option<String>,

    /// Comma-separated column keys (dotted paths allowed).
    /// Defaults to the keys of the first record.
    #[arg(short = 'c', long = "columns")]
    columns: Option<String>,

    /// Page to show (1-based).
    #[arg(short = 'p', long = "page")]
    page: Option<i64>,

    /// Rows per page.
    #[arg(short = 's', long = "size")]
    size: Option<i64>,

    /// Page numbers in the pager window.
    #[arg(long = "pages")]
    pages: Option<i64>,

    #[arg(long = "format", value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Config file (defaults to config.toml in the platform config directory).
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "TableKit failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), TableKitError> {
    // An explicit --config must be readable; the platform default is optional.
    let (app_config, warnings) = match cli.config {
        Some(ref path) => config::validate(config::read_config(path)?),
        None => config::load_config(&PlatformPaths::resolve().config_file()),
    };

    util::logging::init(cli.debug, app_config.log_level.as_deref());
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        input = %cli.input.display(),
        "TableKit starting"
    );

    let records = tablekit::platform::fs::read_records(&cli.input)?;
    let columns = match cli.columns {
        Some(ref list) => normalize_columns(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<&str>>(),
        ),
        None => infer_columns(&records),
    };

    let mut table = build_table(&cli, &app_config, columns, records);
    if let Some(ref pattern) = cli.regex {
        table.filter_regex(pattern)?;
    }
    if let Some(ref order) = cli.order {
        table.order_by(OrderBy::parse_list(order));
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let target = Path::new("<stdout>");
    let io_err = |e: std::io::Error| ExportError::Io {
        path: target.to_path_buf(),
        source: e,
    };

    match cli.format {
        Format::Json => {
            export_json(table.active(), &mut out, target)?;
            writeln!(out).map_err(io_err)?;
        }
        Format::Csv => {
            export_csv(table.active(), table.columns(), &mut out, target)?;
        }
        Format::Table => {
            write!(out, "{}", render_table(table.columns(), table.active())).map_err(io_err)?;
        }
    }

    // Keep stdout machine-readable for json/csv.
    if let Some(pager) = table.pager() {
        let footer = render_footer(pager, table.state().filtered.len());
        if cli.format == Format::Table {
            writeln!(out, "\n{footer}").map_err(io_err)?;
        } else {
            eprintln!("{footer}");
        }
    }
    Ok(())
}

fn build_table(
    cli: &Cli,
    app_config: &AppConfig,
    columns: Vec<Column>,
    records: Vec<Value>,
) -> TableController {
    let mut pageable = PaginatorOptions::new()
        .size(cli.size.unwrap_or(app_config.page_size))
        .pages(cli.pages.unwrap_or(app_config.window_pages));
    if let Some(page) = cli.page {
        pageable = pageable.page(page);
    }

    TableController::new(TableOptions {
        columns,
        source: records,
        pageable: Some(pageable),
        orderable: (!app_config.order.is_empty()).then(|| app_config.order.clone()),
        default_filter: cli.filter.clone(),
        case_sensitive: app_config.case_sensitive,
        ..Default::default()
    })
}

/// Top-level keys of the first object record.
fn infer_columns(records: &[Value]) -> Vec<Column> {
    let keys: Vec<String> = records
        .iter()
        .find_map(Value::as_object)
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();
    normalize_columns(keys)
}

/// Plain-text table with space-padded columns.
fn render_table(columns: &[Column], rows: &[Value]) -> String {
    let keyed: Vec<&Column> = columns.iter().filter(|c| c.key.is_some()).collect();
    let header: Vec<String> = keyed.iter().map(|c| c.header_label()).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            keyed
                .iter()
                .map(|c| {
                    c.key
                        .as_deref()
                        .and_then(|key| lookup(row, key))
                        .map(display_text)
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&header[..]));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&line(&rule[..]));
    out.push('\n');
    for cells in &body {
        out.push_str(&line(&cells[..]));
        out.push('\n');
    }
    out
}

/// `« 3 [4] 5 »  page 4 of 10, 97 rows` with arrows only when navigable.
fn render_footer(pager: &PagerController, rows: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !pager.is_prev_disabled() {
        parts.push("«".to_string());
    }
    for button in pager.page_buttons() {
        if button.active {
            parts.push(format!("[{}]", button.label));
        } else {
            parts.push(button.label);
        }
    }
    if !pager.is_next_disabled() {
        parts.push("»".to_string());
    }
    format!(
        "{}  page {} of {}, {rows} rows",
        parts.join(" "),
        pager.page(),
        pager.total_pages()
    )
    .trim_start()
    .to_string()
}
