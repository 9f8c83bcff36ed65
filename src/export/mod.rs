//! Export module for writing collected tenders to tabular files
//!
//! This module handles:
//! - CSV and XLSX exports over the final item collection
//! - Deriving the column set from the data rather than a fixed schema
//! - The decoupled summary report over a previously exported CSV

mod csv_export;
mod report;
mod xlsx_export;

pub use csv_export::CsvExporter;
pub use report::{load_report, print_report, TenderReport};
pub use xlsx_export::XlsxExporter;

use crate::config::OutputConfig;
use crate::state::{Item, RunState};
use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing export files
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Trait for export collaborators
///
/// Exporters consume the final item collection read-only. The column set is
/// the keys of the first item, in their response order; items missing a
/// column produce an empty cell and keys the first item lacks are dropped.
pub trait Exporter {
    /// File extension this exporter produces, without the dot
    fn extension(&self) -> &'static str;

    /// Writes the collection to the given path
    fn export(&self, items: &[Item], path: &Path) -> ExportResult<()>;
}

/// Paths produced by a run's exports; `None` when the collection was empty
#[derive(Debug, Default)]
pub struct ExportPaths {
    pub csv: Option<PathBuf>,
    pub xlsx: Option<PathBuf>,
}

/// Writes the CSV and XLSX exports for a finished run
///
/// An empty collection logs a warning and produces no files.
pub fn export_all(state: &RunState, output: &OutputConfig) -> ExportResult<ExportPaths> {
    if state.is_empty() {
        tracing::warn!("No data to save");
        return Ok(ExportPaths::default());
    }

    std::fs::create_dir_all(&output.directory)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

    let csv_path = export_path(output, &timestamp, CsvExporter.extension());
    CsvExporter.export(state.items(), &csv_path)?;
    tracing::info!("Data saved to {}", csv_path.display());

    let xlsx_path = export_path(output, &timestamp, XlsxExporter.extension());
    XlsxExporter.export(state.items(), &xlsx_path)?;
    tracing::info!("Data saved to {}", xlsx_path.display());

    Ok(ExportPaths {
        csv: Some(csv_path),
        xlsx: Some(xlsx_path),
    })
}

/// Builds a timestamped export path under the configured output directory
fn export_path(output: &OutputConfig, timestamp: &str, extension: &str) -> PathBuf {
    Path::new(&output.directory).join(format!("{}_{}.{}", output.file_stem, timestamp, extension))
}

/// Column set for an export: the keys of the first item, in response order
pub(crate) fn column_set(items: &[Item]) -> Vec<String> {
    items
        .first()
        .map(|item| item.keys().cloned().collect())
        .unwrap_or_default()
}

/// Renders a scalar cell the way it appears in a flat file
///
/// Strings pass through unquoted, null becomes an empty field, and other
/// scalars use their JSON text.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parses the portal's date-time strings
///
/// Accepts RFC 3339 and a handful of bare ISO shapes; anything else is
/// `None`, which exports render as a blank cell.
pub(crate) fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }

    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(datetime.naive_local());
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime);
        }
    }

    chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
