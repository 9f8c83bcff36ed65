//! CSV export collaborator

use crate::export::{column_set, value_to_string, ExportResult, Exporter};
use crate::state::Item;
use std::path::Path;

/// Writes the collection as a flat CSV file, one row per item
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn export(&self, items: &[Item], path: &Path) -> ExportResult<()> {
        let columns = column_set(items);

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&columns)?;

        for item in items {
            let record: Vec<String> = columns
                .iter()
                .map(|column| item.get(column).map(value_to_string).unwrap_or_default())
                .collect();
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}
