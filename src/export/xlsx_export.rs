//! XLSX export collaborator
//!
//! Writes the same collection as the CSV export, with two extras: the
//! portal's date fields become real date-time cells, and columns are
//! auto-sized to their content.

use crate::export::{column_set, parse_datetime, value_to_string, ExportResult, Exporter};
use crate::state::Item;
use rust_xlsxwriter::{Format, Workbook};
use serde_json::Value;
use std::path::Path;

/// Columns coerced to date-time cells when their text parses
const DATE_COLUMNS: [&str; 2] = ["publishDate", "endDate"];

/// Widest a column may auto-size to, in character widths
const MAX_COLUMN_WIDTH: f64 = 50.0;

/// Writes the collection as a single-sheet workbook
pub struct XlsxExporter;

impl Exporter for XlsxExporter {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn export(&self, items: &[Item], path: &Path) -> ExportResult<()> {
        let columns = column_set(items);
        let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("ETender Data")?;

        let mut widths: Vec<usize> = columns.iter().map(|column| column.len()).collect();

        for (col, column) in columns.iter().enumerate() {
            worksheet.write_string(0, col as u16, column.as_str())?;
        }

        for (row, item) in items.iter().enumerate() {
            let row = row as u32 + 1;

            for (col, column) in columns.iter().enumerate() {
                let text = item.get(column).map(value_to_string).unwrap_or_default();
                if text.len() > widths[col] {
                    widths[col] = text.len();
                }

                if DATE_COLUMNS.contains(&column.as_str()) {
                    // Unparsable dates become blank cells, not errors
                    if let Some(datetime) = parse_datetime(&text) {
                        worksheet.write_datetime_with_format(
                            row,
                            col as u16,
                            &datetime,
                            &date_format,
                        )?;
                    }
                    continue;
                }

                match item.get(column) {
                    None | Some(Value::Null) => {}
                    Some(Value::Number(number)) => {
                        if let Some(value) = number.as_f64() {
                            worksheet.write_number(row, col as u16, value)?;
                        } else {
                            worksheet.write_string(row, col as u16, text.as_str())?;
                        }
                    }
                    Some(Value::Bool(value)) => {
                        worksheet.write_boolean(row, col as u16, *value)?;
                    }
                    Some(_) => {
                        worksheet.write_string(row, col as u16, text.as_str())?;
                    }
                }
            }
        }

        for (col, longest) in widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, column_width(*longest))?;
        }

        workbook.save(path)?;
        Ok(())
    }
}

/// Longest cell text plus two characters of padding, capped
fn column_width(longest: usize) -> f64 {
    ((longest + 2) as f64).min(MAX_COLUMN_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_width_pads_and_caps() {
        assert_eq!(column_width(8), 10.0);
        assert_eq!(column_width(47), 49.0);
        assert_eq!(column_width(48), 50.0);
        assert_eq!(column_width(300), 50.0);
    }

    #[test]
    fn test_export_writes_a_workbook() {
        let mut item = Item::new();
        item.insert("eventId".to_string(), json!(7));
        item.insert("eventName".to_string(), json!("Printer toner"));
        item.insert("publishDate".to_string(), json!("2025-09-01T09:00:00"));
        item.insert("endDate".to_string(), json!("not a date"));
        item.insert("isCanceled".to_string(), json!(false));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        XlsxExporter.export(&[item], &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
