//! CSV export for normalized records.

use crate::normalize::Record;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Writes one combination's records to a CSV file in the output directory.
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    /// Create the exporter, making sure the output directory exists.
    pub fn new(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir).with_context(|| {
            format!(
                "failed to create output directory {}",
                output_dir.display()
            )
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Write records to `file_name`, overwriting any previous file.
    ///
    /// Columns are the union of all record keys in first-seen order; rows
    /// keep entity order. Returns the written path.
    pub fn write(&self, records: &[Record], file_name: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        let columns = column_union(records);

        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        writer.write_record(&columns)?;
        for record in records {
            let row: Vec<String> = columns
                .iter()
                .map(|column| cell(record.get(column)))
                .collect();
            writer.write_record(&row)?;
        }
        writer
            .flush()
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Union of all record keys, in first-seen order.
fn column_union(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.iter().any(|column| column == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Strings go out bare; other scalars as their JSON text; null and absent
/// keys as empty cells.
fn cell(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().expect("record literal").clone()
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path()).unwrap();

        let records = vec![
            record(json!({"id": "h1", "winrate": 0.5})),
            record(json!({"id": "h2", "winrate": 0.6})),
        ];
        let path = exporter.write(&records, "rates.csv").unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["id,winrate", "h1,0.5", "h2,0.6"]);
    }

    #[test]
    fn test_columns_are_first_seen_union() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path()).unwrap();

        let records = vec![
            record(json!({"id": "h1", "winrate": 0.5})),
            record(json!({"id": "h2", "pickrate": 1.2})),
        ];
        let path = exporter.write(&records, "rates.csv").unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "id,winrate,pickrate");
        // Missing keys become empty cells.
        assert_eq!(lines[1], "h1,0.5,");
        assert_eq!(lines[2], "h2,,1.2");
    }

    #[test]
    fn test_null_renders_as_empty_cell() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path()).unwrap();

        let records = vec![record(json!({"id": "h1", "note": null, "live": true}))];
        let path = exporter.write(&records, "rates.csv").unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[1], "h1,,true");
    }

    #[test]
    fn test_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path()).unwrap();

        exporter
            .write(&[record(json!({"id": "old"}))], "rates.csv")
            .unwrap();
        let path = exporter
            .write(&[record(json!({"id": "new"}))], "rates.csv")
            .unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("new"));
        assert!(!contents.contains("old"));
    }

    #[test]
    fn test_creates_nested_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let exporter = CsvExporter::new(&nested).unwrap();
        let path = exporter
            .write(&[record(json!({"id": "h1"}))], "rates.csv")
            .unwrap();
        assert!(path.exists());
    }
}
