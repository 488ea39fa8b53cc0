use crate::error::{CleaningError, Result};
use crate::models::{Column, ObservationTable};
use crate::utils::constants::{DEFAULT_TIMESTAMP_COLUMN, OUTPUT_TIMESTAMP_FORMAT};
use crate::writers::write_atomically;
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Row-oriented CSV export of a cleaned table, timestamp first
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write to `path`; nothing is left behind if writing fails
    pub fn write_table(&self, table: &ObservationTable, path: &Path) -> Result<()> {
        write_atomically(path, |file| self.write_to(table, file))?;
        info!(path = %path.display(), rows = table.len(), "Wrote CSV output");
        Ok(())
    }

    pub fn write_to<W: Write>(&self, table: &ObservationTable, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        let mut header = vec![DEFAULT_TIMESTAMP_COLUMN];
        header.extend(table.column_names());
        writer.write_record(&header)?;

        let mut row = Vec::with_capacity(table.columns.len() + 1);
        for (i, ts) in table.index.iter().enumerate() {
            row.clear();
            row.push(ts.format(OUTPUT_TIMESTAMP_FORMAT).to_string());
            row.extend(table.columns.iter().map(|c| format_value(c.values[i])));
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Re-import a file produced by `write_table`
    pub fn read_table(&self, path: &Path) -> Result<ObservationTable> {
        let mut content = String::new();
        File::open(path)?.read_to_string(&mut content)?;
        self.read_str(&content)
    }

    pub fn read_str(&self, content: &str) -> Result<ObservationTable> {
        let mut reader = csv::Reader::from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.get(0) != Some(DEFAULT_TIMESTAMP_COLUMN) {
            return Err(CleaningError::Load(format!(
                "Expected leading '{}' column",
                DEFAULT_TIMESTAMP_COLUMN
            )));
        }

        let mut columns: Vec<Column> = headers
            .iter()
            .skip(1)
            .map(|name| Column::new(name, Vec::new()))
            .collect();
        let mut index = Vec::new();

        for record_result in reader.records() {
            let record = record_result?;
            let raw_ts = record.get(0).unwrap_or_default();
            let ts = NaiveDateTime::parse_from_str(raw_ts, OUTPUT_TIMESTAMP_FORMAT).map_err(|e| {
                CleaningError::Load(format!("Invalid timestamp '{}': {}", raw_ts, e))
            })?;
            index.push(ts);

            for (column, cell) in columns.iter_mut().zip(record.iter().skip(1)) {
                column.values.push(parse_value(&column.name, ts, cell)?);
            }
        }

        ObservationTable::new(index, columns)
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Shortest representation that reads back to the same `f32`; missing is blank
pub fn format_value(value: Option<f32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_value(field: &str, timestamp: NaiveDateTime, cell: &str) -> Result<Option<f32>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f32>()
        .map(Some)
        .map_err(|_| CleaningError::Parse {
            field: field.to_string(),
            timestamp,
            value: cell.to_string(),
        })
}
