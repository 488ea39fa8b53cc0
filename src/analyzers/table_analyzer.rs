use crate::error::{CleaningError, Result};
use crate::models::{Column, ObservationTable};
use crate::utils::constants::FORMAT_PARQUET;
use crate::writers::{CsvWriter, ParquetWriter};
use chrono::NaiveDateTime;
use std::path::Path;

#[derive(Debug)]
pub struct TableStatistics {
    pub total_records: usize,
    pub date_range: (NaiveDateTime, NaiveDateTime),
    pub complete_records: usize,
    pub columns: Vec<ColumnStatistics>,
}

#[derive(Debug)]
pub struct ColumnStatistics {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl ColumnStatistics {
    pub fn missing_percentage(&self) -> f64 {
        let total = self.count + self.missing;
        if total == 0 {
            return 0.0;
        }
        (self.missing as f64 / total as f64) * 100.0
    }
}

pub struct TableAnalyzer;

impl TableAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Load a cleaned export (CSV or Parquet, by extension)
    pub fn load(&self, path: &Path) -> Result<ObservationTable> {
        let is_parquet = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(FORMAT_PARQUET));

        if is_parquet {
            ParquetWriter::new().read_table(path)
        } else {
            CsvWriter::new().read_table(path)
        }
    }

    pub fn analyze(&self, table: &ObservationTable) -> Result<TableStatistics> {
        let (Some(&first), Some(&last)) = (table.index.first(), table.index.last()) else {
            return Err(CleaningError::Config("No records to analyze".to_string()));
        };

        let complete_records = (0..table.len())
            .filter(|&row| table.columns.iter().all(|c| c.values[row].is_some()))
            .count();

        Ok(TableStatistics {
            total_records: table.len(),
            date_range: (first, last),
            complete_records,
            columns: table.columns.iter().map(column_statistics).collect(),
        })
    }
}

impl Default for TableAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn column_statistics(column: &Column) -> ColumnStatistics {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0f64;
    let mut count = 0;

    for value in column.values.iter().flatten() {
        min = min.min(*value);
        max = max.max(*value);
        sum += *value as f64;
        count += 1;
    }

    // No observed values at all
    if count == 0 {
        min = f32::NAN;
        max = f32::NAN;
    }

    ColumnStatistics {
        name: column.name.clone(),
        count,
        missing: column.values.len() - count,
        min,
        max,
        mean: if count > 0 {
            (sum / count as f64) as f32
        } else {
            f32::NAN
        },
    }
}

impl TableStatistics {
    pub fn summary(&self) -> String {
        format!(
            "Fields: {}\n\
            Date Range: {} to {} ({} days)\n\
            Records: {} hourly rows\n\
            Complete rows: {}/{} ({:.1}%)",
            self.columns.len(),
            self.date_range.0,
            self.date_range.1,
            self.date_range
                .1
                .signed_duration_since(self.date_range.0)
                .num_days(),
            self.total_records,
            self.complete_records,
            self.total_records,
            (self.complete_records as f64 / self.total_records as f64) * 100.0
        )
    }

    pub fn detailed_summary(&self) -> String {
        let mut summary = self.summary();
        summary.push_str("\n\nPer-field Statistics:\n");
        summary.push_str(&format!(
            "  {:<26} {:>8} {:>8} {:>9} {:>10} {:>10} {:>10}\n",
            "field", "count", "missing", "missing%", "min", "max", "mean"
        ));

        for column in &self.columns {
            if column.count == 0 {
                summary.push_str(&format!(
                    "  {:<26} {:>8} {:>8} {:>8.1}% No valid measurements\n",
                    column.name,
                    column.count,
                    column.missing,
                    column.missing_percentage()
                ));
            } else {
                summary.push_str(&format!(
                    "  {:<26} {:>8} {:>8} {:>8.1}% {:>10.3} {:>10.3} {:>10.3}\n",
                    column.name,
                    column.count,
                    column.missing,
                    column.missing_percentage(),
                    column.min,
                    column.max,
                    column.mean
                ));
            }
        }

        summary
    }
}
