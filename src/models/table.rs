use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{CleaningError, Result};

/// A raw column: cells exactly as read, `None` where the source had no value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,
    pub values: Vec<Option<String>>,
}

/// Loader output: parsed timestamps plus unparsed field columns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawTable {
    pub timestamps: Vec<NaiveDateTime>,
    pub columns: Vec<RawColumn>,
}

impl RawTable {
    pub fn new(timestamps: Vec<NaiveDateTime>, columns: Vec<RawColumn>) -> Result<Self> {
        check_lengths(timestamps.len(), columns.iter().map(|c| (&c.name, c.values.len())))?;
        Ok(Self {
            timestamps,
            columns,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// A numeric column; `None` is the missing-value marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f32>>,
}

impl Column {
    pub fn new(name: &str, values: Vec<Option<f32>>) -> Self {
        Self {
            name: name.to_string(),
            values,
        }
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// Timestamp-indexed table of numeric fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservationTable {
    pub index: Vec<NaiveDateTime>,
    pub columns: Vec<Column>,
}

impl ObservationTable {
    pub fn new(index: Vec<NaiveDateTime>, columns: Vec<Column>) -> Result<Self> {
        check_lengths(index.len(), columns.iter().map(|c| (&c.name, c.values.len())))?;
        Ok(Self { index, columns })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Remove a column, returning it if present
    pub fn take_column(&mut self, name: &str) -> Option<Column> {
        let position = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(position))
    }

    pub fn push_column(&mut self, column: Column) -> Result<()> {
        check_lengths(self.index.len(), [(&column.name, column.values.len())])?;
        self.columns.push(column);
        Ok(())
    }

    /// Value of `field` at row `row`, `None` when missing or absent
    pub fn value(&self, field: &str, row: usize) -> Option<f32> {
        self.column(field)
            .and_then(|c| c.values.get(row).copied())
            .flatten()
    }
}

fn check_lengths<'a, I>(expected: usize, columns: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a String, usize)>,
{
    for (name, len) in columns {
        if len != expected {
            return Err(CleaningError::Schema {
                field: name.clone(),
                reason: format!("has {} values but the index has {}", len, expected),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2010, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_table_rejects_ragged_columns() {
        let result = ObservationTable::new(
            vec![ts(0), ts(1)],
            vec![Column::new("a", vec![Some(1.0)])],
        );
        assert!(matches!(result, Err(CleaningError::Schema { .. })));
    }

    #[test]
    fn test_take_and_push_column() -> Result<()> {
        let mut table = ObservationTable::new(
            vec![ts(0), ts(1)],
            vec![
                Column::new("a", vec![Some(1.0), None]),
                Column::new("b", vec![Some(2.0), Some(3.0)]),
            ],
        )?;

        let a = table.take_column("a").unwrap();
        assert_eq!(a.missing_count(), 1);
        assert_eq!(table.column_names(), vec!["b"]);

        table.push_column(Column::new("c", vec![None, Some(4.0)]))?;
        assert_eq!(table.column_names(), vec!["b", "c"]);
        assert_eq!(table.value("c", 1), Some(4.0));
        assert_eq!(table.value("c", 0), None);
        assert!(table.push_column(Column::new("d", vec![None])).is_err());

        Ok(())
    }
}
