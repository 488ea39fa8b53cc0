use crate::error::{CleaningError, Result};
use crate::models::{FieldCatalog, RawColumn, RawTable};
use crate::utils::constants::MISSING_SENTINEL;
use tracing::info;

/// Projects a raw table onto the catalog's field whitelist
pub struct ColumnSelector {
    fields: Vec<String>,
}

impl ColumnSelector {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn from_catalog(catalog: &FieldCatalog) -> Self {
        Self::new(catalog.field_names().into_iter().map(String::from).collect())
    }

    /// Keep only the whitelisted fields, in whitelist order, with `*` and blanks as missing
    pub fn select(&self, raw: RawTable) -> Result<RawTable> {
        let RawTable {
            timestamps,
            mut columns,
        } = raw;

        let mut selected = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let position = columns
                .iter()
                .position(|c| &c.name == field)
                .ok_or_else(|| CleaningError::missing_field(field))?;
            let column = columns.swap_remove(position);

            selected.push(RawColumn {
                name: column.name,
                values: column.values.into_iter().map(normalize_cell).collect(),
            });
        }

        info!(
            fields = selected.len(),
            dropped = columns.len(),
            "Selected LCD fields"
        );
        RawTable::new(timestamps, selected)
    }
}

fn normalize_cell(cell: Option<String>) -> Option<String> {
    cell.filter(|value| {
        let value = value.trim();
        !value.is_empty() && value != MISSING_SENTINEL
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw_table() -> RawTable {
        let ts = NaiveDate::from_ymd_opt(2010, 1, 1)
            .unwrap()
            .and_hms_opt(1, 51, 0)
            .unwrap();
        let column = |name: &str, value: &str| RawColumn {
            name: name.to_string(),
            values: vec![Some(value.to_string())],
        };

        RawTable::new(
            vec![ts],
            vec![
                column("STATION", "WBAN:94789"),
                column("B", " * "),
                column("A", "6.00"),
                column("C", ""),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_select_projects_in_whitelist_order() -> Result<()> {
        let selector = ColumnSelector::new(vec!["A".into(), "B".into(), "C".into()]);
        let table = selector.select(raw_table())?;

        assert_eq!(table.column_names(), vec!["A", "B", "C"]);
        assert_eq!(table.column("A").unwrap().values[0].as_deref(), Some("6.00"));
        Ok(())
    }

    #[test]
    fn test_sentinel_and_blank_become_missing() -> Result<()> {
        let selector = ColumnSelector::new(vec!["B".into(), "C".into()]);
        let table = selector.select(raw_table())?;

        assert_eq!(table.column("B").unwrap().values[0], None);
        assert_eq!(table.column("C").unwrap().values[0], None);
        Ok(())
    }

    #[test]
    fn test_absent_field_is_schema_error() {
        let selector = ColumnSelector::new(vec!["A".into(), "HOURLYPrecip".into()]);
        match selector.select(raw_table()) {
            Err(CleaningError::Schema { field, .. }) => assert_eq!(field, "HOURLYPrecip"),
            other => panic!("expected schema error, got {:?}", other),
        }
    }
}
