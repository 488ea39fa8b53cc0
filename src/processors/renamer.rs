use crate::error::{CleaningError, Result};
use crate::models::{FieldCatalog, ObservationTable};
use std::collections::HashMap;
use tracing::debug;

/// Relabels internal column names through an explicit name-to-name map
pub struct ColumnRenamer {
    mapping: HashMap<String, String>,
}

impl ColumnRenamer {
    pub fn new(mapping: HashMap<String, String>) -> Self {
        Self { mapping }
    }

    pub fn from_catalog(catalog: &FieldCatalog) -> Self {
        Self::new(catalog.rename_map())
    }

    /// Every column must have a mapping; column order is preserved
    pub fn rename(&self, mut table: ObservationTable) -> Result<ObservationTable> {
        for column in table.columns.iter_mut() {
            let public_name = self
                .mapping
                .get(&column.name)
                .ok_or_else(|| CleaningError::Schema {
                    field: column.name.clone(),
                    reason: "has no output name".to_string(),
                })?;
            debug!(from = %column.name, to = %public_name, "Renamed column");
            column.name = public_name.clone();
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;
    use chrono::NaiveDate;

    fn table(names: &[&str]) -> ObservationTable {
        let ts = NaiveDate::from_ymd_opt(2010, 1, 1)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap();
        ObservationTable::new(
            vec![ts],
            names.iter().map(|n| Column::new(n, vec![Some(1.0)])).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_rename_is_independent_of_column_order() -> Result<()> {
        let renamer = ColumnRenamer::from_catalog(&FieldCatalog::lcd_hourly());

        let renamed = renamer.rename(table(&["WindDirectionCos", "HOURLYVISIBILITY"]))?;
        assert_eq!(renamed.column_names(), vec!["wind_direction_cos", "visibility"]);

        let renamed = renamer.rename(table(&["HOURLYVISIBILITY", "WindDirectionCos"]))?;
        assert_eq!(renamed.column_names(), vec!["visibility", "wind_direction_cos"]);
        Ok(())
    }

    #[test]
    fn test_unmapped_column_is_schema_error() {
        let renamer = ColumnRenamer::from_catalog(&FieldCatalog::lcd_hourly());
        let result = renamer.rename(table(&["HOURLYVISIBILITY", "HOURLYWindDirection"]));

        match result {
            Err(CleaningError::Schema { field, .. }) => assert_eq!(field, "HOURLYWindDirection"),
            other => panic!("expected schema error, got {:?}", other),
        }
    }
}
