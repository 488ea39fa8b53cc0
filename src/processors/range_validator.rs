use crate::error::{OrderingViolation, Result};
use crate::models::{FieldCatalog, ObservationTable, ValidRange};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub total_records: usize,
    pub warnings: Vec<ValidationWarning>,
    /// Cells overwritten with missing, per field
    pub replaced_values: BTreeMap<String, usize>,
}

/// A range violation that is reported but left in place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationWarning {
    pub field: String,
    pub timestamp: NaiveDateTime,
    pub value: f32,
    pub violation_type: ViolationType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationType {
    OutOfRange,
    NonInteger,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn total_replaced(&self) -> usize {
        self.replaced_values.values().sum()
    }
}

pub struct RangeValidator {
    catalog: FieldCatalog,
    enforce_lower_bound: bool,
}

impl RangeValidator {
    pub fn new(catalog: FieldCatalog) -> Self {
        Self {
            catalog,
            enforce_lower_bound: true,
        }
    }

    pub fn with_lower_bound_enforcement(mut self, enforce_lower_bound: bool) -> Self {
        self.enforce_lower_bound = enforce_lower_bound;
        self
    }

    /// Enforce documented ranges and check the index can be bucketed
    pub fn validate(
        &self,
        mut table: ObservationTable,
    ) -> Result<(ObservationTable, ValidationReport)> {
        check_ordering(&table.index)?;

        let mut report = ValidationReport {
            total_records: table.len(),
            ..ValidationReport::default()
        };

        for spec in &self.catalog.fields {
            let Some(range) = spec.range else {
                continue;
            };
            let Some(column) = table.columns.iter_mut().find(|c| c.name == spec.name) else {
                continue;
            };

            if spec.is_categorical() {
                for (value, ts) in column.values.iter().zip(&table.index) {
                    let Some(v) = *value else {
                        continue;
                    };
                    if let Some(violation) = categorical_violation(v, range) {
                        let warning = ValidationWarning {
                            field: spec.name.clone(),
                            timestamp: *ts,
                            value: v,
                            violation_type: violation,
                        };
                        warn!(
                            field = %warning.field,
                            timestamp = %warning.timestamp,
                            value = warning.value,
                            "Categorical value outside its documented domain"
                        );
                        report.warnings.push(warning);
                    }
                }
            } else {
                let mut replaced = 0;
                for value in column.values.iter_mut() {
                    if let Some(v) = *value {
                        let too_low = self.enforce_lower_bound && v < range.min;
                        if v > range.max || too_low {
                            *value = None;
                            replaced += 1;
                        }
                    }
                }
                if replaced > 0 {
                    info!(
                        field = %spec.name,
                        replaced,
                        "Overwrote out-of-range values with missing"
                    );
                    report.replaced_values.insert(spec.name.clone(), replaced);
                }
            }
        }

        Ok((table, report))
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &ValidationReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Validation Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Out-of-range Values Replaced: {}\n",
            report.total_replaced()
        ));
        for (field, count) in &report.replaced_values {
            summary.push_str(&format!("  {}: {}\n", field, count));
        }
        summary.push_str(&format!(
            "\nCategorical Violations: {}\n",
            report.warnings.len()
        ));

        if !report.warnings.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, warning) in report.warnings.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {} at {}: {} ({:?})\n",
                    i + 1,
                    warning.field,
                    warning.timestamp,
                    warning.value,
                    warning.violation_type
                ));
            }
        }

        summary
    }
}

fn categorical_violation(value: f32, range: ValidRange) -> Option<ViolationType> {
    if !range.contains(value) {
        Some(ViolationType::OutOfRange)
    } else if value.fract() != 0.0 {
        Some(ViolationType::NonInteger)
    } else {
        None
    }
}

/// Resampling requires a strictly increasing index
pub fn check_ordering(index: &[NaiveDateTime]) -> std::result::Result<(), OrderingViolation> {
    for (row, pair) in index.windows(2).enumerate() {
        let (previous, current) = (pair[0], pair[1]);
        if current == previous {
            return Err(OrderingViolation::Duplicate {
                timestamp: current,
                row: row + 1,
            });
        }
        if current < previous {
            return Err(OrderingViolation::OutOfOrder {
                previous,
                current,
                row: row + 1,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleaningError;
    use crate::models::Column;
    use crate::utils::constants::{FIELD_PRESSURE_TENDENCY, FIELD_VISIBILITY};
    use chrono::NaiveDate;

    fn ts(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2010, 1, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn table(visibility: Vec<Option<f32>>, tendency: Vec<Option<f32>>) -> ObservationTable {
        let index = (0..visibility.len() as u32).map(|h| ts(h, 51)).collect();
        ObservationTable::new(
            index,
            vec![
                Column::new(FIELD_VISIBILITY, visibility),
                Column::new(FIELD_PRESSURE_TENDENCY, tendency),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_visibility_out_of_range_becomes_missing() -> Result<()> {
        let validator = RangeValidator::new(FieldCatalog::lcd_hourly());
        let input = table(
            vec![Some(10.0), Some(10.5), Some(-1.0), Some(0.0), None],
            vec![None; 5],
        );

        let (output, report) = validator.validate(input)?;
        assert_eq!(
            output.column(FIELD_VISIBILITY).unwrap().values,
            vec![Some(10.0), None, None, Some(0.0), None]
        );
        assert_eq!(report.replaced_values[FIELD_VISIBILITY], 2);
        assert!(report.is_clean());
        Ok(())
    }

    #[test]
    fn test_lower_bound_can_be_disabled() -> Result<()> {
        let validator =
            RangeValidator::new(FieldCatalog::lcd_hourly()).with_lower_bound_enforcement(false);
        let input = table(vec![Some(-1.0), Some(11.0)], vec![None; 2]);

        let (output, _) = validator.validate(input)?;
        assert_eq!(
            output.column(FIELD_VISIBILITY).unwrap().values,
            vec![Some(-1.0), None]
        );
        Ok(())
    }

    #[test]
    fn test_tendency_violations_are_reported_not_corrected() -> Result<()> {
        let validator = RangeValidator::new(FieldCatalog::lcd_hourly());
        let input = table(vec![None; 4], vec![Some(3.0), Some(9.0), Some(2.5), None]);

        let (output, report) = validator.validate(input)?;
        assert_eq!(
            output.column(FIELD_PRESSURE_TENDENCY).unwrap().values,
            vec![Some(3.0), Some(9.0), Some(2.5), None]
        );
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.warnings[0].violation_type, ViolationType::OutOfRange);
        assert_eq!(report.warnings[0].value, 9.0);
        assert_eq!(report.warnings[1].violation_type, ViolationType::NonInteger);

        let summary = validator.generate_summary(&report);
        assert!(summary.contains("Categorical Violations: 2"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["warnings"][0]["violation_type"], "OutOfRange");
        assert_eq!(json["warnings"][0]["timestamp"], "2010-01-01T01:51:00");
        Ok(())
    }

    #[test]
    fn test_duplicate_timestamps_are_fatal() {
        let validator = RangeValidator::new(FieldCatalog::lcd_hourly());
        let input = ObservationTable::new(
            vec![ts(1, 0), ts(1, 0)],
            vec![Column::new(FIELD_VISIBILITY, vec![Some(1.0), Some(2.0)])],
        )
        .unwrap();

        let result = validator.validate(input);
        assert!(matches!(
            result,
            Err(CleaningError::Ordering(OrderingViolation::Duplicate { row: 1, .. }))
        ));
    }

    #[test]
    fn test_out_of_order_timestamps_are_fatal() {
        let result = check_ordering(&[ts(1, 0), ts(3, 0), ts(2, 0)]);
        assert_eq!(
            result,
            Err(OrderingViolation::OutOfOrder {
                previous: ts(3, 0),
                current: ts(2, 0),
                row: 2,
            })
        );
        assert!(check_ordering(&[ts(1, 0), ts(1, 5)]).is_ok());
        assert!(check_ordering(&[]).is_ok());
    }
}
