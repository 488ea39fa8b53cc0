use crate::error::Result;
use crate::models::{Column, DerivedField, Encoding, FieldCatalog, ObservationTable};
use crate::utils::constants::{TENDENCY_CONSTANT, TENDENCY_DECREASING, TENDENCY_INCREASING};
use std::f32::consts::PI;
use tracing::info;

/// Expands cyclical and categorical fields into numeric features
pub struct FeatureEncoder {
    catalog: FieldCatalog,
    missing_tendency_as_missing: bool,
}

impl FeatureEncoder {
    pub fn new(catalog: FieldCatalog) -> Self {
        Self {
            catalog,
            missing_tendency_as_missing: false,
        }
    }

    /// Propagate a missing tendency to all three indicators instead of 0.0
    pub fn with_missing_tendency_as_missing(mut self, enabled: bool) -> Self {
        self.missing_tendency_as_missing = enabled;
        self
    }

    pub fn encode(&self, mut table: ObservationTable) -> Result<ObservationTable> {
        let mut derived = Vec::new();

        for spec in &self.catalog.fields {
            match &spec.encoding {
                Encoding::Passthrough => {}
                Encoding::Cyclical { sin, cos } => {
                    let Some(source) = table.take_column(&spec.name) else {
                        continue;
                    };
                    derived.extend(encode_cyclical(&source, sin, cos));
                }
                Encoding::Tendency {
                    increasing,
                    decreasing,
                    constant,
                } => {
                    let Some(source) = table.take_column(&spec.name) else {
                        continue;
                    };
                    derived.extend(self.encode_tendency(&source, increasing, decreasing, constant));
                }
            }
        }

        info!(derived = derived.len(), "Encoded derived features");
        for column in derived {
            table.push_column(column)?;
        }

        Ok(table)
    }

    fn encode_tendency(
        &self,
        source: &Column,
        increasing: &DerivedField,
        decreasing: &DerivedField,
        constant: &DerivedField,
    ) -> [Column; 3] {
        let indicator = |matches: &dyn Fn(u8) -> bool| -> Vec<Option<f32>> {
            source
                .values
                .iter()
                .map(|value| match value {
                    Some(v) => Some(tendency_flag(*v, matches)),
                    None if self.missing_tendency_as_missing => None,
                    None => Some(0.0),
                })
                .collect()
        };

        let increasing_values = indicator(&|code: u8| TENDENCY_INCREASING.contains(&code));
        let decreasing_values = indicator(&|code: u8| TENDENCY_DECREASING.contains(&code));
        let constant_values = indicator(&|code: u8| code == TENDENCY_CONSTANT);

        [
            Column::new(&increasing.name, increasing_values),
            Column::new(&decreasing.name, decreasing_values),
            Column::new(&constant.name, constant_values),
        ]
    }
}

/// Sine and cosine of a direction in degrees
pub fn encode_cyclical(source: &Column, sin: &DerivedField, cos: &DerivedField) -> [Column; 2] {
    let radians: Vec<Option<f32>> = source
        .values
        .iter()
        .map(|value| value.map(|degrees| degrees * 2.0 * PI / 360.0))
        .collect();

    [
        Column::new(&sin.name, radians.iter().map(|r| r.map(f32::sin)).collect()),
        Column::new(&cos.name, radians.iter().map(|r| r.map(f32::cos)).collect()),
    ]
}

// Non-integer codes never match any class
fn tendency_flag(value: f32, matches: &dyn Fn(u8) -> bool) -> f32 {
    let is_code = value.fract() == 0.0 && (0.0..=255.0).contains(&value);
    if is_code && matches(value as u8) {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::{FIELD_PRESSURE_TENDENCY, FIELD_WIND_DIRECTION};
    use chrono::{NaiveDate, NaiveDateTime};

    fn hours(n: u32) -> Vec<NaiveDateTime> {
        (0..n)
            .map(|h| {
                NaiveDate::from_ymd_opt(2010, 1, 1)
                    .unwrap()
                    .and_hms_opt(h, 0, 0)
                    .unwrap()
            })
            .collect()
    }

    fn encode(direction: Vec<Option<f32>>, tendency: Vec<Option<f32>>) -> ObservationTable {
        let table = ObservationTable::new(
            hours(direction.len() as u32),
            vec![
                Column::new("HOURLYWindSpeed", vec![Some(5.0); direction.len()]),
                Column::new(FIELD_WIND_DIRECTION, direction),
                Column::new(FIELD_PRESSURE_TENDENCY, tendency),
            ],
        )
        .unwrap();

        FeatureEncoder::new(FieldCatalog::lcd_hourly())
            .encode(table)
            .unwrap()
    }

    #[test]
    fn test_encoded_columns_replace_sources() {
        let table = encode(vec![Some(90.0)], vec![Some(4.0)]);
        assert_eq!(
            table.column_names(),
            vec![
                "HOURLYWindSpeed",
                "WindDirectionSin",
                "WindDirectionCos",
                "PressureTendencyIncr",
                "PressureTendencyDecr",
                "PressureTendencyConst",
            ]
        );
    }

    #[test]
    fn test_direction_components_lie_on_unit_circle() {
        let directions = vec![Some(0.0), Some(45.0), Some(90.0), Some(200.0), Some(360.0), None];
        let table = encode(directions, vec![None; 6]);

        for row in 0..5 {
            let sin = table.value("WindDirectionSin", row).unwrap();
            let cos = table.value("WindDirectionCos", row).unwrap();
            assert!((sin * sin + cos * cos - 1.0).abs() < 1e-6);
        }

        assert!((table.value("WindDirectionSin", 2).unwrap() - 1.0).abs() < 1e-6);
        assert!(table.value("WindDirectionCos", 2).unwrap().abs() < 1e-6);
        assert_eq!(table.value("WindDirectionSin", 5), None);
        assert_eq!(table.value("WindDirectionCos", 5), None);
    }

    #[test]
    fn test_tendency_indicators_are_mutually_exclusive() {
        let codes: Vec<Option<f32>> = (0..=8).map(|c| Some(c as f32)).chain([None]).collect();
        let table = encode(vec![None; codes.len()], codes);

        for row in 0..10 {
            let incr = table.value("PressureTendencyIncr", row).unwrap();
            let decr = table.value("PressureTendencyDecr", row).unwrap();
            let constant = table.value("PressureTendencyConst", row).unwrap();
            assert!(incr + decr + constant <= 1.0);

            match row {
                0..=3 => assert_eq!((incr, decr, constant), (1.0, 0.0, 0.0)),
                4 => assert_eq!((incr, decr, constant), (0.0, 0.0, 1.0)),
                5..=8 => assert_eq!((incr, decr, constant), (0.0, 1.0, 0.0)),
                _ => assert_eq!((incr, decr, constant), (0.0, 0.0, 0.0)),
            }
        }
    }

    #[test]
    fn test_missing_tendency_can_propagate() {
        let table = ObservationTable::new(
            hours(2),
            vec![Column::new(FIELD_PRESSURE_TENDENCY, vec![None, Some(6.0)])],
        )
        .unwrap();

        let encoded = FeatureEncoder::new(FieldCatalog::lcd_hourly())
            .with_missing_tendency_as_missing(true)
            .encode(table)
            .unwrap();

        assert_eq!(encoded.value("PressureTendencyIncr", 0), None);
        assert_eq!(encoded.value("PressureTendencyDecr", 0), None);
        assert_eq!(encoded.value("PressureTendencyConst", 0), None);
        assert_eq!(encoded.value("PressureTendencyDecr", 1), Some(1.0));
    }
}
