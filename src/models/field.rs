use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::constants::*;

/// Semantic type of a retained LCD field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Continuous,
    BoundedCategorical,
    Precipitation, // numeric with trace/snow annotations
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidRange {
    pub min: f32,
    pub max: f32,
}

impl ValidRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Imputation {
    Linear,
    ForwardFill,
    None,
}

/// A column produced by the feature encoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedField {
    pub name: String,
    pub public_name: String,
}

impl DerivedField {
    pub fn new(name: &str, public_name: &str) -> Self {
        Self {
            name: name.to_string(),
            public_name: public_name.to_string(),
        }
    }
}

/// How a field is expanded into model features
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    Passthrough,
    Cyclical {
        sin: DerivedField,
        cos: DerivedField,
    },
    Tendency {
        increasing: DerivedField,
        decreasing: DerivedField,
        constant: DerivedField,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub range: Option<ValidRange>,
    pub imputation: Imputation,
    pub encoding: Encoding,
    pub public_name: String,
}

impl FieldSpec {
    pub fn continuous(name: &str, public_name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Continuous,
            range: None,
            imputation: Imputation::Linear,
            encoding: Encoding::Passthrough,
            public_name: public_name.to_string(),
        }
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.range = Some(ValidRange::new(min, max));
        self
    }

    pub fn with_imputation(mut self, imputation: Imputation) -> Self {
        self.imputation = imputation;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn is_categorical(&self) -> bool {
        self.kind == FieldKind::BoundedCategorical
    }
}

/// Ordered whitelist of retained fields plus the timestamp column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub timestamp_column: String,
    pub fields: Vec<FieldSpec>,
}

impl FieldCatalog {
    pub fn new(timestamp_column: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            timestamp_column: timestamp_column.to_string(),
            fields,
        }
    }

    /// The twelve hourly fields of an LCD station export
    pub fn lcd_hourly() -> Self {
        let fields = vec![
            FieldSpec::continuous(FIELD_VISIBILITY, "visibility")
                .with_range(MIN_VISIBILITY, MAX_VISIBILITY),
            FieldSpec::continuous(FIELD_DRY_BULB_TEMP, "dry_bulb_temp_f"),
            FieldSpec::continuous(FIELD_WET_BULB_TEMP, "wet_bulb_temp_f"),
            FieldSpec::continuous(FIELD_DEW_POINT_TEMP, "dew_point_temp_f"),
            FieldSpec::continuous(FIELD_RELATIVE_HUMIDITY, "relative_humidity"),
            FieldSpec::continuous(FIELD_WIND_SPEED, "wind_speed"),
            FieldSpec::continuous(FIELD_WIND_DIRECTION, "wind_direction").with_encoding(
                Encoding::Cyclical {
                    sin: DerivedField::new("WindDirectionSin", "wind_direction_sin"),
                    cos: DerivedField::new("WindDirectionCos", "wind_direction_cos"),
                },
            ),
            FieldSpec::continuous(FIELD_STATION_PRESSURE, "station_pressure"),
            FieldSpec::continuous(FIELD_PRESSURE_TENDENCY, "pressure_tendency")
                .with_kind(FieldKind::BoundedCategorical)
                .with_range(MIN_PRESSURE_TENDENCY, MAX_PRESSURE_TENDENCY)
                .with_imputation(Imputation::ForwardFill)
                .with_encoding(Encoding::Tendency {
                    increasing: DerivedField::new("PressureTendencyIncr", "pressure_tendency_incr"),
                    decreasing: DerivedField::new("PressureTendencyDecr", "pressure_tendency_decr"),
                    constant: DerivedField::new("PressureTendencyConst", "pressure_tendency_const"),
                }),
            FieldSpec::continuous(FIELD_SEA_LEVEL_PRESSURE, "sea_level_pressure"),
            FieldSpec::continuous(FIELD_PRECIPITATION, "precip")
                .with_kind(FieldKind::Precipitation),
            FieldSpec::continuous(FIELD_ALTIMETER_SETTING, "altimeter_setting"),
        ];

        Self::new(DEFAULT_TIMESTAMP_COLUMN, fields)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldSpec> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Internal column name to public output name, for base and derived columns
    pub fn rename_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        for field in &self.fields {
            match &field.encoding {
                Encoding::Passthrough => {
                    map.insert(field.name.clone(), field.public_name.clone());
                }
                Encoding::Cyclical { sin, cos } => {
                    for derived in [sin, cos] {
                        map.insert(derived.name.clone(), derived.public_name.clone());
                    }
                }
                Encoding::Tendency {
                    increasing,
                    decreasing,
                    constant,
                } => {
                    for derived in [increasing, decreasing, constant] {
                        map.insert(derived.name.clone(), derived.public_name.clone());
                    }
                }
            }
        }

        map
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::lcd_hourly()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcd_catalog_shape() {
        let catalog = FieldCatalog::lcd_hourly();

        assert_eq!(catalog.timestamp_column, "DATE");
        assert_eq!(catalog.fields.len(), 12);

        let tendency = catalog.field(FIELD_PRESSURE_TENDENCY).unwrap();
        assert!(tendency.is_categorical());
        assert_eq!(tendency.imputation, Imputation::ForwardFill);
        assert_eq!(tendency.range, Some(ValidRange::new(0.0, 8.0)));

        let precip = catalog.field(FIELD_PRECIPITATION).unwrap();
        assert_eq!(precip.kind, FieldKind::Precipitation);
    }

    #[test]
    fn test_rename_map_covers_encoded_columns() {
        let map = FieldCatalog::lcd_hourly().rename_map();

        // 10 passthrough fields + 2 cyclical + 3 tendency indicators
        assert_eq!(map.len(), 15);
        assert_eq!(map["HOURLYVISIBILITY"], "visibility");
        assert_eq!(map["WindDirectionSin"], "wind_direction_sin");
        assert_eq!(map["PressureTendencyConst"], "pressure_tendency_const");
        assert!(!map.contains_key(FIELD_WIND_DIRECTION));
        assert!(!map.contains_key(FIELD_PRESSURE_TENDENCY));
    }

    #[test]
    fn test_valid_range_is_inclusive() {
        let range = ValidRange::new(0.0, 10.0);
        assert!(range.contains(0.0));
        assert!(range.contains(10.0));
        assert!(!range.contains(10.5));
        assert!(!range.contains(-0.1));
    }
}
