use crate::error::{CleaningError, Result};
use crate::models::{Column, FieldCatalog, FieldKind, ObservationTable, RawTable};
use crate::utils::constants::{CORRUPTED_PRECIPITATION, TRACE_PRECIPITATION};
use chrono::NaiveDateTime;
use tracing::{debug, info};

/// Converts every raw field to `f32`, stripping LCD annotation noise
pub struct ValueSanitizer {
    catalog: FieldCatalog,
}

impl ValueSanitizer {
    pub fn new(catalog: FieldCatalog) -> Self {
        Self { catalog }
    }

    pub fn sanitize(&self, raw: RawTable) -> Result<ObservationTable> {
        let RawTable {
            timestamps,
            columns,
        } = raw;

        let mut sanitized = Vec::with_capacity(columns.len());
        for column in columns {
            let kind = self
                .catalog
                .field(&column.name)
                .map(|f| f.kind)
                .unwrap_or(FieldKind::Continuous);

            let values = column
                .values
                .iter()
                .zip(&timestamps)
                .map(|(cell, ts)| match cell {
                    Some(raw_value) => parse_cell(&column.name, kind, raw_value, *ts),
                    None => Ok(None),
                })
                .collect::<Result<Vec<_>>>()?;

            let column = Column::new(&column.name, values);
            debug!(
                field = %column.name,
                missing = column.missing_count(),
                "Sanitized field"
            );
            sanitized.push(column);
        }

        info!(rows = timestamps.len(), "Coerced LCD fields to numeric");
        ObservationTable::new(timestamps, sanitized)
    }
}

/// Parse one raw cell according to its field kind
pub fn parse_cell(
    field: &str,
    kind: FieldKind,
    raw: &str,
    timestamp: NaiveDateTime,
) -> Result<Option<f32>> {
    let trimmed = raw.trim();

    if kind == FieldKind::Precipitation {
        if trimmed == TRACE_PRECIPITATION {
            return Ok(Some(0.0));
        }
        if trimmed == CORRUPTED_PRECIPITATION {
            return Ok(None);
        }
    }

    let stripped = strip_annotations(trimmed);
    if stripped.is_empty() {
        return Ok(None);
    }

    stripped
        .parse::<f32>()
        .map(Some)
        .map_err(|_| CleaningError::Parse {
            field: field.to_string(),
            timestamp,
            value: raw.to_string(),
        })
}

/// Keep digits, commas, periods and minus signs; drop everything else
pub fn strip_annotations(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect()
}
