use crate::models::{FieldCatalog, Imputation, ObservationTable};
use chrono::NaiveDateTime;
use tracing::{debug, info};

/// Fills gaps on the hourly grid according to each field's imputation policy
pub struct Imputer {
    catalog: FieldCatalog,
}

impl Imputer {
    pub fn new(catalog: FieldCatalog) -> Self {
        Self { catalog }
    }

    pub fn impute(&self, mut table: ObservationTable) -> ObservationTable {
        let mut filled_total = 0;

        for column in table.columns.iter_mut() {
            let policy = self
                .catalog
                .field(&column.name)
                .map(|f| f.imputation)
                .unwrap_or(Imputation::None);

            let before = column.missing_count();
            match policy {
                Imputation::ForwardFill => forward_fill(&mut column.values),
                Imputation::Linear => interpolate_linear(&table.index, &mut column.values),
                Imputation::None => {}
            }
            let filled = before - column.missing_count();
            filled_total += filled;

            debug!(field = %column.name, ?policy, filled, "Imputed field");
        }

        info!(filled = filled_total, "Filled missing values");
        table
    }
}

/// Carry the latest known value forward; leading gaps stay missing
pub fn forward_fill(values: &mut [Option<f32>]) {
    let mut last_known = None;
    for value in values.iter_mut() {
        match *value {
            Some(v) => last_known = Some(v),
            None => *value = last_known,
        }
    }
}

/// Time-weighted linear interpolation of interior gaps.
///
/// Gaps without a known value on both sides are left missing.
pub fn interpolate_linear(index: &[NaiveDateTime], values: &mut [Option<f32>]) {
    let mut previous: Option<usize> = None;

    for i in 0..values.len() {
        let Some(v1) = values[i] else {
            continue;
        };

        if let Some(p) = previous {
            if i > p + 1 {
                let v0 = values[p].unwrap_or(v1) as f64;
                let t0 = index[p];
                let span = (index[i] - t0).num_seconds() as f64;

                for m in (p + 1)..i {
                    let elapsed = (index[m] - t0).num_seconds() as f64;
                    let filled = v0 + (v1 as f64 - v0) * elapsed / span;
                    values[m] = Some(filled as f32);
                }
            }
        }

        previous = Some(i);
    }
}
