use crate::error::Result;
use crate::models::{Column, ObservationTable};
use crate::processors::range_validator::check_ordering;
use chrono::{Duration, NaiveDateTime, Timelike};
use tracing::info;

/// Regularizes an ordered table onto an hourly grid.
///
/// The last observation in each hour wins; each bucket is then reported one
/// hour late, so the row at `H` carries what was measured during `H-1`.
pub struct HourlyResampler {
    bucket: Duration,
}

impl HourlyResampler {
    pub fn new() -> Self {
        Self {
            bucket: Duration::hours(1),
        }
    }

    /// Fails with an ordering error unless the index is strictly increasing
    pub fn resample(&self, table: ObservationTable) -> Result<ObservationTable> {
        check_ordering(&table.index)?;

        let (Some(&first), Some(&last)) = (table.index.first(), table.index.last()) else {
            return Ok(ObservationTable {
                index: Vec::new(),
                columns: table
                    .columns
                    .into_iter()
                    .map(|c| Column::new(&c.name, Vec::new()))
                    .collect(),
            });
        };

        let first_bucket = floor_to_hour(first);
        let bucket_count = ((floor_to_hour(last) - first_bucket).num_seconds()
            / self.bucket.num_seconds()) as usize
            + 1;

        // Row feeding each bucket; later rows overwrite earlier ones
        let mut winners: Vec<Option<usize>> = vec![None; bucket_count];
        for (row, ts) in table.index.iter().enumerate() {
            let bucket = ((floor_to_hour(*ts) - first_bucket).num_seconds()
                / self.bucket.num_seconds()) as usize;
            winners[bucket] = Some(row);
        }

        let columns = table
            .columns
            .iter()
            .map(|column| {
                let values = winners
                    .iter()
                    .map(|winner| winner.and_then(|row| column.values[row]))
                    .collect();
                Column::new(&column.name, values)
            })
            .collect();

        // Shift by one bucket: bucket H is reported at H+1
        let index = (1..=bucket_count as i32)
            .map(|offset| first_bucket + self.bucket * offset)
            .collect();

        let empty_buckets = winners.iter().filter(|w| w.is_none()).count();
        info!(
            input_rows = table.index.len(),
            hours = bucket_count,
            empty_buckets,
            "Resampled observations to hourly grid"
        );

        ObservationTable::new(index, columns)
    }
}

impl Default for HourlyResampler {
    fn default() -> Self {
        Self::new()
    }
}

pub fn floor_to_hour(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date()
        .and_hms_opt(ts.hour(), 0, 0)
        .unwrap_or(ts)
}
