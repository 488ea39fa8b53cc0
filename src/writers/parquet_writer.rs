use crate::error::{CleaningError, Result};
use crate::models::{Column, ObservationTable};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE, DEFAULT_TIMESTAMP_COLUMN,
};
use crate::writers::write_atomically;
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(CleaningError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write the cleaned table; the file only appears once fully written
    pub fn write_table(&self, table: &ObservationTable, path: &Path) -> Result<()> {
        let schema = self.create_schema(table);
        let batch = self.table_to_batch(table, schema.clone())?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        write_atomically(path, |file| {
            let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
            writer.write(&batch)?;
            writer.close()?;
            Ok(())
        })?;

        info!(path = %path.display(), rows = table.len(), "Wrote Parquet output");
        Ok(())
    }

    fn create_schema(&self, table: &ObservationTable) -> Arc<Schema> {
        let mut fields = vec![Field::new(
            DEFAULT_TIMESTAMP_COLUMN,
            DataType::Timestamp(TimeUnit::Second, None),
            false,
        )];
        fields.extend(
            table
                .columns
                .iter()
                .map(|c| Field::new(c.name.as_str(), DataType::Float32, true)),
        );

        Arc::new(Schema::new(fields))
    }

    fn table_to_batch(&self, table: &ObservationTable, schema: Arc<Schema>) -> Result<RecordBatch> {
        let seconds: Vec<i64> = table
            .index
            .iter()
            .map(|ts| ts.and_utc().timestamp())
            .collect();

        let mut arrays: Vec<ArrayRef> = vec![Arc::new(TimestampSecondArray::from(seconds))];
        arrays.extend(
            table
                .columns
                .iter()
                .map(|c| Arc::new(Float32Array::from(c.values.clone())) as ArrayRef),
        );

        Ok(RecordBatch::try_new(schema, arrays)?)
    }

    /// Re-import a table written by `write_table`
    pub fn read_table(&self, path: &Path) -> Result<ObservationTable> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut index: Vec<NaiveDateTime> = Vec::new();
        let mut columns: Vec<Column> = Vec::new();

        for batch_result in reader {
            let batch = batch_result?;

            if columns.is_empty() {
                columns = batch
                    .schema()
                    .fields()
                    .iter()
                    .skip(1)
                    .map(|f| Column::new(f.name(), Vec::new()))
                    .collect();
            }

            let timestamps = batch
                .column(0)
                .as_any()
                .downcast_ref::<TimestampSecondArray>()
                .ok_or_else(|| CleaningError::Config("Invalid DATE column type".to_string()))?;
            for i in 0..timestamps.len() {
                let ts = DateTime::from_timestamp(timestamps.value(i), 0).ok_or_else(|| {
                    CleaningError::Config("Invalid timestamp in Parquet file".to_string())
                })?;
                index.push(ts.naive_utc());
            }

            for (position, column) in columns.iter_mut().enumerate() {
                let values = batch
                    .column(position + 1)
                    .as_any()
                    .downcast_ref::<Float32Array>()
                    .ok_or_else(|| {
                        CleaningError::Config(format!("Invalid {} column type", column.name))
                    })?;
                column.values.extend(values.iter());
            }
        }

        ObservationTable::new(index, columns)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0, // Convert to MB
            self.compression,
        )
    }
}
