use chrono::NaiveDateTime;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CleaningError>;

#[derive(Error, Debug)]
pub enum CleaningError {
    #[error("Load error: {0}")]
    Load(String),

    #[error("Schema error: field '{field}' {reason}")]
    Schema { field: String, reason: String },

    #[error("Parse error: field '{field}' at {timestamp}: cannot parse '{value}' as a number")]
    Parse {
        field: String,
        timestamp: NaiveDateTime,
        value: String,
    },

    #[error("Ordering error: {0}")]
    Ordering(#[from] OrderingViolation),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] ::config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Could not persist output file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Timestamp index defects that make hourly bucketing undefined.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingViolation {
    #[error("duplicate timestamp {timestamp} at row {row}")]
    Duplicate { timestamp: NaiveDateTime, row: usize },

    #[error("timestamp {current} at row {row} precedes previous timestamp {previous}")]
    OutOfOrder {
        previous: NaiveDateTime,
        current: NaiveDateTime,
        row: usize,
    },
}

impl CleaningError {
    pub fn missing_field(field: &str) -> Self {
        CleaningError::Schema {
            field: field.to_string(),
            reason: "is not present in the input".to_string(),
        }
    }
}
