use crate::error::{CleaningError, Result};
use crate::models::{RawColumn, RawTable};
use crate::utils::constants::{
    DEFAULT_BUFFER_SIZE, DEFAULT_TIMESTAMP_COLUMN, DEFAULT_TIMESTAMP_FORMATS,
};
use chrono::NaiveDateTime;
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads an LCD export: parses the timestamp column, leaves every other cell raw
pub struct LcdReader {
    timestamp_column: String,
    timestamp_formats: Vec<String>,
    use_mmap: bool,
}

impl LcdReader {
    pub fn new() -> Self {
        Self {
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
            timestamp_formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            use_mmap: false,
        }
    }

    pub fn with_timestamp_column(mut self, column: &str) -> Self {
        self.timestamp_column = column.to_string();
        self
    }

    pub fn with_timestamp_formats(mut self, formats: Vec<String>) -> Self {
        self.timestamp_formats = formats;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read an LCD file from disk
    pub fn read_table(&self, path: &Path) -> Result<RawTable> {
        let bytes = if self.use_mmap {
            self.read_bytes_mmap(path)?
        } else {
            self.read_bytes_buffered(path)?
        };

        let text = decode(&bytes);
        let table = self.read_str(&text)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            columns = table.columns.len(),
            "Loaded raw observations"
        );

        Ok(table)
    }

    /// Parse LCD text already held in memory
    pub fn read_str(&self, content: &str) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| CleaningError::Load(format!("Unreadable header row: {}", e)))?
            .clone();

        let timestamp_idx = headers
            .iter()
            .position(|h| h.trim() == self.timestamp_column)
            .ok_or_else(|| {
                CleaningError::Load(format!(
                    "Timestamp column '{}' not found in header",
                    self.timestamp_column
                ))
            })?;

        let mut columns: Vec<RawColumn> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != timestamp_idx)
            .map(|(_, name)| RawColumn {
                name: name.trim().to_string(),
                values: Vec::new(),
            })
            .collect();
        let mut timestamps = Vec::new();

        for (row, record_result) in reader.records().enumerate() {
            // Header is line 1
            let line = row + 2;
            let record = record_result.map_err(|e| {
                CleaningError::Load(format!("Malformed row at line {}: {}", line, e))
            })?;

            let raw_timestamp = record.get(timestamp_idx).unwrap_or_default();
            timestamps.push(self.parse_timestamp(raw_timestamp, line)?);

            let cells = record
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != timestamp_idx)
                .map(|(_, cell)| cell);
            for (column, cell) in columns.iter_mut().zip(cells) {
                column.values.push(Some(cell.to_string()));
            }
        }

        debug!(rows = timestamps.len(), "Parsed LCD records");
        RawTable::new(timestamps, columns)
    }

    fn parse_timestamp(&self, raw: &str, line: usize) -> Result<NaiveDateTime> {
        let raw = raw.trim();
        self.timestamp_formats
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .ok_or_else(|| {
                CleaningError::Load(format!(
                    "Unparseable timestamp '{}' at line {}",
                    raw, line
                ))
            })
    }

    fn read_bytes_buffered(&self, path: &Path) -> Result<Vec<u8>> {
        let file = open(path)?;
        let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| CleaningError::Load(format!("Cannot read {}: {}", path.display(), e)))?;
        Ok(bytes)
    }

    /// Memory-mapped read for large exports
    fn read_bytes_mmap(&self, path: &Path) -> Result<Vec<u8>> {
        let file = open(path)?;
        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|e| CleaningError::Load(format!("Cannot map {}: {}", path.display(), e)))?;
        Ok(mmap.to_vec())
    }
}

impl Default for LcdReader {
    fn default() -> Self {
        Self::new()
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|e| CleaningError::Load(format!("Cannot open {}: {}", path.display(), e)))
}

/// LCD exports are usually UTF-8; older station files are Windows-1252
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            warn!("Input is not valid UTF-8, decoding as Windows-1252");
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
STATION,DATE,HOURLYVISIBILITY,HOURLYPrecip
WBAN:94789,2010-01-01 01:51,6.00,T
WBAN:94789,2010-01-01 02:51,*,0.01s
";

    #[test]
    fn test_read_str_parses_timestamps_and_keeps_raw_cells() -> Result<()> {
        let table = LcdReader::new().read_str(SAMPLE)?;

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.timestamps[0],
            NaiveDate::from_ymd_opt(2010, 1, 1)
                .unwrap()
                .and_hms_opt(1, 51, 0)
                .unwrap()
        );
        assert_eq!(table.column_names(), vec!["STATION", "HOURLYVISIBILITY", "HOURLYPrecip"]);

        let precip = table.column("HOURLYPrecip").unwrap();
        assert_eq!(precip.values[0].as_deref(), Some("T"));
        assert_eq!(precip.values[1].as_deref(), Some("0.01s"));

        let visibility = table.column("HOURLYVISIBILITY").unwrap();
        assert_eq!(visibility.values[1].as_deref(), Some("*"));
        Ok(())
    }

    #[test]
    fn test_iso_timestamps_are_accepted() -> Result<()> {
        let content = "DATE,HOURLYVISIBILITY\n2015-06-01T13:00:00,10.00\n";
        let table = LcdReader::new().read_str(content)?;
        assert_eq!(
            table.timestamps[0],
            NaiveDate::from_ymd_opt(2015, 6, 1)
                .unwrap()
                .and_hms_opt(13, 0, 0)
                .unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_missing_timestamp_column_is_load_error() {
        let content = "WHEN,HOURLYVISIBILITY\n2010-01-01 01:51,6.00\n";
        let result = LcdReader::new().read_str(content);
        assert!(matches!(result, Err(CleaningError::Load(_))));
    }

    #[test]
    fn test_unparseable_timestamp_is_load_error() {
        let content = "DATE,HOURLYVISIBILITY\n2010-01-01 01:51,6.00\nyesterday,5.00\n";
        match LcdReader::new().read_str(content) {
            Err(CleaningError::Load(message)) => assert!(message.contains("line 3")),
            other => panic!("expected load error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_file_buffered_and_mmap() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", SAMPLE)?;

        let buffered = LcdReader::new().read_table(temp_file.path())?;
        let mapped = LcdReader::new().with_mmap(true).read_table(temp_file.path())?;

        assert_eq!(buffered, mapped);
        assert_eq!(buffered.len(), 2);
        Ok(())
    }

    #[test]
    fn test_windows_1252_input_is_decoded() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(b"DATE,STATION_NAME\n2010-01-01 01:51,S\xe3O PAULO\n")?;

        let table = LcdReader::new().read_table(temp_file.path())?;
        let name = table.column("STATION_NAME").unwrap();
        assert_eq!(name.values[0].as_deref(), Some("SãO PAULO"));
        Ok(())
    }

    #[test]
    fn test_unreadable_source_is_load_error() {
        let result = LcdReader::new().read_table(Path::new("/nonexistent/lcd.csv"));
        assert!(matches!(result, Err(CleaningError::Load(_))));
    }
}
