pub mod csv_writer;
pub mod parquet_writer;

pub use csv_writer::{format_value, CsvWriter};
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};

use crate::error::Result;
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write through a temp file in the destination directory, renamed into place on success
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    write(temp.as_file_mut())?;
    temp.as_file_mut().sync_all()?;
    temp.persist(path)?;

    Ok(())
}
