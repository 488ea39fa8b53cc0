use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default output filename with format: lcd-clean-{YYMMDD}.{extension}
pub fn generate_default_output_filename(extension: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!("lcd-clean-{:02}{:02}{:02}.{}", year, month, day, extension);
    PathBuf::from("output").join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_output_filename() {
        let filename = generate_default_output_filename("csv");
        let filename_str = filename.to_string_lossy();

        assert!(filename_str.contains("lcd-clean-"));
        assert!(filename_str.ends_with(".csv"));
        assert!(filename_str.starts_with("output/"));

        let parts: Vec<&str> = filename_str.split('/').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "output");

        // "lcd-clean-" + YYMMDD + ".csv"
        assert_eq!(parts[1].len(), 10 + 6 + 4);
    }

    #[test]
    fn test_parquet_extension() {
        let filename = generate_default_output_filename("parquet");
        assert!(filename.to_string_lossy().ends_with(".parquet"));
    }
}
