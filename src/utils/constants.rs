/// Timestamp column of an LCD export
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "DATE";

/// Timestamp layouts seen in LCD exports, tried in order
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Timestamp layout of the cleaned output
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// LCD hourly field names
pub const FIELD_VISIBILITY: &str = "HOURLYVISIBILITY";
pub const FIELD_DRY_BULB_TEMP: &str = "HOURLYDRYBULBTEMPF";
pub const FIELD_WET_BULB_TEMP: &str = "HOURLYWETBULBTEMPF";
pub const FIELD_DEW_POINT_TEMP: &str = "HOURLYDewPointTempF";
pub const FIELD_RELATIVE_HUMIDITY: &str = "HOURLYRelativeHumidity";
pub const FIELD_WIND_SPEED: &str = "HOURLYWindSpeed";
pub const FIELD_WIND_DIRECTION: &str = "HOURLYWindDirection";
pub const FIELD_STATION_PRESSURE: &str = "HOURLYStationPressure";
pub const FIELD_PRESSURE_TENDENCY: &str = "HOURLYPressureTendency";
pub const FIELD_SEA_LEVEL_PRESSURE: &str = "HOURLYSeaLevelPressure";
pub const FIELD_PRECIPITATION: &str = "HOURLYPrecip";
pub const FIELD_ALTIMETER_SETTING: &str = "HOURLYAltimeterSetting";

/// Sentinel and annotation tokens
pub const MISSING_SENTINEL: &str = "*";
pub const TRACE_PRECIPITATION: &str = "T";
pub const CORRUPTED_PRECIPITATION: &str = "0.020.01s"; // two readings run together

/// Valid ranges
pub const MIN_VISIBILITY: f32 = 0.0;
pub const MAX_VISIBILITY: f32 = 10.0;
pub const MIN_PRESSURE_TENDENCY: f32 = 0.0;
pub const MAX_PRESSURE_TENDENCY: f32 = 8.0;

/// Pressure tendency codes
pub const TENDENCY_INCREASING: [u8; 4] = [0, 1, 2, 3];
pub const TENDENCY_CONSTANT: u8 = 4;
pub const TENDENCY_DECREASING: [u8; 4] = [5, 6, 7, 8];

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const CONFIG_ENV_PREFIX: &str = "LCD_CLEAN";

/// Output format options
pub const FORMAT_CSV: &str = "csv";
pub const FORMAT_PARQUET: &str = "parquet";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
