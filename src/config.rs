use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::Result;
use crate::models::FieldCatalog;
use crate::utils::constants::*;

/// Runtime knobs for the cleaning pipeline.
///
/// Layered as: built-in defaults, then an optional TOML file, then
/// `LCD_CLEAN_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    #[validate(length(min = 1))]
    pub timestamp_column: String,

    #[validate(length(min = 1))]
    pub timestamp_formats: Vec<String>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub visibility_max: f32,

    /// Overwrite negative visibility with missing, not only values above the maximum
    pub enforce_visibility_lower_bound: bool,

    /// Emit missing instead of 0.0 on all three tendency indicators when the source is missing
    pub missing_tendency_as_missing: bool,

    pub use_mmap: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
            timestamp_formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            visibility_max: MAX_VISIBILITY,
            enforce_visibility_lower_bound: true,
            missing_tendency_as_missing: false,
            use_mmap: false,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("timestamp_formats"),
            )
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.validate()?;
        tracing::debug!(?config, "Loaded pipeline configuration");

        Ok(config)
    }

    /// The LCD field catalog adjusted to this configuration
    pub fn catalog(&self) -> FieldCatalog {
        let mut catalog = FieldCatalog::lcd_hourly();
        catalog.timestamp_column = self.timestamp_column.clone();

        if let Some(visibility) = catalog.field_mut(FIELD_VISIBILITY) {
            if let Some(range) = visibility.range.as_mut() {
                range.max = self.visibility_max;
            }
        }

        catalog
    }
}
