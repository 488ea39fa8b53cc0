use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{FieldCatalog, ObservationTable, RawTable};
use crate::processors::{
    ColumnRenamer, ColumnSelector, FeatureEncoder, HourlyResampler, Imputer, RangeValidator,
    ValidationReport, ValueSanitizer,
};
use crate::readers::LcdReader;
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use tracing::info;

/// Result of a full cleaning run
#[derive(Debug, Clone)]
pub struct CleaningOutput {
    pub table: ObservationTable,
    pub report: ValidationReport,
}

/// Loader through exporter as one table -> table composition
pub struct CleaningPipeline {
    config: PipelineConfig,
    catalog: FieldCatalog,
}

impl CleaningPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let catalog = config.catalog();
        Self { config, catalog }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn reader(&self) -> LcdReader {
        LcdReader::new()
            .with_timestamp_column(&self.config.timestamp_column)
            .with_timestamp_formats(self.config.timestamp_formats.clone())
            .with_mmap(self.config.use_mmap)
    }

    /// Read and clean an LCD file
    pub fn process_file(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<CleaningOutput> {
        if let Some(p) = progress {
            p.set_message("Reading LCD observations...");
        }
        let raw = self.reader().read_table(path)?;
        self.clean(raw, progress)
    }

    /// Stages 2-4 only: select, sanitize and validate without resampling
    pub fn validate_file(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<(ObservationTable, ValidationReport)> {
        if let Some(p) = progress {
            p.set_message("Reading LCD observations...");
        }
        let raw = self.reader().read_table(path)?;
        self.validate(raw, progress)
    }

    pub fn validate(
        &self,
        raw: RawTable,
        progress: Option<&ProgressReporter>,
    ) -> Result<(ObservationTable, ValidationReport)> {
        if let Some(p) = progress {
            p.set_message("Selecting and sanitizing fields...");
        }
        let selected = ColumnSelector::from_catalog(&self.catalog).select(raw)?;
        let sanitized = ValueSanitizer::new(self.catalog.clone()).sanitize(selected)?;

        if let Some(p) = progress {
            p.set_message("Validating ranges...");
        }
        RangeValidator::new(self.catalog.clone())
            .with_lower_bound_enforcement(self.config.enforce_visibility_lower_bound)
            .validate(sanitized)
    }

    /// Clean an already loaded raw table
    pub fn clean(
        &self,
        raw: RawTable,
        progress: Option<&ProgressReporter>,
    ) -> Result<CleaningOutput> {
        let (validated, report) = self.validate(raw, progress)?;

        if let Some(p) = progress {
            p.set_message("Resampling to hourly grid...");
        }
        let resampled = HourlyResampler::new().resample(validated)?;
        let imputed = Imputer::new(self.catalog.clone()).impute(resampled);

        if let Some(p) = progress {
            p.set_message("Encoding features...");
        }
        let encoded = FeatureEncoder::new(self.catalog.clone())
            .with_missing_tendency_as_missing(self.config.missing_tendency_as_missing)
            .encode(imputed)?;
        let table = ColumnRenamer::from_catalog(&self.catalog).rename(encoded)?;

        info!(
            hours = table.len(),
            columns = table.columns.len(),
            warnings = report.warnings.len(),
            "Cleaning pipeline complete"
        );

        Ok(CleaningOutput { table, report })
    }
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
