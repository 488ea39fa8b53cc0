use crate::analyzers::TableAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::models::FieldCatalog;
use crate::processors::{CleaningPipeline, RangeValidator, ValidationReport};
use crate::utils::constants::{FORMAT_CSV, FORMAT_PARQUET};
use crate::utils::filename::generate_default_output_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::{format_value, CsvWriter, ParquetWriter};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber; `RUST_LOG` overrides the default level
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Clean {
            input,
            output_file,
            format,
            compression,
            row_group_size,
            config,
            validate_only,
        } => {
            let format = format.to_lowercase();
            if format != FORMAT_CSV && format != FORMAT_PARQUET {
                bail!("Unsupported output format: {}", format);
            }
            let output_file =
                output_file.unwrap_or_else(|| generate_default_output_filename(&format));

            println!("Cleaning LCD observations...");
            println!("Input file: {}", input.display());

            let config = PipelineConfig::load(config.as_deref())?;
            let pipeline = CleaningPipeline::new(config);

            if validate_only {
                let progress = ProgressReporter::new_spinner("Validating data...", false);
                let (_table, report) = pipeline
                    .validate_file(&input, Some(&progress))
                    .with_context(|| format!("Validating {} failed", input.display()))?;
                progress.finish_with_message("Validation complete");

                println!("\n{}", render_validation_report(pipeline.catalog(), &report, false)?);
                println!("Validation complete - no output file written");
                return Ok(());
            }

            println!("Output file: {}", output_file.display());
            let progress = ProgressReporter::new_spinner("Cleaning data...", false);
            let output = pipeline
                .process_file(&input, Some(&progress))
                .with_context(|| format!("Cleaning {} failed", input.display()))?;
            progress.finish_with_message(&format!("Cleaned {} hourly rows", output.table.len()));

            println!("\n{}", render_validation_report(pipeline.catalog(), &output.report, false)?);

            if output.table.is_empty() {
                println!("No observations in input - writing header only");
            }

            println!("Writing {} rows as {}...", output.table.len(), format);
            if format == FORMAT_PARQUET {
                let writer = ParquetWriter::new()
                    .with_compression(&compression)?
                    .with_row_group_size(row_group_size);
                writer.write_table(&output.table, &output_file)?;
                let file_info = writer.get_file_info(&output_file)?;
                println!("\n{}", file_info.summary());
            } else {
                CsvWriter::new().write_table(&output.table, &output_file)?;
            }

            info!(output = %output_file.display(), "Cleaning complete");
            println!("Processing complete!");
        }

        Commands::Validate {
            input,
            config,
            json,
        } => {
            if !json {
                println!("Validating LCD observations...");
                println!("Input file: {}", input.display());
            }

            let config = PipelineConfig::load(config.as_deref())?;
            let pipeline = CleaningPipeline::new(config);
            let progress = ProgressReporter::new_spinner("Validating data...", json);

            let (_table, report) = pipeline
                .validate_file(&input, Some(&progress))
                .with_context(|| format!("Validating {} failed", input.display()))?;

            progress.finish_with_message("Validation complete");

            println!("{}", render_validation_report(pipeline.catalog(), &report, json)?);
        }

        Commands::Info { file, sample } => {
            println!("Analyzing cleaned file: {}", file.display());

            let analyzer = TableAnalyzer::new();
            let table = analyzer.load(&file)?;
            let stats = analyzer.analyze(&table)?;

            println!("\n{}", stats.detailed_summary());

            if sample > 0 {
                println!("\nSample Records (showing {} records):", sample.min(table.len()));
                println!("DATE,{}", table.column_names().join(","));
                for (row, ts) in table.index.iter().enumerate().take(sample) {
                    let values: Vec<String> = table
                        .columns
                        .iter()
                        .map(|c| format_value(c.values[row]))
                        .collect();
                    println!("{},{}", ts, values.join(","));
                }
            }
        }
    }

    Ok(())
}

/// Text summary with a verdict line, or the report as pretty JSON
pub fn render_validation_report(
    catalog: &FieldCatalog,
    report: &ValidationReport,
    json: bool,
) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let validator = RangeValidator::new(catalog.clone());
    let mut rendered = validator.generate_summary(report);
    if report.is_clean() {
        rendered.push_str("✅ All data passed validation checks");
    } else {
        rendered.push_str(&format!("⚠️  Found {} validation issues", report.warnings.len()));
    }
    Ok(rendered)
}
