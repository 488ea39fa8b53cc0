use crate::utils::constants::DEFAULT_ROW_GROUP_SIZE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lcd-cleaner")]
#[command(about = "Clean NOAA LCD hourly observations into a regular numeric time series")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full cleaning pipeline and export the hourly table
    Clean {
        #[arg(short, long, help = "Input LCD CSV file")]
        input: PathBuf,

        #[arg(
            short,
            long = "output",
            help = "Output file path [default: output/lcd-clean-{YYMMDD}.{format}]"
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, default_value = "csv", help = "Output format: csv or parquet")]
        format: String,

        #[arg(short, long, default_value = "snappy", help = "Parquet compression")]
        compression: String,

        #[arg(long, default_value_t = DEFAULT_ROW_GROUP_SIZE, help = "Parquet row group size")]
        row_group_size: usize,

        #[arg(long, help = "Pipeline configuration file (TOML)")]
        config: Option<PathBuf>,

        #[arg(long, default_value = "false")]
        validate_only: bool,
    },

    /// Load, sanitize and range-check an LCD file without writing output
    Validate {
        #[arg(short, long, help = "Input LCD CSV file")]
        input: PathBuf,

        #[arg(long, help = "Pipeline configuration file (TOML)")]
        config: Option<PathBuf>,

        #[arg(long, help = "Print the validation report as JSON")]
        json: bool,
    },

    /// Display statistics for a cleaned CSV or Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
