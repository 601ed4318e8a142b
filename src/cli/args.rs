use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ozone-mapper")]
#[command(about = "Render daily OMI total-ozone grids as colored maps")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one daily dump to a PNG map
    Render {
        #[arg(short, long, help = "Input OMI text dump")]
        input_file: PathBuf,

        #[arg(
            short,
            long,
            help = "Output PNG path [default: {YYYYMMDD}.png]"
        )]
        output_file: Option<PathBuf>,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Five ascending gradient thresholds, e.g. 100,225,350,476,600"
        )]
        thresholds: Option<Vec<f64>>,

        #[arg(
            long,
            conflicts_with = "thresholds",
            help = "Derive thresholds from this safe level and the day's maximum",
            long_help = "Derive thresholds from this safe level and the day's maximum.\n\
                         Fails with an invalid-thresholds error when the day's maximum \
                         does not exceed the safe level."
        )]
        reference_level: Option<f64>,

        #[arg(long, help = "Leave zero readings unpatched")]
        no_patch: bool,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,
    },

    /// Show header, data-quality summary and sample colors of a daily dump
    Inspect {
        #[arg(short, long, help = "Input OMI text dump")]
        input_file: PathBuf,

        #[arg(long, help = "Print the summary as JSON")]
        json: bool,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },

    /// Export colored samples as a table
    Export {
        #[arg(short, long, help = "Input OMI text dump")]
        input_file: PathBuf,

        #[arg(
            short,
            long,
            help = "Output table path [default: {YYYYMMDD}.parquet or .csv]"
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, default_value = "parquet", value_parser = ["parquet", "csv"])]
        format: String,

        #[arg(short, long, default_value = "snappy")]
        compression: String,
    },
}
