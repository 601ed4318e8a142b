use crate::cli::args::{Cli, Commands};
use crate::config::MapperConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{GridMetadata, Thresholds};
use crate::processors::{GridSummarizer, GridSummary, MapPipeline, ProcessedDay};
use crate::utils::filename::default_output_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvWriter, MapRenderer, ParquetWriter};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use validator::Validate;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = MapperConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            input_file,
            output_file,
            thresholds,
            reference_level,
            no_patch,
            width,
            height,
        } => {
            let mut config = config;
            if let Some(width) = width {
                config.image_width = width;
            }
            if let Some(height) = height {
                config.image_height = height;
            }
            if no_patch {
                config.patch_holes = false;
            }
            if let Some(values) = thresholds {
                config.thresholds = values;
                config.reference_level = None;
            }
            if reference_level.is_some() {
                config.reference_level = reference_level;
            }
            config.validate()?;

            println!("Rendering ozone map...");
            println!("Input file: {}", input_file.display());

            let (day, output) = tokio::task::spawn_blocking(move || -> Result<(ProcessedDay, PathBuf)> {
                let progress = ProgressReporter::new_spinner("Reading ozone data...", false);
                let renderer = MapRenderer::new(config.image_width, config.image_height);
                let pipeline = MapPipeline::new(config);

                let day = pipeline.process_file(&input_file, Some(&progress))?;
                let output = output_file.unwrap_or_else(|| {
                    default_output_filename(&input_file, &day.parsed.metadata.day_label, "png")
                });

                progress.set_message("Rendering map...");
                create_parent_dir(&output)?;
                renderer.render_to_file(&day.parsed.metadata, &day.colored, &output)?;
                progress.finish_with_message(&format!("Rendered {} cells", day.colored.len()));

                Ok((day, output))
            })
            .await??;

            println!("Thresholds: {}", format_thresholds(&day.thresholds));
            println!("\n{}", GridSummarizer::new().generate_summary(&day.summary));
            println!("Map written to {}", output.display());
        }

        Commands::Inspect {
            input_file,
            json,
            sample,
        } => {
            let pipeline = MapPipeline::new(config);
            let day = tokio::task::spawn_blocking(move || pipeline.process_file(&input_file, None))
                .await??;

            if json {
                let report = InspectReport {
                    metadata: &day.parsed.metadata,
                    thresholds: day.thresholds.as_array(),
                    summary: &day.summary,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            print_metadata(&day.parsed.metadata);
            println!("Thresholds: {}", format_thresholds(&day.thresholds));
            println!("\n{}", GridSummarizer::new().generate_summary(&day.summary));

            if sample > 0 {
                print_samples(&day, sample);
            }
        }

        Commands::Export {
            input_file,
            output_file,
            format,
            compression,
        } => {
            let pipeline = MapPipeline::new(config);
            let output = tokio::task::spawn_blocking(move || -> Result<PathBuf> {
                let progress = ProgressReporter::new_spinner("Reading ozone data...", false);
                let day = pipeline.process_file(&input_file, Some(&progress))?;
                let metadata = &day.parsed.metadata;

                let output = output_file.unwrap_or_else(|| {
                    default_output_filename(&input_file, &metadata.day_label, &format)
                });
                create_parent_dir(&output)?;

                progress.set_message(&format!("Writing {} rows...", day.colored.len()));
                match format.as_str() {
                    "csv" => CsvWriter::new().write_grid(metadata, &day.colored, &output)?,
                    "parquet" => {
                        let writer = ParquetWriter::new().with_compression(&compression)?;
                        writer.write_grid(metadata, &day.colored, &output)?;
                        progress.println(&writer.get_file_info(&output)?.summary());
                    }
                    other => {
                        return Err(ProcessingError::Config(format!(
                            "Unsupported export format: {}",
                            other
                        )))
                    }
                }
                progress.finish_with_message("Export complete");

                Ok(output)
            })
            .await??;

            println!("Table written to {}", output.display());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct InspectReport<'a> {
    metadata: &'a GridMetadata,
    thresholds: [f64; 5],
    summary: &'a GridSummary,
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    // Keep an already installed subscriber
    if let Err(e) = result {
        tracing::debug!("logging already initialized: {}", e);
    }
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn format_thresholds(thresholds: &Thresholds) -> String {
    thresholds
        .as_array()
        .iter()
        .map(|t| format!("{}", t))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_metadata(metadata: &GridMetadata) {
    println!("Day: {}", metadata.day_label.trim());
    println!(
        "Longitudes: {} bins from {} to {} ({} degree steps)",
        metadata.long_bins, metadata.long_start, metadata.long_stop, metadata.long_step
    );
    println!(
        "Latitudes: {} bins from {} to {} ({} degree steps)",
        metadata.lat_bins, metadata.lat_start, metadata.lat_stop, metadata.lat_step
    );
}

fn print_samples(day: &ProcessedDay, limit: usize) {
    println!("Sample Cells (showing {} cells):", limit.min(day.colored.len()));
    for (i, sample) in day.colored.iter().take(limit).enumerate() {
        println!(
            "{}. lat={:.2}, lon={:.2}: {} DU -> {}",
            i + 1,
            sample.latitude,
            sample.longitude,
            sample.label.as_deref().unwrap_or("-"),
            sample.color.as_deref().unwrap_or("-")
        );
    }
}
