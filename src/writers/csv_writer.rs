use crate::error::Result;
use crate::models::{Grid, GridMetadata};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct SampleRow<'a> {
    day: &'a str,
    latitude: f64,
    longitude: f64,
    score: i32,
    color: Option<&'a str>,
    label: Option<&'a str>,
}

/// Writes colored samples as CSV with the same columns as the Parquet export.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_grid(&self, metadata: &GridMetadata, grid: &Grid, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        for sample in grid {
            writer.serialize(SampleRow {
                day: &metadata.day_label,
                latitude: sample.latitude,
                longitude: sample.longitude,
                score: sample.score,
                color: sample.color.as_deref(),
                label: sample.label.as_deref(),
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
