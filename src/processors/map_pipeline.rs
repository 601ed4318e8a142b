use crate::config::MapperConfig;
use crate::error::Result;
use crate::models::{Grid, ParsedGrid, Thresholds};
use crate::processors::{ColorMapper, GridSummarizer, GridSummary};
use crate::readers::OzoneGridReader;
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use tracing::info;

/// A parsed and colored day, ready for rendering or export.
#[derive(Debug, Clone)]
pub struct ProcessedDay {
    pub parsed: ParsedGrid,
    pub colored: Grid,
    pub thresholds: Thresholds,
    pub summary: GridSummary,
}

/// Parse → threshold resolution → coloring → summary for one daily file.
pub struct MapPipeline {
    config: MapperConfig,
}

impl MapPipeline {
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    pub fn with_patch_holes(mut self, patch_holes: bool) -> Self {
        self.config.patch_holes = patch_holes;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.config.thresholds = thresholds;
        self.config.reference_level = None;
        self
    }

    pub fn with_reference_level(mut self, reference_level: Option<f64>) -> Self {
        self.config.reference_level = reference_level;
        self
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Read one daily dump from disk and color it
    pub fn process_file(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<ProcessedDay> {
        if let Some(p) = progress {
            p.set_message(&format!("Parsing {}...", path.display()));
        }

        let reader = OzoneGridReader::with_mmap(self.config.use_mmap);
        let parsed = reader.read_file(path)?;

        self.process_parsed(parsed, progress)
    }

    /// Color an already parsed grid
    pub fn process_parsed(
        &self,
        parsed: ParsedGrid,
        progress: Option<&ProgressReporter>,
    ) -> Result<ProcessedDay> {
        let thresholds = self.config.resolve_thresholds(parsed.max_score)?;

        if let Some(p) = progress {
            p.set_message("Coloring grid...");
        }

        let mapper = ColorMapper::new(thresholds).with_patch_holes(self.config.patch_holes);
        let colored = mapper.colorize(&parsed.grid);

        let summary = GridSummarizer::with_patch_holes(self.config.patch_holes)
            .summarize(&parsed, &thresholds);

        info!(
            day = %parsed.metadata.day_label.trim(),
            cells = summary.total_cells,
            missing = summary.missing_cells,
            max = parsed.max_score,
            "processed ozone grid"
        );

        Ok(ProcessedDay {
            parsed,
            colored,
            thresholds,
            summary,
        })
    }
}

impl Default for MapPipeline {
    fn default() -> Self {
        Self::new(MapperConfig::default())
    }
}
