use crate::models::{ParsedGrid, Thresholds};
use crate::processors::color_mapper::{patch_holes, Band};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct GridSummary {
    pub day_label: String,
    pub total_cells: usize,
    pub missing_cells: usize,
    pub negative_cells: usize,
    pub patched_cells: usize,
    pub max_score: i32,
    pub min_score: i32,
    pub mean_valid_score: Option<f64>,
    pub band_counts: BTreeMap<Band, usize>,
}

impl GridSummary {
    pub fn missing_percentage(&self) -> f64 {
        percentage(self.missing_cells, self.total_cells)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

/// Collects data-quality counts for a parsed day.
pub struct GridSummarizer {
    patch_holes: bool,
}

impl GridSummarizer {
    pub fn new() -> Self {
        Self { patch_holes: true }
    }

    pub fn with_patch_holes(patch_holes: bool) -> Self {
        Self { patch_holes }
    }

    pub fn summarize(&self, parsed: &ParsedGrid, thresholds: &Thresholds) -> GridSummary {
        let samples = &parsed.grid.samples;
        let last = samples.len().saturating_sub(1);

        let missing_cells = samples.iter().filter(|s| s.is_missing()).count();
        let negative_cells = samples.iter().filter(|s| s.score < 0).count();
        let patched_cells = if self.patch_holes {
            samples
                .iter()
                .enumerate()
                .filter(|(i, s)| s.is_missing() && *i > 0 && *i < last)
                .count()
        } else {
            0
        };

        let valid: Vec<i32> = samples.iter().map(|s| s.score).filter(|&s| s > 0).collect();
        let mean_valid_score = if valid.is_empty() {
            None
        } else {
            Some(valid.iter().map(|&s| s as f64).sum::<f64>() / valid.len() as f64)
        };

        let inputs: Vec<f64> = if self.patch_holes {
            patch_holes(samples)
        } else {
            samples.iter().map(|s| s.score as f64).collect()
        };
        let mut band_counts: BTreeMap<Band, usize> =
            Band::ALL.iter().map(|band| (*band, 0)).collect();
        for input in inputs {
            *band_counts
                .entry(Band::classify(input, thresholds))
                .or_default() += 1;
        }

        GridSummary {
            day_label: parsed.metadata.day_label.clone(),
            total_cells: samples.len(),
            missing_cells,
            negative_cells,
            patched_cells,
            max_score: parsed.max_score,
            min_score: parsed.min_score,
            mean_valid_score,
            band_counts,
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, summary: &GridSummary) -> String {
        let mut report = String::new();

        report.push_str(&format!("=== Ozone Grid Summary: {} ===\n", summary.day_label.trim()));
        report.push_str(&format!("Total Cells: {}\n", summary.total_cells));
        report.push_str(&format!(
            "Missing Cells: {} ({:.1}%)\n",
            summary.missing_cells,
            summary.missing_percentage()
        ));
        report.push_str(&format!("Patched Cells: {}\n", summary.patched_cells));
        report.push_str(&format!("Negative Cells: {}\n", summary.negative_cells));
        report.push_str(&format!(
            "Score Range: {} to {} DU\n",
            summary.min_score, summary.max_score
        ));
        match summary.mean_valid_score {
            Some(mean) => report.push_str(&format!("Mean Valid Score: {:.1} DU\n", mean)),
            None => report.push_str("Mean Valid Score: n/a\n"),
        }

        report.push_str("\nColor Bands:\n");
        for (band, count) in &summary.band_counts {
            report.push_str(&format!(
                "  {:<13} {:>7} ({:.1}%)\n",
                band.name(),
                count,
                percentage(*count, summary.total_cells)
            ));
        }

        report
    }
}

impl Default for GridSummarizer {
    fn default() -> Self {
        Self::new()
    }
}
