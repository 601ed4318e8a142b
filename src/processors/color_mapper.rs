//! Score → color mapping along a five-stop gradient.
//!
//! ```text
//!   <= 0      black   (no data / bad reading)
//!   <= t1     red
//!   t1..t2    red → yellow      (green rises)
//!   t2..t3    yellow → green    (red falls)
//!   t3..t4    green → cyan      (blue rises)
//!   t4..t5    cyan → blue       (green falls)
//!   >= t5     blue
//! ```
//!
//! The varying channel is written as two lowercase nibbles while fixed
//! channels stay uppercase, so `#FFc800` and not `#FFC800`. Rendered images
//! and exported tables depend on this exact text.

use crate::models::{Grid, Sample, Thresholds};
use crate::utils::constants::{COLOR_BLUE, COLOR_INVALID, COLOR_RED, PARALLEL_THRESHOLD};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gradient region a score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    Invalid,
    Red,
    RedYellow,
    YellowGreen,
    GreenCyan,
    CyanBlue,
    Blue,
}

impl Band {
    pub const ALL: [Band; 7] = [
        Band::Invalid,
        Band::Red,
        Band::RedYellow,
        Band::YellowGreen,
        Band::GreenCyan,
        Band::CyanBlue,
        Band::Blue,
    ];

    /// Classify a (possibly patched) score.
    ///
    /// Scores landing exactly on t2, t3 or t4 belong to the band above.
    pub fn classify(score: f64, thresholds: &Thresholds) -> Self {
        if score <= 0.0 {
            Band::Invalid
        } else if score <= thresholds.t1() {
            Band::Red
        } else if score < thresholds.t2() {
            Band::RedYellow
        } else if score < thresholds.t3() {
            Band::YellowGreen
        } else if score < thresholds.t4() {
            Band::GreenCyan
        } else if score < thresholds.t5() {
            Band::CyanBlue
        } else {
            Band::Blue
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Band::Invalid => "invalid",
            Band::Red => "red",
            Band::RedYellow => "red-yellow",
            Band::YellowGreen => "yellow-green",
            Band::GreenCyan => "green-cyan",
            Band::CyanBlue => "cyan-blue",
            Band::Blue => "blue",
        }
    }
}

/// Hex color for a score.
pub fn color_of(score: f64, thresholds: &Thresholds) -> String {
    match Band::classify(score, thresholds) {
        Band::Invalid => COLOR_INVALID.to_string(),
        Band::Red => COLOR_RED.to_string(),
        Band::RedYellow => {
            let green = rising(score, thresholds.t1(), thresholds.t2());
            format!("#FF{}00", nibbles(green))
        }
        Band::YellowGreen => {
            let red = falling(score, thresholds.t2(), thresholds.t3());
            format!("#{}FF00", nibbles(red))
        }
        Band::GreenCyan => {
            let blue = rising(score, thresholds.t3(), thresholds.t4());
            format!("#00FF{}", nibbles(blue))
        }
        Band::CyanBlue => {
            let green = falling(score, thresholds.t4(), thresholds.t5());
            format!("#00{}FF", nibbles(green))
        }
        Band::Blue => COLOR_BLUE.to_string(),
    }
}

fn rising(score: f64, start: f64, end: f64) -> f64 {
    255.0 * (score - start) / (end - start)
}

fn falling(score: f64, start: f64, end: f64) -> f64 {
    255.0 * (1.0 - (score - start) / (end - start))
}

/// Two hex digits, each holding only the low nibble of its part.
fn nibbles(value: f64) -> String {
    let v = value.floor() as i64;
    format!("{:x}{:x}", (v / 16).rem_euclid(16), v.rem_euclid(16))
}

/// Coloring input per sample.
///
/// A zero reading that is not the first or last sample is replaced by the
/// mean of its two raw neighbors, even when a neighbor is itself zero.
pub fn patch_holes(samples: &[Sample]) -> Vec<f64> {
    let last = samples.len().saturating_sub(1);

    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            if sample.score == 0 && i > 0 && i < last {
                (samples[i - 1].score as f64 + samples[i + 1].score as f64) / 2.0
            } else {
                sample.score as f64
            }
        })
        .collect()
}

/// Colors every sample of a grid.
pub struct ColorMapper {
    thresholds: Thresholds,
    patch_holes: bool,
}

impl ColorMapper {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            patch_holes: true,
        }
    }

    pub fn with_patch_holes(mut self, patch_holes: bool) -> Self {
        self.patch_holes = patch_holes;
        self
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Values fed to `color_of`, one per sample.
    pub fn coloring_inputs(&self, grid: &Grid) -> Vec<f64> {
        if self.patch_holes {
            patch_holes(&grid.samples)
        } else {
            grid.samples.iter().map(|s| s.score as f64).collect()
        }
    }

    /// Return a copy of the grid with `color` and `label` filled in.
    ///
    /// Labels always show the raw score, patched or not.
    pub fn colorize(&self, grid: &Grid) -> Grid {
        let inputs = self.coloring_inputs(grid);
        let paint = |(sample, input): (&Sample, &f64)| {
            sample
                .clone()
                .with_coloring(color_of(*input, &self.thresholds), sample.score.to_string())
        };

        let samples: Vec<Sample> = if grid.len() >= PARALLEL_THRESHOLD {
            grid.samples.par_iter().zip(inputs.par_iter()).map(paint).collect()
        } else {
            grid.samples.iter().zip(inputs.iter()).map(paint).collect()
        };

        debug!(samples = samples.len(), patch_holes = self.patch_holes, "colorized grid");
        Grid::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds::new(100.0, 225.0, 350.0, 476.0, 600.0).unwrap()
    }

    fn rgb(color: &str) -> (i32, i32, i32) {
        let channel = |range: std::ops::Range<usize>| {
            i32::from_str_radix(&color[range], 16).unwrap()
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }

    fn samples(scores: &[i32]) -> Vec<Sample> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &s)| Sample::new(0.0, i as f64, s))
            .collect()
    }

    #[test]
    fn test_sentinels() {
        let t = thresholds();
        assert_eq!(color_of(0.0, &t), "#000000");
        assert_eq!(color_of(-5.0, &t), "#000000");
        assert_eq!(color_of(100.0, &t), "#FF0000");
        assert_eq!(color_of(1.0, &t), "#FF0000");
        assert_eq!(color_of(600.0, &t), "#0000FF");
        assert_eq!(color_of(1600.0, &t), "#0000FF");
    }

    #[test]
    fn test_interpolated_regions() {
        let t = thresholds();
        // 255 * 100 / 125 = 204 -> "cc"
        assert_eq!(color_of(200.0, &t), "#FFcc00");
        // 255 * (1 - 35/125) = 183.6 -> 183 -> "b7"
        assert_eq!(color_of(260.0, &t), "#b7FF00");
        // 255 * 63/126 = 127.5 -> 127 -> "7f"
        assert_eq!(color_of(413.0, &t), "#00FF7f");
        // 255 * (1 - 62/124) = 127.5 -> 127 -> "7f"
        assert_eq!(color_of(538.0, &t), "#007fFF");
    }

    #[test]
    fn test_boundary_belongs_to_upper_band() {
        let t = thresholds();
        assert_eq!(color_of(225.0, &t), "#ffFF00");
        assert_eq!(color_of(350.0, &t), "#00FF00");
        assert_eq!(color_of(476.0, &t), "#00ffFF");
    }

    #[test]
    fn test_continuity_at_boundaries() {
        let t = thresholds();
        let eps = 1e-6;

        for boundary in t.as_array() {
            let below = rgb(&color_of(boundary - eps, &t));
            let at = rgb(&color_of(boundary, &t));
            let above = rgb(&color_of(boundary + eps, &t));

            for (a, b) in [(below, at), (at, above)] {
                assert!((a.0 - b.0).abs() <= 1, "{boundary}: {a:?} vs {b:?}");
                assert!((a.1 - b.1).abs() <= 1, "{boundary}: {a:?} vs {b:?}");
                assert!((a.2 - b.2).abs() <= 1, "{boundary}: {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_nibbles() {
        assert_eq!(nibbles(200.0), "c8");
        assert_eq!(nibbles(200.9), "c8");
        assert_eq!(nibbles(0.0), "00");
        assert_eq!(nibbles(255.0), "ff");
        assert_eq!(nibbles(256.0), "00");
        assert_eq!(nibbles(15.2), "0f");
    }

    #[test]
    fn test_classify() {
        let t = thresholds();
        assert_eq!(Band::classify(0.0, &t), Band::Invalid);
        assert_eq!(Band::classify(100.0, &t), Band::Red);
        assert_eq!(Band::classify(100.5, &t), Band::RedYellow);
        assert_eq!(Band::classify(225.0, &t), Band::YellowGreen);
        assert_eq!(Band::classify(599.9, &t), Band::CyanBlue);
        assert_eq!(Band::classify(600.0, &t), Band::Blue);
    }

    #[test]
    fn test_patch_interior_hole() {
        let patched = patch_holes(&samples(&[50, 0, 100]));
        assert_eq!(patched, vec![50.0, 75.0, 100.0]);
    }

    #[test]
    fn test_patch_never_touches_edges() {
        assert_eq!(patch_holes(&samples(&[0, 10, 20])), vec![0.0, 10.0, 20.0]);
        assert_eq!(patch_holes(&samples(&[10, 20, 0])), vec![10.0, 20.0, 0.0]);
        assert_eq!(patch_holes(&samples(&[0])), vec![0.0]);
        assert!(patch_holes(&[]).is_empty());
    }

    #[test]
    fn test_patch_uses_raw_neighbors() {
        // Neighbors are not patched first, zero neighbors still count
        let patched = patch_holes(&samples(&[300, 0, 0, 100]));
        assert_eq!(patched, vec![300.0, 150.0, 50.0, 100.0]);
    }

    #[test]
    fn test_colorize_two_by_two() {
        let grid = Grid::new(samples(&[0, 300, 300, 0]));
        let colored = ColorMapper::new(thresholds()).colorize(&grid);

        let colors: Vec<&str> = colored.iter().map(|s| s.color.as_deref().unwrap()).collect();
        assert_eq!(colors[0], "#000000");
        assert_eq!(colors[3], "#000000");
        // 255 * (1 - 75/125) = 102 -> "66"
        assert_eq!(colors[1], "#66FF00");
        assert_eq!(colors[2], "#66FF00");

        // the input grid is left untouched
        assert!(grid.iter().all(|s| s.color.is_none()));
    }

    #[test]
    fn test_colorize_labels_raw_scores() {
        let grid = Grid::new(samples(&[200, 0, 300]));
        let colored = ColorMapper::new(thresholds()).colorize(&grid);

        let middle = &colored.samples[1];
        assert_eq!(middle.score, 0);
        assert_eq!(middle.label.as_deref(), Some("0"));
        assert_eq!(middle.color.as_deref(), Some(color_of(250.0, &thresholds()).as_str()));
    }

    #[test]
    fn test_colorize_without_patching() {
        let grid = Grid::new(samples(&[200, 0, 300]));
        let colored = ColorMapper::new(thresholds())
            .with_patch_holes(false)
            .colorize(&grid);
        assert_eq!(colored.samples[1].color.as_deref(), Some("#000000"));
    }

    #[test]
    fn test_colorize_large_grid_keeps_order() {
        let scores: Vec<i32> = (0..PARALLEL_THRESHOLD as i32 + 10).map(|i| i % 700).collect();
        let grid = Grid::new(samples(&scores));
        let colored = ColorMapper::new(thresholds()).colorize(&grid);

        let inputs = patch_holes(&grid.samples);
        for (sample, input) in colored.iter().zip(inputs) {
            assert_eq!(sample.color.as_deref(), Some(color_of(input, &thresholds()).as_str()));
            assert_eq!(sample.label.as_deref(), Some(sample.score.to_string().as_str()));
        }
    }
}
