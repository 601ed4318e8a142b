use serde::{Deserialize, Serialize};

/// Axis description and day label read from the three header lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMetadata {
    pub day_label: String,

    pub long_start: f64,
    pub long_stop: f64,
    pub long_step: f64,
    pub long_bins: usize,

    pub lat_start: f64,
    pub lat_stop: f64,
    pub lat_step: f64,
    pub lat_bins: usize,
}

impl GridMetadata {
    pub fn cell_count(&self) -> usize {
        self.lat_bins * self.long_bins
    }

    /// Latitude of the `lat_index`-th row, stepped from `lat_start`.
    pub fn latitude_at(&self, lat_index: usize) -> f64 {
        self.lat_start + lat_index as f64 * self.lat_step
    }

    /// Longitude of the `long_index`-th column, stepped from `long_start`.
    pub fn longitude_at(&self, long_index: usize) -> f64 {
        self.long_start + long_index as f64 * self.long_step
    }

    /// Row/column of a row-major sample index.
    pub fn indices_of(&self, index: usize) -> (usize, usize) {
        (index / self.long_bins, index % self.long_bins)
    }

    /// Where the last bin lands when stepping from the start value.
    pub fn long_stop_from_steps(&self) -> f64 {
        self.longitude_at(self.long_bins.saturating_sub(1))
    }

    pub fn lat_stop_from_steps(&self) -> f64 {
        self.latitude_at(self.lat_bins.saturating_sub(1))
    }
}

/// One geo-located ozone reading.
///
/// `color` and `label` stay `None` until the grid has been colored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub latitude: f64,
    pub longitude: f64,
    pub score: i32,
    pub color: Option<String>,
    pub label: Option<String>,
}

impl Sample {
    pub fn new(latitude: f64, longitude: f64, score: i32) -> Self {
        Self {
            latitude,
            longitude,
            score,
            color: None,
            label: None,
        }
    }

    pub fn with_coloring(mut self, color: String, label: String) -> Self {
        self.color = Some(color);
        self.label = Some(label);
        self
    }

    /// A zero reading means the instrument had no data for the cell.
    pub fn is_missing(&self) -> bool {
        self.score == 0
    }

    pub fn is_colored(&self) -> bool {
        self.color.is_some()
    }
}

/// Samples in row-major order: latitude rows ascending, longitude within a row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Grid {
    pub samples: Vec<Sample>,
}

impl Grid {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn scores(&self) -> Vec<i32> {
        self.samples.iter().map(|s| s.score).collect()
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Output of a parse: the grid, its header and the observed score range.
///
/// `min_score` starts from 0, so a grid without negative readings reports 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedGrid {
    pub metadata: GridMetadata,
    pub grid: Grid,
    pub max_score: i32,
    pub min_score: i32,
}
