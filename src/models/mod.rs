pub mod grid;
pub mod thresholds;

pub use grid::{Grid, GridMetadata, ParsedGrid, Sample};
pub use thresholds::Thresholds;
