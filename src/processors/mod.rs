pub mod color_mapper;
pub mod grid_summary;
pub mod map_pipeline;

pub use color_mapper::{color_of, patch_holes, Band, ColorMapper};
pub use grid_summary::{GridSummarizer, GridSummary};
pub use map_pipeline::{MapPipeline, ProcessedDay};
