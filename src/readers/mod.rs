pub mod grid_reader;
pub mod layout;

pub use grid_reader::{parse, parse_axis, AxisHeader, OzoneGridReader};
pub use layout::FieldSpan;
