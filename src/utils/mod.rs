pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{cell_bounds, CellBounds, Equirectangular};
pub use filename::{default_output_filename, extract_date_from_filename, parse_day_label};
pub use progress::ProgressReporter;
