/// Header line indices
pub const DAY_LINE: usize = 0;
pub const LONGITUDE_LINE: usize = 1;
pub const LATITUDE_LINE: usize = 2;
pub const DATA_START_LINE: usize = 3;

/// Data block layout
pub const SCORE_WIDTH: usize = 3;
pub const SCORES_PER_LINE: usize = 25;
pub const SCORE_LINE_OFFSET: usize = 1;

/// Hemisphere letters that flip an axis value negative
pub const WEST: &str = "W";
pub const SOUTH: &str = "S";

/// Tolerance when comparing a stepped axis end against its declared stop
pub const AXIS_TOLERANCE: f64 = 1e-6;

/// Coloring defaults
pub const DEFAULT_THRESHOLDS: [f64; 5] = [100.0, 225.0, 350.0, 476.0, 600.0];

/// Gradient sentinels
pub const COLOR_INVALID: &str = "#000000";
pub const COLOR_RED: &str = "#FF0000";
pub const COLOR_BLUE: &str = "#0000FF";

/// Raster defaults
pub const DEFAULT_IMAGE_WIDTH: u32 = 500;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 500;
pub const MAX_IMAGE_DIMENSION: u32 = 8192;

/// Input file naming, e.g. L3_ozone_omi_20041001.txt
pub const FILENAME_DATE_OFFSET: usize = 13;
pub const FILENAME_DATE_LEN: usize = 8;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const PARALLEL_THRESHOLD: usize = 4096;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "OZONE_MAPPER";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
