use crate::error::{ParseError, ProcessingError, Result};
use crate::models::{Grid, GridMetadata, ParsedGrid, Sample};
use crate::readers::layout::{
    self, FieldSpan, AXIS_BINS, AXIS_START, AXIS_START_HEMISPHERE, AXIS_STEP, AXIS_STOP,
    AXIS_STOP_HEMISPHERE, DAY_LABEL,
};
use crate::utils::constants::{
    AXIS_TOLERANCE, DATA_START_LINE, DAY_LINE, DEFAULT_BUFFER_SIZE, LATITUDE_LINE,
    LONGITUDE_LINE, SOUTH, WEST,
};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Reader for OMI TO3 daily gridded text dumps.
pub struct OzoneGridReader {
    use_mmap: bool,
}

impl OzoneGridReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Read and parse one daily file
    pub fn read_file(&self, path: &Path) -> Result<ParsedGrid> {
        debug!(path = %path.display(), mmap = self.use_mmap, "reading ozone dump");

        if self.use_mmap {
            self.read_mmap(path)
        } else {
            self.read_buffered(path)
        }
    }

    /// Parse an in-memory dump
    pub fn parse_str(&self, text: &str) -> Result<ParsedGrid> {
        Ok(parse(text)?)
    }

    fn read_buffered(&self, path: &Path) -> Result<ParsedGrid> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        self.parse_str(&text)
    }

    fn read_mmap(&self, path: &Path) -> Result<ParsedGrid> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let text = std::str::from_utf8(&mmap)
            .map_err(|e| ProcessingError::InvalidFormat(format!("Invalid UTF-8: {}", e)))?;

        self.parse_str(text)
    }
}

impl Default for OzoneGridReader {
    fn default() -> Self {
        Self::new()
    }
}

/// One axis header line, already sign-corrected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisHeader {
    pub bins: usize,
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

/// Parse a whole dump into its grid, header and `(max, min)` score fold.
pub fn parse(text: &str) -> std::result::Result<ParsedGrid, ParseError> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let day_line = line_at(&lines, DAY_LINE, DAY_LABEL.name)?;
    let day_label = field(day_line, DAY_LINE, DAY_LABEL)?.to_string();

    let longitude = parse_axis(
        line_at(&lines, LONGITUDE_LINE, "longitude axis")?,
        LONGITUDE_LINE,
        WEST,
    )?;
    let latitude = parse_axis(
        line_at(&lines, LATITUDE_LINE, "latitude axis")?,
        LATITUDE_LINE,
        SOUTH,
    )?;

    let metadata = GridMetadata {
        day_label,
        long_start: longitude.start,
        long_stop: longitude.stop,
        long_step: longitude.step,
        long_bins: longitude.bins,
        lat_start: latitude.start,
        lat_stop: latitude.stop,
        lat_step: latitude.step,
        lat_bins: latitude.bins,
    };
    check_axis_consistency(&metadata);

    let block_size = layout::block_size(metadata.long_bins);
    debug!(
        day = %metadata.day_label,
        long_bins = metadata.long_bins,
        lat_bins = metadata.lat_bins,
        block_size,
        "parsed header"
    );

    let data_end = DATA_START_LINE + metadata.lat_bins * block_size;
    if lines.len() < data_end {
        return Err(ParseError::new(
            lines.len() + 1,
            "score",
            format!(
                "header declares {} data lines but input ends after {} lines",
                metadata.lat_bins * block_size,
                lines.len()
            ),
        ));
    }

    let mut samples = Vec::with_capacity(metadata.cell_count());
    let mut max_score = 0;
    let mut min_score = 0;

    for lat_index in 0..metadata.lat_bins {
        let latitude = metadata.latitude_at(lat_index);
        let block_start = DATA_START_LINE + lat_index * block_size;

        for long_index in 0..metadata.long_bins {
            let (line_in_block, span) = layout::score_span(long_index);
            let line_index = block_start + line_in_block;
            let line = line_at(&lines, line_index, span.name)?;
            let score: i32 = parse_number(line, line_index, span)?;

            max_score = max_score.max(score);
            min_score = min_score.min(score);

            samples.push(Sample::new(
                latitude,
                metadata.longitude_at(long_index),
                score,
            ));
        }
    }

    Ok(ParsedGrid {
        metadata,
        grid: Grid::new(samples),
        max_score,
        min_score,
    })
}

/// Parse a longitude or latitude header line.
///
/// `negative_hemisphere` is the letter that flips a value negative; any other
/// letter, or none at all, leaves it positive.
pub fn parse_axis(
    line: &str,
    line_index: usize,
    negative_hemisphere: &str,
) -> std::result::Result<AxisHeader, ParseError> {
    let bins: usize = parse_number(line, line_index, AXIS_BINS)?;
    if bins == 0 {
        return Err(ParseError::new(
            line_index + 1,
            AXIS_BINS.name,
            "bin count must be positive",
        ));
    }

    let signed = |magnitude: f64, hemisphere: FieldSpan| {
        if hemisphere.extract(line) == Some(negative_hemisphere) {
            -magnitude
        } else {
            magnitude
        }
    };

    let start = signed(parse_number(line, line_index, AXIS_START)?, AXIS_START_HEMISPHERE);
    let stop = signed(parse_number(line, line_index, AXIS_STOP)?, AXIS_STOP_HEMISPHERE);
    let step = parse_number(line, line_index, AXIS_STEP)?;

    Ok(AxisHeader {
        bins,
        start,
        stop,
        step,
    })
}

fn check_axis_consistency(metadata: &GridMetadata) {
    let long_end = metadata.long_stop_from_steps();
    if (long_end - metadata.long_stop).abs() > AXIS_TOLERANCE {
        warn!(
            declared = metadata.long_stop,
            stepped = long_end,
            "longitude bins do not reach the declared stop"
        );
    }

    let lat_end = metadata.lat_stop_from_steps();
    if (lat_end - metadata.lat_stop).abs() > AXIS_TOLERANCE {
        warn!(
            declared = metadata.lat_stop,
            stepped = lat_end,
            "latitude bins do not reach the declared stop"
        );
    }
}

fn line_at<'a>(
    lines: &[&'a str],
    index: usize,
    field: &'static str,
) -> std::result::Result<&'a str, ParseError> {
    lines.get(index).copied().ok_or_else(|| {
        ParseError::new(
            index + 1,
            field,
            format!("input ends after {} lines", lines.len()),
        )
    })
}

fn field(line: &str, line_index: usize, span: FieldSpan) -> std::result::Result<&str, ParseError> {
    span.extract(line).ok_or_else(|| {
        ParseError::new(
            line_index + 1,
            span.name,
            format!(
                "expected columns {}..{} but line is {} characters long",
                span.start,
                span.end(),
                line.len()
            ),
        )
    })
}

fn parse_number<T: FromStr>(
    line: &str,
    line_index: usize,
    span: FieldSpan,
) -> std::result::Result<T, ParseError> {
    let raw = field(line, line_index, span)?;
    raw.trim().parse::<T>().map_err(|_| {
        ParseError::new(
            line_index + 1,
            span.name,
            format!("'{}' is not a valid number", raw),
        )
    })
}
