//! Column layout of the OMI TO3 daily text dump.
//!
//! ```text
//!  Day: 275 Oct  1, 2004    OMI TO3    STD OZONE    GEN:12:096 Asc LECT: 01:49 pm
//!  Longitudes:  360 bins centered on 179.5  W  to 179.5  E   (1.00 degree steps)
//!  Latitudes :  180 bins centered on  89.5  S  to  89.5  N   (1.00 degree steps)
//!  258 262 265 ...                                  (25 scores per line)
//! ```

use crate::utils::constants::{SCORES_PER_LINE, SCORE_LINE_OFFSET, SCORE_WIDTH};

/// A fixed-width column range inside one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    pub name: &'static str,
    pub start: usize,
    pub len: usize,
}

impl FieldSpan {
    pub const fn new(name: &'static str, start: usize, len: usize) -> Self {
        Self { name, start, len }
    }

    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    /// Raw column text, or `None` when the line is too short.
    pub fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        line.get(self.start..self.end())
    }
}

pub const DAY_LABEL: FieldSpan = FieldSpan::new("day label", 10, 12);

pub const AXIS_BINS: FieldSpan = FieldSpan::new("bin count", 14, 3);
pub const AXIS_START: FieldSpan = FieldSpan::new("start value", 35, 5);
pub const AXIS_START_HEMISPHERE: FieldSpan = FieldSpan::new("start hemisphere", 42, 1);
pub const AXIS_STOP: FieldSpan = FieldSpan::new("stop value", 48, 5);
pub const AXIS_STOP_HEMISPHERE: FieldSpan = FieldSpan::new("stop hemisphere", 55, 1);
pub const AXIS_STEP: FieldSpan = FieldSpan::new("step", 60, 4);

/// Text lines one latitude row occupies.
pub fn block_size(long_bins: usize) -> usize {
    (long_bins * SCORE_WIDTH).div_ceil(SCORES_PER_LINE * SCORE_WIDTH)
}

/// Line within a row block, and column span, of the score for `long_index`.
pub fn score_span(long_index: usize) -> (usize, FieldSpan) {
    let start = SCORE_LINE_OFFSET + (long_index % SCORES_PER_LINE) * SCORE_WIDTH;
    (
        long_index / SCORES_PER_LINE,
        FieldSpan::new("score", start, SCORE_WIDTH),
    )
}
