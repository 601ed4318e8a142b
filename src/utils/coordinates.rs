use crate::models::{GridMetadata, Sample};

/// Geographic rectangle covered by one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBounds {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

/// Rectangle spanning `latitude ± lat_step/2` by `longitude ± long_step/2`.
///
/// Steps are taken by magnitude so a negative step still yields south < north.
pub fn cell_bounds(sample: &Sample, metadata: &GridMetadata) -> CellBounds {
    let half_lat = metadata.lat_step.abs() / 2.0;
    let half_long = metadata.long_step.abs() / 2.0;

    CellBounds {
        south: sample.latitude - half_lat,
        north: sample.latitude + half_lat,
        west: sample.longitude - half_long,
        east: sample.longitude + half_long,
    }
}

/// Equirectangular projection of the whole globe onto a `width` x `height` raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equirectangular {
    pub width: u32,
    pub height: u32,
}

impl Equirectangular {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Fractional pixel x for a longitude in degrees
    pub fn x(&self, longitude: f64) -> f64 {
        (longitude + 180.0) / 360.0 * self.width as f64
    }

    /// Fractional pixel y for a latitude in degrees, north up
    pub fn y(&self, latitude: f64) -> f64 {
        (90.0 - latitude) / 180.0 * self.height as f64
    }

    /// Pixel columns and rows covered by a cell, clipped to the raster.
    ///
    /// Returns `None` when the cell lies entirely off the image.
    pub fn pixel_span(&self, bounds: &CellBounds) -> Option<(std::ops::Range<u32>, std::ops::Range<u32>)> {
        let clip = |v: f64, max: u32| v.round().clamp(0.0, max as f64) as u32;

        let x0 = clip(self.x(bounds.west), self.width);
        let x1 = clip(self.x(bounds.east), self.width);
        let y0 = clip(self.y(bounds.north), self.height);
        let y1 = clip(self.y(bounds.south), self.height);

        if x0 >= x1 || y0 >= y1 {
            None
        } else {
            Some((x0..x1, y0..y1))
        }
    }
}
