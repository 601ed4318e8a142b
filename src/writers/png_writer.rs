use crate::error::{ProcessingError, Result};
use crate::models::{Grid, GridMetadata};
use crate::utils::constants::{DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH};
use crate::utils::coordinates::{cell_bounds, Equirectangular};
use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;
use tracing::debug;

/// Rasterizes a colored grid as filled cells on a world map.
pub struct MapRenderer {
    width: u32,
    height: u32,
    background: Rgb<u8>,
}

impl MapRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Rgb([255, 255, 255]),
        }
    }

    /// Paint every sample as a rectangle one grid step wide and tall
    pub fn render(&self, metadata: &GridMetadata, grid: &Grid) -> Result<RgbImage> {
        let projection = Equirectangular::new(self.width, self.height);
        let mut image = RgbImage::from_pixel(self.width, self.height, self.background);

        for (index, sample) in grid.iter().enumerate() {
            let color = sample.color.as_deref().ok_or_else(|| {
                ProcessingError::InvalidFormat(format!("Sample {} has not been colored", index))
            })?;
            let rgb = parse_hex_color(color)?;

            let bounds = cell_bounds(sample, metadata);
            if let Some((columns, rows)) = projection.pixel_span(&bounds) {
                for y in rows {
                    for x in columns.clone() {
                        image.put_pixel(x, y, rgb);
                    }
                }
            }
        }

        Ok(image)
    }

    /// Write an image as PNG
    pub fn save(&self, image: &RgbImage, path: &Path) -> Result<()> {
        image.save_with_format(path, ImageFormat::Png)?;
        debug!(path = %path.display(), "saved map image");
        Ok(())
    }

    pub fn render_to_file(&self, metadata: &GridMetadata, grid: &Grid, path: &Path) -> Result<()> {
        let image = self.render(metadata, grid)?;
        self.save(&image, path)
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_WIDTH, DEFAULT_IMAGE_HEIGHT)
    }
}

/// Parse `#RRGGBB`, accepting either letter case.
pub fn parse_hex_color(color: &str) -> Result<Rgb<u8>> {
    let invalid = || ProcessingError::InvalidFormat(format!("Invalid hex color: '{}'", color));

    let hex = color.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}
