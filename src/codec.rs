//! Encoding of finished grids into portable byte streams.

use crate::{PixelGrid, Result};
#[cfg(feature = "image")]
use {
    crate::{GRID_SIZE, PREVIEW_SCALE},
    image::{codecs::png::PngEncoder, imageops::FilterType, ImageEncoder, RgbaImage},
};

/// Turns a [`PixelGrid`] into bytes, e.g., for a download.
pub trait Codec {
    /// Encodes `grid`.
    ///
    /// # Errors
    /// Returns [`Error::RenderFailure`](crate::Error::RenderFailure)
    /// if the output could not be produced.
    fn encode(&self, grid: &PixelGrid) -> Result<Vec<u8>>;
}

/// Emits the grid as raw row-major RGBA bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl Codec for RawCodec {
    fn encode(&self, grid: &PixelGrid) -> Result<Vec<u8>> {
        Ok(grid.as_bytes().to_vec())
    }
}

/// Magnifies `grid` by [`PREVIEW_SCALE`] with nearest neighbor sampling.
#[cfg(feature = "image")]
#[must_use]
pub fn preview(grid: &PixelGrid) -> RgbaImage {
    let size = GRID_SIZE * PREVIEW_SCALE;
    image::imageops::resize(&grid.to_rgba_image(), size, size, FilterType::Nearest)
}

/// Encodes grids as PNG, optionally magnified to the preview size.
#[cfg(feature = "image")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec {
    /// Whether to encode the magnified preview instead of the bare grid.
    preview: bool,
}

#[cfg(feature = "image")]
impl PngCodec {
    /// A codec for the bare `16x16` grid.
    #[must_use]
    pub const fn new() -> Self {
        Self { preview: false }
    }

    /// A codec for the magnified preview (see [`preview`]).
    #[must_use]
    pub const fn preview() -> Self {
        Self { preview: true }
    }
}

#[cfg(feature = "image")]
impl Codec for PngCodec {
    fn encode(&self, grid: &PixelGrid) -> Result<Vec<u8>> {
        let image = if self.preview { preview(grid) } else { grid.to_rgba_image() };

        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )?;

        log::debug!("encoded {}x{} png ({} bytes)", image.width(), image.height(), bytes.len());
        Ok(bytes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use palette::Srgba;

    fn checkerboard() -> PixelGrid {
        let mut grid = PixelGrid::default();
        for y in 0..16 {
            for x in 0..16 {
                if (x + y) % 2 == 0 {
                    grid.set(x, y, Srgba::new(255, 0, 0, 255));
                }
            }
        }
        grid
    }

    #[test]
    fn raw_is_grid_bytes() {
        let grid = checkerboard();
        assert_eq!(RawCodec.encode(&grid).unwrap(), grid.as_bytes());
    }

    #[test]
    #[cfg(feature = "image")]
    fn preview_is_nearest_neighbor() {
        let grid = checkerboard();
        let image = preview(&grid);
        assert_eq!(image.dimensions(), (256, 256));
        for (x, y, pixel) in image.enumerate_pixels() {
            let cell = grid.get(x / PREVIEW_SCALE, y / PREVIEW_SCALE).unwrap();
            assert_eq!(pixel.0, [cell.red, cell.green, cell.blue, cell.alpha]);
        }
    }

    #[test]
    #[cfg(feature = "image")]
    fn png_decodes_to_grid() {
        let grid = checkerboard();

        let bytes = PngCodec::new().encode(&grid).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert_eq!(decoded.as_raw().as_slice(), grid.as_bytes());

        let bytes = PngCodec::preview().encode(&grid).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert_eq!(decoded, preview(&grid));
    }
}
