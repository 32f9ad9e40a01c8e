//! Reduces an image to a [`PixelGrid`] whose colors all come from a [`Palette`].

use crate::{
    dither::FloydSteinberg,
    remap::remap,
    resample::downsample,
    Palette, PixelGrid, Raster,
};
use std::fmt::Display;

/// The palette size at which [`DitherMode::Auto`] starts dithering.
pub const DITHER_THRESHOLD: usize = 128;

/// Whether to use error diffusion when mapping pixels to a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DitherMode {
    /// Dither only for palettes of at least [`DITHER_THRESHOLD`] colors.
    #[default]
    Auto,
    /// Always use Floyd–Steinberg dithering.
    Always,
    /// Always map each pixel to its nearest palette color.
    Never,
}

impl DitherMode {
    /// Whether a palette of `len` colors is dithered in this mode.
    #[must_use]
    pub const fn dithers(self, len: usize) -> bool {
        match self {
            DitherMode::Auto => len >= DITHER_THRESHOLD,
            DitherMode::Always => true,
            DitherMode::Never => false,
        }
    }
}

impl Display for DitherMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DitherMode::Auto => write!(f, "auto"),
            DitherMode::Always => write!(f, "always"),
            DitherMode::Never => write!(f, "never"),
        }
    }
}

/// Downsamples `source` to the grid size and maps every cell to a color of `palette`.
///
/// Palettes of at least [`DITHER_THRESHOLD`] colors are dithered with [`FloydSteinberg`].
/// Smaller palettes use direct nearest color mapping, since error diffusion makes
/// few-color art noisy.
///
/// # Examples
/// ```
/// # use pixelette::{quantize, Palette, Raster};
/// # use palette::{Srgb, Srgba};
/// # fn main() -> Result<(), pixelette::Error> {
/// let raster = Raster::filled(64, 64, Srgba::new(10, 10, 10, 255))?;
/// let grid = quantize(&raster, &Palette::black_and_white());
/// assert!(grid.pixels().iter().all(|p| p.color == Srgb::new(0, 0, 0)));
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn quantize(source: &Raster, palette: &Palette) -> PixelGrid {
    quantize_with(source, palette, DitherMode::Auto)
}

/// Like [`quantize`], but with an explicit [`DitherMode`].
///
/// An empty palette is replaced by [`Palette::black_and_white`].
#[must_use]
pub fn quantize_with(source: &Raster, palette: &Palette, mode: DitherMode) -> PixelGrid {
    quantize_dithered(source, palette, mode, FloydSteinberg::new())
}

/// Like [`quantize_with`], dithering with the given [`FloydSteinberg`] when `mode` calls for it.
pub(crate) fn quantize_dithered(
    source: &Raster,
    palette: &Palette,
    mode: DitherMode,
    ditherer: FloydSteinberg,
) -> PixelGrid {
    let fallback;
    let palette = if palette.is_empty() {
        log::warn!("quantizing with an empty palette, using black and white");
        fallback = Palette::black_and_white();
        &fallback
    } else {
        palette
    };

    let small = downsample(source);
    let dither = mode.dithers(palette.len());
    log::debug!(
        "quantizing {}x{} raster to {} colors (dither: {dither})",
        source.width(),
        source.height(),
        palette.len(),
    );

    let pixels = if dither {
        ditherer.dither(&small, palette)
    } else {
        remap(&small, palette)
    };

    let mut grid = PixelGrid::default();
    grid.pixels_mut().copy_from_slice(&pixels);
    grid
}
