//! Contains the [`PixelArtPipeline`] builder struct for the high level API.

#[cfg(feature = "threads")]
use crate::palette_par;
use crate::{
    dither::FloydSteinberg, palette, quantize::quantize_dithered, DitherMode, Palette,
    PaletteSize, PixelGrid, Raster,
};

/// The options of a [`PixelArtPipeline`], separate from its input.
///
/// With the `serde` feature, these can be loaded from any serde format.
/// Missing fields take their default values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineOptions {
    /// The maximum number of colors in the palette.
    pub palette_size: PaletteSize,
    /// When to dither.
    pub dither: DitherMode,
    /// The error diffusion factor to use when dithering.
    pub dither_error_diffusion: f32,
}

impl PipelineOptions {
    /// Creates the default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            palette_size: PaletteSize::DEFAULT,
            dither: DitherMode::Auto,
            dither_error_diffusion: FloydSteinberg::DEFAULT_ERROR_DIFFUSION,
        }
    }

    /// Creates the ditherer specified by the current options.
    fn ditherer(&self) -> FloydSteinberg {
        FloydSteinberg::with_error_diffusion(self.dither_error_diffusion).unwrap_or_default()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A builder struct to turn a [`Raster`] into a palette and a pixel art [`PixelGrid`].
///
/// # Examples
/// To start, create a [`PixelArtPipeline`] from a [`Raster`]:
/// ```
/// # use pixelette::{PixelArtPipeline, Raster};
/// # use palette::Srgba;
/// # fn main() -> Result<(), pixelette::Error> {
/// let raster = Raster::filled(64, 64, Srgba::new(30, 120, 200, 255))?;
/// let mut pipeline = PixelArtPipeline::new(&raster);
/// # Ok(())
/// # }
/// ```
///
/// Then, you can change options like the number of colors in the palette:
/// ```
/// # use pixelette::{DitherMode, PixelArtPipeline, PaletteSize, Raster};
/// # use palette::Srgba;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let raster = Raster::filled(64, 64, Srgba::new(30, 120, 200, 255))?;
/// # let mut pipeline = PixelArtPipeline::new(&raster);
/// let pipeline = pipeline
///     .palette_size(PaletteSize::try_from(32)?)
///     .dither(DitherMode::Never);
/// # Ok(())
/// # }
/// ```
///
/// Finally, run the pipeline:
/// ```
/// # use pixelette::{PixelArtPipeline, Raster};
/// # use palette::Srgba;
/// # fn main() -> Result<(), pixelette::Error> {
/// # let raster = Raster::filled(64, 64, Srgba::new(30, 120, 200, 255))?;
/// let (palette, grid) = PixelArtPipeline::new(&raster).pixel_art();
/// assert!(grid.pixels().iter().all(|p| palette.contains(&p.color)));
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct PixelArtPipeline<'a> {
    /// The input image.
    raster: &'a Raster,
    /// The options to run with.
    options: PipelineOptions,
}

impl<'a> PixelArtPipeline<'a> {
    /// Creates a new [`PixelArtPipeline`] with default options.
    pub fn new(raster: &'a Raster) -> Self {
        Self::with_options(raster, PipelineOptions::new())
    }

    /// Creates a new [`PixelArtPipeline`] with the given options.
    pub fn with_options(raster: &'a Raster, options: PipelineOptions) -> Self {
        Self { raster, options }
    }

    /// Sets the palette size which determines the (maximum) number of colors
    /// to have in the palette.
    ///
    /// The default palette size is `16`.
    pub fn palette_size(&mut self, size: PaletteSize) -> &mut Self {
        self.options.palette_size = size;
        self
    }

    /// Sets when to apply dithering.
    ///
    /// The default value is [`DitherMode::Auto`],
    /// which only dithers palettes of at least
    /// [`DITHER_THRESHOLD`](crate::DITHER_THRESHOLD) colors.
    pub fn dither(&mut self, dither: DitherMode) -> &mut Self {
        self.options.dither = dither;
        self
    }

    /// Sets the error diffusion factor for the dither.
    ///
    /// The given `diffusion` should be in the range `0.0..=1.0`,
    /// otherwise the default error diffusion will be used as a fallback.
    ///
    /// The default value is [`FloydSteinberg::DEFAULT_ERROR_DIFFUSION`].
    pub fn dither_error_diffusion(&mut self, diffusion: f32) -> &mut Self {
        self.options.dither_error_diffusion = diffusion;
        self
    }

    /// The current options.
    #[must_use]
    pub fn options(&self) -> PipelineOptions {
        self.options
    }
}

impl<'a> PixelArtPipeline<'a> {
    /// Runs the pipeline and returns the computed color palette.
    #[must_use]
    pub fn palette(&self) -> Palette {
        palette(self.raster, self.options.palette_size)
    }

    /// Runs the pipeline and returns the quantized grid.
    #[must_use]
    pub fn pixel_grid(&self) -> PixelGrid {
        self.pixel_art().1
    }

    /// Runs the pipeline and returns both the palette and the grid quantized with it.
    #[must_use]
    pub fn pixel_art(&self) -> (Palette, PixelGrid) {
        let palette = self.palette();
        let grid = self.quantize(&palette);
        (palette, grid)
    }

    /// Quantizes the input with `palette` according to the current options.
    fn quantize(&self, palette: &Palette) -> PixelGrid {
        let PipelineOptions { dither, .. } = self.options;
        quantize_dithered(self.raster, palette, dither, self.options.ditherer())
    }
}

#[cfg(feature = "threads")]
impl<'a> PixelArtPipeline<'a> {
    /// Runs the pipeline in parallel and returns the computed color palette.
    #[must_use]
    pub fn palette_par(&self) -> Palette {
        palette_par(self.raster, self.options.palette_size)
    }

    /// Runs the pipeline in parallel and returns the quantized grid.
    #[must_use]
    pub fn pixel_grid_par(&self) -> PixelGrid {
        self.pixel_art_par().1
    }

    /// Runs the pipeline in parallel and returns both the palette and the quantized grid.
    ///
    /// Only palette extraction runs in parallel; the grid is too small to benefit.
    #[must_use]
    pub fn pixel_art_par(&self) -> (Palette, PixelGrid) {
        let palette = self.palette_par();
        let grid = self.quantize(&palette);
        (palette, grid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn defaults() {
        let options = PipelineOptions::default();
        assert_eq!(options.palette_size, PaletteSize::default());
        assert_eq!(options.dither, DitherMode::Auto);
        assert!((options.dither_error_diffusion - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn builder_sets_options() {
        let raster = test_raster(8, 8);
        let mut pipeline = PixelArtPipeline::new(&raster);
        pipeline
            .palette_size(PaletteSize::try_from(64).unwrap())
            .dither(DitherMode::Always)
            .dither_error_diffusion(0.5);

        let options = pipeline.options();
        assert_eq!(options.palette_size.get(), 64);
        assert_eq!(options.dither, DitherMode::Always);
        assert!((options.ditherer().error_diffusion() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_diffusion_uses_default() {
        let options = PipelineOptions { dither_error_diffusion: 3.0, ..PipelineOptions::new() };
        assert!(
            (options.ditherer().error_diffusion() - FloydSteinberg::DEFAULT_ERROR_DIFFUSION).abs()
                < f32::EPSILON
        );
    }

    #[test]
    fn grid_uses_palette() {
        let raster = test_raster(120, 80);
        for k in PaletteSize::CHOICES {
            let (palette, grid) = PixelArtPipeline::new(&raster).palette_size(k).pixel_art();
            assert!(palette.len() <= k.get());
            assert!(grid.pixels().iter().all(|p| palette.contains(&p.color)));
        }
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let raster = test_raster(150, 100);
        for k in PaletteSize::CHOICES {
            let mut pipeline = PixelArtPipeline::new(&raster);
            pipeline.palette_size(k);
            assert_eq!(pipeline.pixel_art(), pipeline.pixel_art_par());
        }
    }

    #[test]
    #[cfg(feature = "serde")]
    fn options_deserialize() {
        let options = PipelineOptions {
            palette_size: PaletteSize::try_from(64u16).unwrap(),
            dither: DitherMode::Never,
            dither_error_diffusion: 0.5,
        };
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(serde_json::from_str::<PipelineOptions>(&json).unwrap(), options);

        let partial: PipelineOptions = serde_json::from_str(r#"{"palette_size": 8}"#).unwrap();
        assert_eq!(partial.palette_size.get(), 8);
        assert_eq!(partial.dither, DitherMode::Auto);

        for size in [0, 1, 257, 300] {
            let json = format!(r#"{{"palette_size": {size}}}"#);
            assert!(serde_json::from_str::<PipelineOptions>(&json).is_err(), "{size}");
        }
    }
}
