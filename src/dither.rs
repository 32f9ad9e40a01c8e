//! Contains dither implementation(s).

use crate::{
    colorspace::to_f32,
    remap::nearest_index,
    Raster,
};
use palette::{Alpha, Srgb, Srgba};

/// Floyd–Steinberg dithering.
///
/// Pixels are visited in row-major order. The difference between a pixel and its chosen
/// palette color is spread over the neighbors that have not been visited yet.
#[derive(Debug, Clone, Copy)]
pub struct FloydSteinberg(f32);

impl FloydSteinberg {
    /// The default error diffusion factor, which diffuses all of the error.
    pub const DEFAULT_ERROR_DIFFUSION: f32 = 1.0;

    /// The neighbor offsets `(dx, dy)` and their share of the error.
    pub const WEIGHTS: [(isize, isize, f32); 4] = [
        (1, 0, 7.0 / 16.0),
        (-1, 1, 3.0 / 16.0),
        (0, 1, 5.0 / 16.0),
        (1, 1, 1.0 / 16.0),
    ];

    /// Creates a new [`FloydSteinberg`] with the default error diffusion factor.
    #[must_use]
    pub const fn new() -> Self {
        Self(Self::DEFAULT_ERROR_DIFFUSION)
    }

    /// Creates a new [`FloydSteinberg`] with the given error diffusion factor.
    ///
    /// For example, a factor of `1.0` diffuses all of the error to the neighboring pixels.
    ///
    /// This will return `None` if `error_diffusion` is not in the range `0.0..=1.0`.
    #[must_use]
    pub fn with_error_diffusion(error_diffusion: f32) -> Option<Self> {
        if (0.0..=1.0).contains(&error_diffusion) {
            Some(Self(error_diffusion))
        } else {
            None
        }
    }

    /// Gets the error diffusion factor for this [`FloydSteinberg`].
    #[must_use]
    pub const fn error_diffusion(&self) -> f32 {
        self.0
    }
}

impl Default for FloydSteinberg {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the colors of the pixels with the error diffused so far.
struct ErrorBuf {
    /// The width of a row of pixels.
    width: usize,
    /// The number of rows.
    height: usize,
    /// The working colors in row-major order.
    colors: Vec<[f32; 3]>,
}

impl ErrorBuf {
    /// Creates a working copy of the colors of `raster`.
    fn new(raster: &Raster) -> Self {
        Self {
            width: raster.width() as usize,
            height: raster.height() as usize,
            colors: raster.pixels().iter().map(|p| to_f32(p.color)).collect(),
        }
    }

    /// Spreads `err` from `(x, y)` to its unvisited neighbors, clamping each channel to `0..=255`.
    #[inline]
    fn propagate(&mut self, x: usize, y: usize, err: [f32; 3]) {
        for (dx, dy, weight) in FloydSteinberg::WEIGHTS {
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
            else {
                continue;
            };
            if nx >= self.width || ny >= self.height {
                continue;
            }

            let color = &mut self.colors[ny * self.width + nx];
            for c in 0..3 {
                color[c] = (color[c] + weight * err[c]).clamp(0.0, 255.0);
            }
        }
    }
}

impl FloydSteinberg {
    /// Dithers `raster` with `palette`, returning the new pixels.
    ///
    /// Alpha is kept as is. Fully transparent pixels are given a palette color but do not
    /// diffuse any error, since they are not visible.
    /// Returns the pixels unchanged if `palette` is empty.
    #[must_use]
    pub fn dither(&self, raster: &Raster, palette: &[Srgb<u8>]) -> Vec<Srgba<u8>> {
        let &FloydSteinberg(diffusion) = self;

        if palette.is_empty() {
            return raster.pixels().to_vec();
        }

        let points = palette.iter().copied().map(to_f32).collect::<Vec<_>>();
        let mut error = ErrorBuf::new(raster);
        let mut out = Vec::with_capacity(raster.pixels().len());

        for (i, pixel) in raster.pixels().iter().enumerate() {
            let (x, y) = (i % error.width, i / error.width);
            let point = error.colors[i];

            #[allow(clippy::expect_used)]
            let nearest = nearest_index(&points, point).expect("non-empty palette");
            out.push(Alpha { color: palette[nearest], alpha: pixel.alpha });

            if pixel.alpha > 0 {
                let chosen = points[nearest];
                let err = std::array::from_fn(|c| diffusion * (point[c] - chosen[c]));
                error.propagate(x, y, err);
            }
        }

        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn weights_sum_to_one() {
        let total = FloydSteinberg::WEIGHTS.iter().map(|&(_, _, w)| w).sum::<f32>();
        assert!((total - 1.0).abs() < f32::EPSILON);
        // only pixels after the current one in scan order receive error
        assert!(FloydSteinberg::WEIGHTS
            .iter()
            .all(|&(dx, dy, _)| dy > 0 || (dy == 0 && dx > 0)));
    }

    #[test]
    fn interior_error_is_conserved() {
        let raster = Raster::filled(3, 3, Srgba::new(128, 128, 128, 255)).unwrap();
        let mut error = ErrorBuf::new(&raster);
        let before = error.colors.iter().flatten().sum::<f32>();

        let err = [16.0, -32.0, 8.0];
        error.propagate(1, 1, err);
        let after = error.colors.iter().flatten().sum::<f32>();
        assert!((after - before - err.iter().sum::<f32>()).abs() < 1e-3);

        // right, bottom-left, bottom, and bottom-right neighbors only
        assert_eq!(error.colors[5], [135.0, 114.0, 131.5]);
        assert_eq!(error.colors[6], [131.0, 122.0, 129.5]);
        assert_eq!(error.colors[7], [133.0, 118.0, 130.5]);
        assert_eq!(error.colors[8], [129.0, 126.0, 128.5]);
        assert!(error.colors[..5].iter().all(|&c| c == [128.0; 3]));
    }

    #[test]
    fn edges_and_clamping() {
        let raster = Raster::filled(2, 2, Srgba::new(250, 5, 128, 255)).unwrap();
        let mut error = ErrorBuf::new(&raster);

        // bottom-right corner has no unvisited neighbors
        error.propagate(1, 1, [100.0; 3]);
        assert!(error.colors.iter().all(|&c| c == [250.0, 5.0, 128.0]));

        error.propagate(0, 0, [160.0, -160.0, 0.0]);
        assert_eq!(error.colors[1], [255.0, 0.0, 128.0]);
        assert_eq!(error.colors[2], [255.0, 0.0, 128.0]);
        assert_eq!(error.colors[3], [255.0, 0.0, 128.0]);
    }

    #[test]
    fn empty_palette() {
        let raster = test_raster(4, 4);
        assert_eq!(FloydSteinberg::new().dither(&raster, &[]), raster.pixels());
    }

    #[test]
    fn exact_match_image_unaffected() {
        let palette = [
            Srgb::new(0, 0, 0),
            Srgb::new(255, 255, 255),
            Srgb::new(255, 0, 0),
            Srgb::new(0, 0, 255),
        ];
        let colors = (0..64).map(|i| palette[(i * 7) % 4]).collect::<Vec<_>>();
        let raster = raster_from_colors_sized(8, 8, &colors);
        let out = FloydSteinberg::new().dither(&raster, &palette);
        assert_eq!(out, raster.pixels());
    }

    #[test]
    fn dithers_mid_gray() {
        let raster = Raster::filled(16, 16, Srgba::new(128, 128, 128, 255)).unwrap();
        let palette = [Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)];
        let out = FloydSteinberg::new().dither(&raster, &palette);

        let white = out.iter().filter(|p| p.color == palette[1]).count();
        assert!(out.iter().all(|p| palette.contains(&p.color)));
        assert!((100..=156).contains(&white), "{white} white pixels");
    }

    #[test]
    fn error_diffusion_range() {
        assert!(FloydSteinberg::with_error_diffusion(1.5).is_none());
        assert!(FloydSteinberg::with_error_diffusion(-0.1).is_none());
        let ditherer = FloydSteinberg::with_error_diffusion(0.5).unwrap();
        assert!((ditherer.error_diffusion() - 0.5).abs() < f32::EPSILON);
    }
}
