//! Full size palettes from a grid fitted to each channel's observed range.
//!
//! The most frequent colors are always kept; the rest only make it in when they are
//! perceptually distinct from everything already selected. Whatever room is left is padded
//! with a gray ramp and then a hue sweep, so the palette always ends up full.

use super::{histogram::Binner, CountFn, ExtractionFailure};
use crate::{
    colorspace::{hsl_to_rgb, perceptual_distance},
    Palette, Raster, ALPHA_THRESHOLD,
};
use palette::Srgb;

/// The share of the palette filled with the most frequent colors without a diversity check.
const GUARANTEED_SHARE: (usize, usize) = (67, 100);

/// The minimum perceptual distance a color needs to every selected color to be added.
const MIN_DISTANCE: f32 = 0.05;

/// Every `SAMPLE_STEP`-th pixel is used to measure the channel ranges.
const SAMPLE_STEP: usize = 4;

/// The observed range and mean of each channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ChannelStats {
    /// The smallest value of each channel.
    pub(super) min: [u8; 3],
    /// The largest value of each channel.
    pub(super) max: [u8; 3],
    /// The mean of each channel.
    pub(super) mean: [f64; 3],
}

impl ChannelStats {
    /// Measures the opaque pixels in `colors`, returning `None` if there are none.
    fn measure(colors: impl Iterator<Item = Srgb<u8>>) -> Option<Self> {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        let mut sum = [0u64; 3];
        let mut n = 0u64;

        for color in colors {
            let components = [color.red, color.green, color.blue];
            for c in 0..3 {
                min[c] = min[c].min(components[c]);
                max[c] = max[c].max(components[c]);
                sum[c] += u64::from(components[c]);
            }
            n += 1;
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = sum.map(|s| s as f64 / n.max(1) as f64);
        (n > 0).then_some(Self { min, max, mean })
    }

    /// Measures a sample of the opaque pixels in `raster`.
    ///
    /// Falls back to every pixel when the sample has no opaque pixels.
    pub(super) fn sample(raster: &Raster) -> Option<Self> {
        let sampled = raster
            .pixels()
            .iter()
            .step_by(SAMPLE_STEP)
            .filter(|p| p.alpha >= ALPHA_THRESHOLD)
            .map(|p| p.color);

        Self::measure(sampled).or_else(|| Self::measure(raster.opaque_colors()))
    }

    /// The number of levels for each channel: one per `42` values of range, but at least `6`.
    pub(super) fn levels(&self) -> [u32; 3] {
        std::array::from_fn(|c| u32::from(self.max[c] - self.min[c]).div_ceil(42).max(6))
    }

    /// A binner over the observed ranges.
    pub(super) fn binner(&self) -> Binner {
        Binner::Adaptive {
            min: self.min,
            max: self.max,
            levels: self.levels(),
        }
    }
}

/// Appends grays from black to white in steps of `5`.
fn pad_gray_ramp(palette: &mut Palette, k: usize) {
    for v in (0..=255u8).step_by(5) {
        if palette.len() >= k {
            return;
        }
        palette.push_unique(Srgb::new(v, v, v));
    }
}

/// Appends a sweep over hue, saturation, and lightness.
fn pad_hue_sweep(palette: &mut Palette, k: usize) {
    for hue in (0..360u16).step_by(20) {
        for saturation in [100.0, 75.0, 50.0, 25.0] {
            for lightness in [25.0, 50.0, 75.0] {
                if palette.len() >= k {
                    return;
                }
                palette.push_unique(hsl_to_rgb(f32::from(hue), saturation, lightness));
            }
        }
    }
}

/// Computes a palette of exactly `k` colors.
pub(super) fn palette(
    raster: &Raster,
    k: usize,
    count: CountFn,
) -> Result<Vec<Srgb<u8>>, ExtractionFailure> {
    let stats = ChannelStats::sample(raster).ok_or(ExtractionFailure::NoOpaquePixels)?;
    let binner = stats.binner();

    log::debug!(
        "adaptive ranges {:?}..={:?} (mean {:.1?}) with {:?} levels",
        stats.min,
        stats.max,
        stats.mean,
        stats.levels()
    );

    let buckets = count(raster, binner).buckets();
    if buckets.is_empty() {
        return Err(ExtractionFailure::NoOpaquePixels);
    }

    let guaranteed = k * GUARANTEED_SHARE.0 / GUARANTEED_SHARE.1;
    let mut palette = Palette::default();

    for bucket in buckets.iter().take(guaranteed) {
        palette.push_unique(bucket.color);
    }

    for bucket in buckets.iter().skip(guaranteed) {
        if palette.len() >= k {
            break;
        }
        if palette
            .iter()
            .all(|&c| perceptual_distance(c, bucket.color) > MIN_DISTANCE)
        {
            palette.push_unique(bucket.color);
        }
    }

    let from_image = palette.len();
    pad_gray_ramp(&mut palette, k);
    pad_hue_sweep(&mut palette, k);
    for v in 0..=255u8 {
        if palette.len() >= k {
            break;
        }
        palette.push_unique(Srgb::new(v, v, v));
    }

    log::debug!(
        "adaptive palette: {from_image} image colors, {} padding",
        palette.len() - from_image
    );

    palette.truncate(k);
    Ok(palette.into_inner())
}
