//! Palette extraction: derives a bounded list of representative colors from a [`Raster`].
//!
//! The strategy depends on the requested palette size `k`:
//! - `k <= 2`: the image is split at its mean luminance into a dark and a light color
//!   (see [`ExtractionStrategy::Luminance`]).
//! - `2 < k < 64`: the most frequent colors after snapping pixels to a coarse grid whose
//!   resolution grows with `k`. Black and white are always included.
//! - `64 <= k < 256`: the same, on a fixed grid with a step of `16` per channel.
//! - `k >= 256`: a grid fitted to each channel's observed range,
//!   with a perceptual diversity filter and deterministic padding.
//!
//! Extraction never fails for a valid [`Raster`]. If a strategy cannot produce a palette
//! (for example, when every pixel is transparent), the synthetic palette from
//! [`diverse_palette`] is returned instead.
//!
//! The result only depends on the pixels and `k`: ties in frequency are broken by
//! which color appears first in the image.

mod adaptive;
mod fallback;
mod frequency;
mod histogram;
mod luminance;

pub use fallback::diverse_palette;

use crate::{is_near_black, is_near_white, Palette, PaletteSize, Raster};
use histogram::{Binner, Histogram};
use palette::Srgb;
use std::fmt::Display;

/// Pure black.
pub(crate) const BLACK: Srgb<u8> = Srgb::new(0, 0, 0);

/// Pure white.
pub(crate) const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);

/// The largest palette size that still gets black and white anchors.
const ANCHOR_LIMIT: usize = 16;

/// Counts the bucketed colors of a raster, either on one thread or on many.
type CountFn = fn(&Raster, Binner) -> Histogram;

/// Internal reasons a strategy could not produce a palette.
///
/// These never reach the caller; they are logged and replaced by the fallback palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExtractionFailure {
    /// No pixel has an alpha of at least [`ALPHA_THRESHOLD`](crate::ALPHA_THRESHOLD).
    NoOpaquePixels,
}

impl Display for ExtractionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionFailure::NoOpaquePixels => write!(f, "the image has no opaque pixels"),
        }
    }
}

/// The extraction algorithm used for a palette size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Dark and light averages of the pixels below and above the mean luminance.
    Luminance,
    /// The most frequent colors after reducing each channel to `levels` levels.
    Frequency {
        /// The number of levels per channel.
        levels: u32,
        /// Whether black and white are forced into the palette.
        anchors: bool,
    },
    /// Range-fitted buckets with a diversity filter and padding to a full palette.
    Adaptive,
}

impl ExtractionStrategy {
    /// Returns the strategy used for a palette of (at most) `k` colors.
    ///
    /// A palette size of exactly `128` uses the fixed `16`-step frequency grid;
    /// only `256` uses the adaptive strategy.
    #[must_use]
    pub fn for_size(k: PaletteSize) -> Self {
        match k.get() {
            0..=2 => ExtractionStrategy::Luminance,
            k @ 3..=63 => ExtractionStrategy::Frequency {
                levels: frequency::levels_for(k),
                anchors: k <= ANCHOR_LIMIT,
            },
            64..=255 => ExtractionStrategy::Frequency { levels: 16, anchors: false },
            _ => ExtractionStrategy::Adaptive,
        }
    }
}

/// Makes sure `colors` has a near black and a near white color.
///
/// Missing anchors are appended while there is room,
/// otherwise they replace the least frequent (last) colors.
pub(crate) fn ensure_anchors(colors: &mut Vec<Srgb<u8>>, k: usize) {
    type Check = fn(Srgb<u8>) -> bool;
    let anchors: [(Srgb<u8>, Check, Check); 2] = [
        (BLACK, is_near_black, is_near_white),
        (WHITE, is_near_white, is_near_black),
    ];

    for (anchor, is_anchor, is_other) in anchors {
        if colors.iter().copied().any(is_anchor) {
            continue;
        }
        if colors.len() < k {
            colors.push(anchor);
        } else if let Some(i) = colors.iter().rposition(|&c| !is_other(c)) {
            colors[i] = anchor;
        }
    }
}

/// Runs the strategy for `k`, falling back to [`diverse_palette`] on failure.
fn extract(raster: &Raster, k: PaletteSize, count: CountFn) -> Palette {
    let strategy = ExtractionStrategy::for_size(k);
    log::debug!(
        "extracting {k} colors from {}x{} raster with {strategy:?}",
        raster.width(),
        raster.height()
    );

    let result = match strategy {
        ExtractionStrategy::Luminance => luminance::palette(raster),
        ExtractionStrategy::Frequency { levels, anchors } => {
            frequency::palette(raster, k.get(), levels, anchors, count)
        }
        ExtractionStrategy::Adaptive => adaptive::palette(raster, k.get(), count),
    };

    match result {
        Ok(colors) => {
            let mut palette = Palette::new(colors);
            palette.truncate(k.get());
            palette
        }
        Err(err) => {
            log::warn!("palette extraction failed ({err}), using a synthetic {k} color palette");
            diverse_palette(k)
        }
    }
}

/// Computes a palette of at most `k` colors for `raster`.
///
/// # Examples
/// ```
/// # use pixelette::{palette, PaletteSize, Raster};
/// # use palette::Srgba;
/// # fn main() -> Result<(), pixelette::Error> {
/// let raster = Raster::filled(32, 32, Srgba::new(200, 30, 30, 255))?;
/// let palette = palette(&raster, PaletteSize::from_clamped(8));
/// assert!(palette.len() <= 8);
/// assert!(palette.contains_near_black() && palette.contains_near_white());
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn palette(raster: &Raster, k: PaletteSize) -> Palette {
    extract(raster, k, Histogram::new)
}

/// Computes a palette of at most `k` colors for `raster`, counting colors in parallel.
///
/// The result is identical to [`palette`].
#[cfg(feature = "threads")]
#[must_use]
pub fn palette_par(raster: &Raster, k: PaletteSize) -> Palette {
    extract(raster, k, Histogram::new_par)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;
    use palette::Srgba;

    #[test]
    fn strategy_boundaries() {
        let strategy = |k| ExtractionStrategy::for_size(PaletteSize::from_clamped(k));
        assert_eq!(strategy(2), ExtractionStrategy::Luminance);
        assert_eq!(strategy(4), ExtractionStrategy::Frequency { levels: 3, anchors: true });
        assert_eq!(strategy(16), ExtractionStrategy::Frequency { levels: 4, anchors: true });
        assert_eq!(strategy(32), ExtractionStrategy::Frequency { levels: 5, anchors: false });
        assert_eq!(strategy(63), ExtractionStrategy::Frequency { levels: 6, anchors: false });
        assert_eq!(strategy(64), ExtractionStrategy::Frequency { levels: 16, anchors: false });
        assert_eq!(strategy(128), ExtractionStrategy::Frequency { levels: 16, anchors: false });
        assert_eq!(strategy(255), ExtractionStrategy::Frequency { levels: 16, anchors: false });
        assert_eq!(strategy(256), ExtractionStrategy::Adaptive);
    }

    #[test]
    fn anchors_fill_or_replace() {
        let mut colors = vec![Srgb::new(100, 0, 0)];
        ensure_anchors(&mut colors, 4);
        assert_eq!(colors, vec![Srgb::new(100, 0, 0), BLACK, WHITE]);

        let mut colors = vec![Srgb::new(100, 0, 0), Srgb::new(0, 100, 0)];
        ensure_anchors(&mut colors, 2);
        assert_eq!(colors, vec![WHITE, BLACK]);

        let mut colors = vec![Srgb::new(240, 240, 240), Srgb::new(0, 100, 0)];
        ensure_anchors(&mut colors, 2);
        assert_eq!(colors, vec![Srgb::new(240, 240, 240), BLACK]);

        let mut colors = vec![Srgb::new(5, 5, 5), Srgb::new(240, 240, 240)];
        ensure_anchors(&mut colors, 2);
        assert_eq!(colors, vec![Srgb::new(5, 5, 5), Srgb::new(240, 240, 240)]);
    }

    #[test]
    fn length_bounded_by_k() {
        let rasters = [
            test_raster(40, 30),
            Raster::filled(10, 10, Srgba::new(12, 200, 99, 255)).unwrap(),
            raster_from_colors(&[Srgb::new(1, 2, 3), Srgb::new(250, 2, 3)]),
        ];
        for raster in &rasters {
            for k in (2..=256).step_by(9).chain([128, 256]) {
                let k = PaletteSize::from_clamped(k);
                let palette = palette(raster, k);
                assert!(!palette.is_empty());
                assert!(palette.len() <= k.get(), "k = {k}");
            }
        }
    }

    #[test]
    fn small_palettes_have_black_and_white() {
        let rasters = [
            test_raster(40, 30),
            Raster::filled(100, 100, Srgba::new(255, 0, 0, 255)).unwrap(),
            Raster::filled(8, 8, Srgba::new(128, 128, 128, 255)).unwrap(),
            Raster::filled(8, 8, Srgba::new(128, 128, 128, 0)).unwrap(),
        ];
        for raster in &rasters {
            for k in 2..=16 {
                let palette = palette(raster, PaletteSize::from_clamped(k));
                assert!(palette.contains_near_black(), "k = {k}: {palette:?}");
                assert!(palette.contains_near_white(), "k = {k}: {palette:?}");
            }
        }
    }

    #[test]
    fn deterministic() {
        let raster = test_raster(50, 50);
        for k in PaletteSize::CHOICES {
            assert_eq!(palette(&raster, k), palette(&raster, k));
        }
    }

    #[test]
    fn transparent_image_uses_fallback() {
        let raster = Raster::filled(5, 5, Srgba::new(40, 90, 200, 0)).unwrap();
        for k in PaletteSize::CHOICES {
            assert_eq!(palette(&raster, k), diverse_palette(k));
        }
    }

    #[test]
    fn solid_red_two_colors() {
        let raster = Raster::filled(100, 100, Srgba::new(255, 0, 0, 255)).unwrap();
        let palette = palette(&raster, PaletteSize::MIN);
        assert_eq!(palette.len(), 2);
        assert!(palette[0].red <= 60 && palette[0].green == 0 && palette[0].blue == 0);
        assert!(palette[1].red >= palette[0].red + 195);
    }

    #[test]
    fn full_palette_is_full() {
        let palette = palette(&test_raster(64, 48), PaletteSize::MAX);
        assert_eq!(palette.len(), 256);
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let raster = test_raster(200, 150);
        for k in PaletteSize::CHOICES {
            assert_eq!(palette(&raster, k), palette_par(&raster, k));
        }
    }
}
