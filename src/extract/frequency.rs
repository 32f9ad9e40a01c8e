//! Palettes made of the most common colors after snapping pixels to a coarse grid.

use super::{ensure_anchors, histogram::Binner, CountFn, ExtractionFailure};
use crate::Raster;
use palette::Srgb;

/// The number of levels per channel used to pre-quantize pixels for a palette of `k` colors.
#[must_use]
pub(super) fn levels_for(k: usize) -> u32 {
    match k {
        0..=8 => 3,
        9..=16 => 4,
        17..=32 => 5,
        _ => 6,
    }
}

/// Returns (at most) the `k` most frequent bucket colors.
///
/// If `anchors` is set, black and white are added or swapped in for the least frequent colors.
pub(super) fn palette(
    raster: &Raster,
    k: usize,
    levels: u32,
    anchors: bool,
    count: CountFn,
) -> Result<Vec<Srgb<u8>>, ExtractionFailure> {
    let buckets = count(raster, Binner::Uniform { levels }).buckets();
    if buckets.is_empty() {
        return Err(ExtractionFailure::NoOpaquePixels);
    }

    log::debug!(
        "{} buckets at {levels} levels per channel for {k} colors",
        buckets.len()
    );

    let mut colors = buckets.iter().take(k).map(|b| b.color).collect::<Vec<_>>();
    if anchors {
        ensure_anchors(&mut colors, k);
    }
    Ok(colors)
}
