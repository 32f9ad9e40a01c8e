//! Nearest color mapping without dithering.

use crate::{
    colorspace::{to_f32, weighted_distance},
    Raster,
};
use ordered_float::OrderedFloat;
use palette::{Alpha, Srgb, Srgba};

/// Returns the index of the palette color nearest to `point` by
/// [`weighted_distance`](crate::colorspace::weighted_distance).
///
/// Ties keep the earliest palette color. Returns `None` for an empty palette.
#[must_use]
pub fn nearest_index(palette: &[[f32; 3]], point: [f32; 3]) -> Option<usize> {
    // min_by_key keeps the first of equal minimums
    palette
        .iter()
        .enumerate()
        .min_by_key(|&(_, &color)| OrderedFloat(weighted_distance(color, point)))
        .map(|(i, _)| i)
}

/// Returns the index of the palette color nearest to `color`, or `None` for an empty palette.
#[must_use]
pub fn nearest_color(palette: &[Srgb<u8>], color: Srgb<u8>) -> Option<usize> {
    let points = palette.iter().copied().map(to_f32).collect::<Vec<_>>();
    nearest_index(&points, to_f32(color))
}

/// Replaces the color of every pixel with its nearest palette color, keeping alpha.
///
/// Returns the pixels unchanged if `palette` is empty.
#[must_use]
pub fn remap(raster: &Raster, palette: &[Srgb<u8>]) -> Vec<Srgba<u8>> {
    let points = palette.iter().copied().map(to_f32).collect::<Vec<_>>();
    raster
        .pixels()
        .iter()
        .map(|&pixel| match nearest_index(&points, to_f32(pixel.color)) {
            Some(i) => Alpha { color: palette[i], alpha: pixel.alpha },
            None => pixel,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn dark_pixel_maps_to_black() {
        let palette = [Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)];
        assert_eq!(nearest_color(&palette, Srgb::new(10, 10, 10)), Some(0));
        assert_eq!(nearest_color(&palette, Srgb::new(200, 200, 200)), Some(1));
        assert_eq!(nearest_color(&[], Srgb::new(200, 200, 200)), None);
    }

    #[test]
    fn ties_keep_first() {
        let palette = [Srgb::new(0, 0, 0), Srgb::new(20, 20, 20), Srgb::new(0, 0, 0)];
        assert_eq!(
            nearest_index(
                &palette.map(to_f32),
                to_f32(Srgb::new(10, 10, 10))
            ),
            Some(0)
        );
    }

    #[test]
    fn output_colors_are_palette_members() {
        let raster = test_raster(16, 16);
        let palette = [
            Srgb::new(0, 0, 0),
            Srgb::new(255, 255, 255),
            Srgb::new(200, 30, 30),
            Srgb::new(30, 200, 30),
        ];
        let out = remap(&raster, &palette);
        assert_eq!(out.len(), raster.pixels().len());
        for (o, p) in out.iter().zip(raster.pixels()) {
            assert!(palette.contains(&o.color));
            assert_eq!(o.alpha, p.alpha);
        }
    }

    #[test]
    fn transparent_stays_transparent() {
        let raster = Raster::filled(2, 2, Srgba::new(250, 250, 250, 0)).unwrap();
        let out = remap(&raster, &[Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)]);
        assert!(out.iter().all(|&p| p == Srgba::new(255, 255, 255, 0)));
    }
}
