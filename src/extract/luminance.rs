//! Two color palettes from splitting the image at its mean luminance.

use super::{ExtractionFailure, BLACK, WHITE};
use crate::{colorspace::luminance, is_near_black, is_near_white, Raster};
use palette::Srgb;

/// How far the dark and light averages are pushed towards black and white.
const PUSH: u8 = 60;

/// Running color sums for one side of the split.
#[derive(Default)]
struct Average {
    /// The summed components.
    sum: [u64; 3],
    /// The number of colors added.
    count: u64,
}

impl Average {
    fn add(&mut self, color: Srgb<u8>) {
        self.sum[0] += u64::from(color.red);
        self.sum[1] += u64::from(color.green);
        self.sum[2] += u64::from(color.blue);
        self.count += 1;
    }

    fn color(&self) -> Option<Srgb<u8>> {
        if self.count == 0 {
            return None;
        }
        let n = self.count;
        #[allow(clippy::cast_possible_truncation)]
        let [red, green, blue] = self.sum.map(|s| ((s + n / 2) / n) as u8);
        Some(Srgb::new(red, green, blue))
    }
}

/// Darkens `color` by [`PUSH`] unless every channel is already at most [`PUSH`].
fn push_dark(color: Srgb<u8>) -> Srgb<u8> {
    if color.red > PUSH || color.green > PUSH || color.blue > PUSH {
        Srgb::new(
            color.red.saturating_sub(PUSH),
            color.green.saturating_sub(PUSH),
            color.blue.saturating_sub(PUSH),
        )
    } else {
        color
    }
}

/// Lightens `color` by [`PUSH`] unless every channel is already at least `200`.
fn push_light(color: Srgb<u8>) -> Srgb<u8> {
    if color.red < 200 || color.green < 200 || color.blue < 200 {
        Srgb::new(
            color.red.saturating_add(PUSH),
            color.green.saturating_add(PUSH),
            color.blue.saturating_add(PUSH),
        )
    } else {
        color
    }
}

/// Splits the opaque pixels at their mean luminance and returns `[dark, light]`.
///
/// Both averages are pushed apart. If a pushed average still does not qualify as near black
/// (or near white), it is replaced with pure black (or white) so that the palette always
/// carries both anchors.
pub(super) fn palette(raster: &Raster) -> Result<Vec<Srgb<u8>>, ExtractionFailure> {
    let mut total = 0.0;
    let mut n = 0u64;
    for color in raster.opaque_colors() {
        total += f64::from(luminance(color));
        n += 1;
    }

    if n == 0 {
        return Err(ExtractionFailure::NoOpaquePixels);
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = total / n as f64;

    let mut dark = Average::default();
    let mut light = Average::default();
    for color in raster.opaque_colors() {
        if f64::from(luminance(color)) < mean {
            dark.add(color);
        } else {
            light.add(color);
        }
    }

    let dark = dark.color().map_or(BLACK, push_dark);
    let light = light.color().map_or(WHITE, push_light);

    log::trace!("luminance split at {mean:.1}: dark {dark:?}, light {light:?}");

    let dark = if is_near_black(dark) { dark } else { BLACK };
    let light = if is_near_white(light) { light } else { WHITE };

    Ok(vec![dark, light])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn push_limits() {
        assert_eq!(push_dark(Srgb::new(100, 20, 70)), Srgb::new(40, 0, 10));
        assert_eq!(push_dark(Srgb::new(60, 60, 60)), Srgb::new(60, 60, 60));
        assert_eq!(push_light(Srgb::new(230, 180, 250)), Srgb::new(255, 240, 255));
        assert_eq!(push_light(Srgb::new(200, 200, 200)), Srgb::new(200, 200, 200));
    }

    #[test]
    fn solid_image_has_no_dark_half() {
        // uniform luminance puts every pixel at or above the mean
        let raster = Raster::filled(100, 100, palette::Srgba::new(255, 0, 0, 255)).unwrap();
        let [dark, light]: [Srgb<u8>; 2] = palette(&raster).unwrap().try_into().unwrap();
        assert!(dark.red <= 60 && dark.green == 0 && dark.blue == 0);
        assert!(is_near_white(light));
    }

    #[test]
    fn high_contrast_keeps_averages() {
        let raster = raster_from_colors(&[
            Srgb::new(10, 10, 20),
            Srgb::new(20, 10, 10),
            Srgb::new(240, 250, 240),
            Srgb::new(250, 240, 250),
        ]);
        let colors = palette(&raster).unwrap();
        assert_eq!(colors, vec![Srgb::new(15, 10, 15), Srgb::new(245, 245, 245)]);
    }

    #[test]
    fn pushed_average_can_stay() {
        // dark half averages to (70, 20, 20) and is pushed to (10, 0, 0)
        let raster = raster_from_colors(&[Srgb::new(70, 20, 20), Srgb::new(255, 255, 255)]);
        let colors = palette(&raster).unwrap();
        assert_eq!(colors, vec![Srgb::new(10, 0, 0), Srgb::new(255, 255, 255)]);
    }

    #[test]
    fn transparent_image_fails() {
        let raster = Raster::filled(4, 4, palette::Srgba::new(0, 0, 0, 0)).unwrap();
        assert_eq!(palette(&raster), Err(ExtractionFailure::NoOpaquePixels));
    }
}
