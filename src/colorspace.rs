//! Color space conversions and the distance functions used to compare colors.
//!
//! HSL values use degrees for hue (`0.0..360.0`) and percentages for saturation and lightness
//! (`0.0..=100.0`).

use palette::{FromColor, Hsl, Srgb};

/// The channel weights used by [`rgb_distance_weighted`], following luminance sensitivity.
pub const RGB_WEIGHTS: [f32; 3] = [0.3, 0.59, 0.11];

/// Converts an sRGB color to `[hue, saturation, lightness]`.
///
/// The hue is `0.0` for achromatic colors.
#[must_use]
pub fn rgb_to_hsl(color: Srgb<u8>) -> [f32; 3] {
    let hsl: Hsl = Hsl::from_color(color.into_format::<f32>());
    let saturation = hsl.saturation * 100.0;
    let lightness = hsl.lightness * 100.0;

    let hue = if saturation <= f32::EPSILON {
        0.0
    } else {
        let hue = hsl.hue.into_positive_degrees();
        if hue >= 360.0 {
            hue - 360.0
        } else {
            hue
        }
    };

    [hue, saturation, lightness]
}

/// Converts `hue` (degrees), `saturation`, and `lightness` (percentages) to an sRGB color.
///
/// Hues outside of `0.0..360.0` wrap around, other components are clamped.
#[must_use]
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Srgb<u8> {
    let hsl: Hsl = Hsl::new(
        hue.rem_euclid(360.0),
        (saturation / 100.0).clamp(0.0, 1.0),
        (lightness / 100.0).clamp(0.0, 1.0),
    );
    let rgb: Srgb = Srgb::from_color(hsl);
    rgb.into_format()
}

/// A perceptual distance between two colors computed in HSL space.
///
/// Hue differences count more between saturated colors, saturation differences count more
/// around medium lightness, and lightness differences have a fixed weight.
/// The result is only meaningful relative to other distances.
#[must_use]
pub fn perceptual_distance(a: Srgb<u8>, b: Srgb<u8>) -> f32 {
    let [h1, s1, l1] = rgb_to_hsl(a);
    let [h2, s2, l2] = rgb_to_hsl(b);

    let mut hue_diff = (h1 - h2).abs();
    if hue_diff > 180.0 {
        hue_diff = 360.0 - hue_diff;
    }
    let hue_diff = hue_diff / 180.0;
    let sat_diff = (s1 - s2).abs() / 100.0;
    let light_diff = (l1 - l2).abs() / 100.0;

    let hue_weight = (s1 + s2) / 200.0 * 2.0;
    let mid_lightness = 1.0 - (((l1 + l2) / 2.0) - 50.0).abs() / 50.0;
    let sat_weight = 1.5 * mid_lightness;
    let light_weight = 2.0;

    let h = hue_diff * hue_weight;
    let s = sat_diff * sat_weight;
    let l = light_diff * light_weight;
    (h * h + s * s + l * l).sqrt()
}

/// The channel-weighted squared euclidean distance between two points in RGB space.
#[inline]
#[must_use]
pub fn weighted_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let mut dist = 0.0;
    for c in 0..3 {
        let d = a[c] - b[c];
        dist += RGB_WEIGHTS[c] * d * d;
    }
    dist
}

/// The channel-weighted squared euclidean distance between two colors:
/// `0.3·Δr² + 0.59·Δg² + 0.11·Δb²`.
#[inline]
#[must_use]
pub fn rgb_distance_weighted(a: Srgb<u8>, b: Srgb<u8>) -> f32 {
    weighted_distance(to_f32(a), to_f32(b))
}

/// Converts the components of a color to `f32`.
#[inline]
pub(crate) fn to_f32(color: Srgb<u8>) -> [f32; 3] {
    [color.red, color.green, color.blue].map(f32::from)
}

/// Luminance as used for splitting images into dark and light pixels.
#[inline]
pub(crate) fn luminance(color: Srgb<u8>) -> f32 {
    0.299 * f32::from(color.red) + 0.587 * f32::from(color.green) + 0.114 * f32::from(color.blue)
}
