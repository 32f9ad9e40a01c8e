//! Synthetic palettes that do not depend on any image.
//!
//! These are used whenever extraction fails, and can be requested directly through
//! [`diverse_palette`](crate::diverse_palette).

use super::{BLACK, WHITE};
use crate::{colorspace::hsl_to_rgb, Palette, PaletteSize};
use palette::Srgb;

/// Red, green, and blue.
const PRIMARIES: [Srgb<u8>; 3] = [
    Srgb::new(255, 0, 0),
    Srgb::new(0, 255, 0),
    Srgb::new(0, 0, 255),
];

/// Yellow, cyan, and magenta.
const SECONDARIES: [Srgb<u8>; 3] = [
    Srgb::new(255, 255, 0),
    Srgb::new(0, 255, 255),
    Srgb::new(255, 0, 255),
];

/// Orange, chartreuse, spring green, azure, violet, and rose.
const TERTIARIES: [Srgb<u8>; 6] = [
    Srgb::new(255, 128, 0),
    Srgb::new(128, 255, 0),
    Srgb::new(0, 255, 128),
    Srgb::new(0, 128, 255),
    Srgb::new(128, 0, 255),
    Srgb::new(255, 0, 128),
];

/// Whether every channel of `a` is within `tolerance` of `b`.
fn is_close(a: Srgb<u8>, b: Srgb<u8>, tolerance: u8) -> bool {
    a.red.abs_diff(b.red) <= tolerance
        && a.green.abs_diff(b.green) <= tolerance
        && a.blue.abs_diff(b.blue) <= tolerance
}

/// Appends `count` evenly spaced grays from black to white.
fn push_gray_ramp(palette: &mut Palette, count: u16) {
    for i in 0..count {
        #[allow(clippy::cast_possible_truncation)]
        let v = (u32::from(i) * 255 / u32::from(count - 1)) as u8;
        palette.push_unique(Srgb::new(v, v, v));
    }
}

/// Appends a grid of `hues` evenly spaced hues for each saturation and lightness.
fn push_hsl_grid(palette: &mut Palette, hues: u16, saturations: &[f32], lightnesses: &[f32]) {
    let step = 360.0 / f32::from(hues);
    for h in 0..hues {
        for &saturation in saturations {
            for &lightness in lightnesses {
                palette.push_unique(hsl_to_rgb(f32::from(h) * step, saturation, lightness));
            }
        }
    }
}

/// The palette for `k >= 256`.
fn full(palette: &mut Palette, k: usize) {
    push_hsl_grid(palette, 18, &[100.0, 70.0, 40.0], &[30.0, 50.0, 70.0]);
    push_gray_ramp(palette, 24);
    for color in PRIMARIES.into_iter().chain(SECONDARIES) {
        palette.push_unique(color);
    }

    'sweep: for lightness in [40.0, 60.0, 20.0, 80.0] {
        for saturation in [85.0, 55.0] {
            for hue in (0..360u16).step_by(10) {
                if palette.len() >= k {
                    break 'sweep;
                }
                palette.push_unique(hsl_to_rgb(f32::from(hue), saturation, lightness));
            }
        }
    }
}

/// The palette for `128 <= k < 256`.
fn dense(palette: &mut Palette, k: usize) {
    push_hsl_grid(palette, 24, &[100.0, 75.0, 50.0, 25.0], &[25.0, 50.0, 75.0]);

    for hue in (0..360u16).step_by(30) {
        let hue = f32::from(hue);
        palette.push_unique(hsl_to_rgb(hue, 100.0, 50.0));
        palette.push_unique(hsl_to_rgb(hue, 100.0, 30.0));
        palette.push_unique(hsl_to_rgb(hue, 100.0, 70.0));
    }

    push_gray_ramp(palette, 32);

    'sweep: for lightness in [40.0, 60.0, 20.0, 80.0] {
        for hue in (0..360u16).step_by(5) {
            if palette.len() >= k {
                break 'sweep;
            }
            let color = hsl_to_rgb(f32::from(hue), 80.0, lightness);
            if !palette.iter().any(|&c| is_close(c, color, 8)) {
                palette.push_unique(color);
            }
        }
    }
}

/// The palette for `k < 128`.
fn small(palette: &mut Palette, k: usize) {
    for color in PRIMARIES.into_iter().chain(SECONDARIES).chain(TERTIARIES) {
        palette.push_unique(color);
    }
    for v in [64, 128, 192] {
        palette.push_unique(Srgb::new(v, v, v));
    }

    for lightness in [35.0, 65.0, 50.0, 25.0, 75.0] {
        let remaining = k.saturating_sub(palette.len());
        if remaining == 0 {
            break;
        }

        #[allow(clippy::cast_precision_loss)]
        let step = 360.0 / remaining as f32;
        for i in 0..remaining {
            #[allow(clippy::cast_precision_loss)]
            let hue = (i as f32 + 0.5) * step;
            palette.push_unique(hsl_to_rgb(hue, 100.0, lightness));
        }
    }
}

/// Creates a deterministic palette of exactly `k` unique colors
/// that spreads across hues, saturations, and lightnesses.
///
/// The palette always starts with black and white.
///
/// # Examples
/// ```
/// # use pixelette::{diverse_palette, PaletteSize};
/// # use palette::Srgb;
/// let palette = diverse_palette(PaletteSize::from_clamped(8));
/// assert_eq!(palette.len(), 8);
/// assert_eq!(&palette[..2], &[Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)]);
/// ```
#[must_use]
pub fn diverse_palette(k: PaletteSize) -> Palette {
    let k = k.get();
    let mut palette = Palette::new_unchecked(vec![BLACK, WHITE]);

    if k >= 256 {
        full(&mut palette, k);
    } else if k >= 128 {
        dense(&mut palette, k);
    } else {
        small(&mut palette, k);
    }

    for v in 0..=255u8 {
        if palette.len() >= k {
            break;
        }
        palette.push_unique(Srgb::new(v, v, v));
    }

    palette.truncate(k);
    palette
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_size_and_unique() {
        for k in (2..=256).step_by(7).chain([128, 255, 256]) {
            let k = PaletteSize::from_clamped(k);
            let palette = diverse_palette(k);
            assert_eq!(palette.len(), k.get(), "k = {k}");
            assert_eq!(Palette::new(palette.to_vec()), palette, "k = {k}");
            assert_eq!(&palette[..2], &[BLACK, WHITE]);
        }
    }

    #[test]
    fn small_palette_order() {
        let palette = diverse_palette(PaletteSize::from_clamped(17));
        let expected = [BLACK, WHITE]
            .into_iter()
            .chain(PRIMARIES)
            .chain(SECONDARIES)
            .chain(TERTIARIES)
            .chain([64, 128, 192].map(|v| Srgb::new(v, v, v)))
            .collect::<Vec<_>>();
        assert_eq!(palette.as_slice(), expected.as_slice());
    }

    #[test]
    fn deterministic() {
        for k in PaletteSize::CHOICES {
            assert_eq!(diverse_palette(k), diverse_palette(k));
        }
    }

    #[test]
    fn closeness() {
        assert!(is_close(Srgb::new(10, 10, 10), Srgb::new(18, 2, 10), 8));
        assert!(!is_close(Srgb::new(10, 10, 10), Srgb::new(19, 10, 10), 8));
    }
}
