//! Area resampling from an arbitrary raster down to the grid size.

use crate::{Raster, GRID_SIZE};
use palette::Srgba;

/// The source range `[start, end)` covered by target cell `i`
/// of `target` cells over `source` pixels.
///
/// When the source is smaller than the target, this degrades to nearest sampling.
#[allow(clippy::cast_possible_truncation)]
fn span(i: u32, target: u32, source: u32) -> (u32, u32) {
    let start = (u64::from(i) * u64::from(source) / u64::from(target)) as u32;
    let end = ((u64::from(i) + 1) * u64::from(source) / u64::from(target)) as u32;
    (start, end.max(start + 1).min(source))
}

/// Resizes `raster` to `width` by `height` by averaging the source pixels covered by each
/// target pixel.
///
/// Color is averaged weighted by alpha, so transparent pixels do not bleed into their
/// neighbors. Alpha itself is the plain average.
///
/// # Panics
/// Panics if `width` or `height` is zero.
#[must_use]
pub fn resize_area(raster: &Raster, width: u32, height: u32) -> Raster {
    assert!(width > 0 && height > 0, "target dimensions must be non-zero");

    let src_width = raster.width() as usize;
    let pixels = raster.pixels();
    let mut out = Vec::with_capacity(width as usize * height as usize);

    for ty in 0..height {
        let (y0, y1) = span(ty, height, raster.height());
        for tx in 0..width {
            let (x0, x1) = span(tx, width, raster.width());

            let mut rgb = [0u64; 3];
            let mut alpha = 0u64;
            let mut n = 0u64;
            for y in y0..y1 {
                let row = &pixels[y as usize * src_width..][..src_width];
                for p in &row[x0 as usize..x1 as usize] {
                    let a = u64::from(p.alpha);
                    rgb[0] += u64::from(p.red) * a;
                    rgb[1] += u64::from(p.green) * a;
                    rgb[2] += u64::from(p.blue) * a;
                    alpha += a;
                    n += 1;
                }
            }

            #[allow(clippy::cast_possible_truncation)]
            let pixel = if alpha == 0 {
                Srgba::new(0, 0, 0, 0)
            } else {
                let [r, g, b] = rgb.map(|c| ((c + alpha / 2) / alpha) as u8);
                Srgba::new(r, g, b, ((alpha + n / 2) / n) as u8)
            };
            out.push(pixel);
        }
    }

    #[allow(clippy::expect_used)]
    {
        // the buffer has exactly width * height pixels by construction
        Raster::from_pixels(width, height, out).expect("correctly sized buffer")
    }
}

/// Resizes `raster` to [`GRID_SIZE`] by [`GRID_SIZE`] pixels with [`resize_area`].
#[must_use]
pub fn downsample(raster: &Raster) -> Raster {
    resize_area(raster, GRID_SIZE, GRID_SIZE)
}
