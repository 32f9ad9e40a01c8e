#![allow(dead_code)]

use std::sync::OnceLock;

use palette::Srgba;
use pixelette::Raster;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

/// A smooth gradient with seeded noise, loosely resembling a photo.
pub fn synthetic_raster(width: u32, height: u32, seed: u64) -> Raster {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
    let pixels = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let gx = (x * 255 / width.max(1)) as u8;
            let gy = (y * 255 / height.max(1)) as u8;
            let noise = rng.gen_range(-16i8..=16);
            Srgba::new(
                gx.saturating_add_signed(noise),
                gy.saturating_add_signed(noise),
                (gx / 2 + gy / 2).saturating_add_signed(-noise),
                255,
            )
        })
        .collect();

    Raster::from_pixels(width, height, pixels).expect("correctly sized buffer")
}

pub const SIZES: [(u32, u32); 3] = [(64, 64), (640, 480), (1920, 1080)];

static BENCHMARK_RASTERS: OnceLock<Vec<(String, Raster)>> = OnceLock::new();

pub fn benchmark_rasters() -> &'static [(String, Raster)] {
    BENCHMARK_RASTERS.get_or_init(|| {
        SIZES
            .iter()
            .zip(0..)
            .map(|(&(width, height), seed)| {
                (format!("{width}x{height}"), synthetic_raster(width, height, seed))
            })
            .collect()
    })
}
