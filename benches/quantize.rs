#[path = "../util/util.rs"]
mod util;

use util::benchmark_rasters;

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};
use pixelette::{palette, quantize_with, resample::downsample, DitherMode, PaletteSize};

fn quantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize");
    group
        .sample_size(50)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_secs(2));

    for k in [PaletteSize::MAX, PaletteSize::DEFAULT] {
        for (name, raster) in benchmark_rasters() {
            let palette = palette(raster, k);
            for mode in [DitherMode::Always, DitherMode::Never] {
                group.bench_with_input(
                    BenchmarkId::new(format!("{k}/{mode}"), name),
                    &(raster, &palette),
                    |b, &(raster, palette)| b.iter(|| quantize_with(raster, palette, mode)),
                );
            }
        }
    }
}

fn resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("downsample");
    group.sample_size(50).warm_up_time(Duration::from_secs(2));

    for (name, raster) in benchmark_rasters() {
        group.bench_with_input(BenchmarkId::from_parameter(name), raster, |b, raster| {
            b.iter(|| downsample(raster));
        });
    }
}

criterion_group!(benches, quantize, resample);
criterion_main!(benches);
