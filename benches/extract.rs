#[path = "../util/util.rs"]
mod util;

use util::benchmark_rasters;

use std::time::Duration;

use criterion::{
    criterion_group, criterion_main, measurement::WallTime, Bencher, BenchmarkId, Criterion,
    SamplingMode,
};
use pixelette::{palette, palette_par, PaletteSize, Raster};

fn bench(
    c: &mut Criterion,
    group: &str,
    mut f: impl FnMut(&mut Bencher<WallTime>, &(PaletteSize, &Raster)),
) {
    let mut group = c.benchmark_group(group);
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_secs(2));

    for k in PaletteSize::CHOICES {
        for (name, raster) in benchmark_rasters() {
            group.bench_with_input(BenchmarkId::new(k.to_string(), name), &(k, raster), &mut f);
        }
    }
}

fn extract_single(c: &mut Criterion) {
    bench(c, "extract_single", |b, &(k, raster)| b.iter(|| palette(raster, k)));
}

fn extract_par(c: &mut Criterion) {
    bench(c, "extract_par", |b, &(k, raster)| b.iter(|| palette_par(raster, k)));
}

criterion_group!(benches, extract_single, extract_par);
criterion_main!(benches);
