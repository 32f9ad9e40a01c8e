//! Bucketed color counts used by the frequency based extraction strategies.
//!
//! Each opaque pixel is assigned to a bucket (a cell of a grid over RGB space).
//! Buckets keep the sum of their colors, their hit count, and the index of the first pixel
//! that landed in them. Ordering by descending count and then by first pixel index gives a
//! deterministic order that does not depend on how the counting was split across threads.

use crate::{Raster, ALPHA_THRESHOLD};
use palette::{Srgb, Srgba};
#[cfg(feature = "threads")]
use rayon::prelude::*;
use std::cmp::Reverse;

/// The number of pixels each parallel task counts.
#[cfg(feature = "threads")]
const CHUNK_SIZE: usize = 4096;

/// Assigns colors to histogram buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Binner {
    /// Splits every channel into `levels` equal parts of `256 / levels`.
    Uniform {
        /// The number of levels per channel.
        levels: u32,
    },
    /// Splits each channel's observed `min..=max` range into its own number of levels.
    Adaptive {
        /// The smallest observed value of each channel.
        min: [u8; 3],
        /// The largest observed value of each channel.
        max: [u8; 3],
        /// The number of levels of each channel.
        levels: [u32; 3],
    },
}

impl Binner {
    /// The total number of buckets.
    pub(crate) fn num_bins(self) -> usize {
        match self {
            Binner::Uniform { levels } => (levels * levels * levels) as usize,
            Binner::Adaptive { levels, .. } => levels.iter().product::<u32>() as usize,
        }
    }

    /// The bucket index of `color`.
    #[inline]
    pub(crate) fn bin(self, color: Srgb<u8>) -> usize {
        let components = [color.red, color.green, color.blue];
        match self {
            Binner::Uniform { levels } => {
                let [r, g, b] = components.map(|c| u32::from(c) * levels / 256);
                ((r * levels + g) * levels + b) as usize
            }
            Binner::Adaptive { min, max, levels } => {
                let mut key = 0;
                for c in 0..3 {
                    let value = components[c].clamp(min[c], max[c]) - min[c];
                    let range = u32::from(max[c] - min[c]) + 1;
                    let level = u32::from(value) * levels[c] / range;
                    key = key * levels[c] + level;
                }
                key as usize
            }
        }
    }
}

/// A bucket that was hit at least once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bucket {
    /// The average color of the pixels in the bucket.
    pub(crate) color: Srgb<u8>,
    /// The number of pixels in the bucket.
    pub(crate) count: u64,
    /// The index of the first pixel in the bucket.
    pub(crate) first_seen: usize,
}

/// Per-bucket color sums, counts, and first occurrences.
#[derive(Debug, Clone)]
pub(crate) struct Histogram {
    /// The summed components of each bucket.
    sums: Vec<[u64; 3]>,
    /// The number of pixels in each bucket.
    counts: Vec<u64>,
    /// The smallest pixel index of each bucket, `usize::MAX` for empty buckets.
    first_seen: Vec<usize>,
}

impl Histogram {
    /// Creates an empty histogram with `len` buckets.
    fn zeroed(len: usize) -> Self {
        Self {
            sums: vec![[0; 3]; len],
            counts: vec![0; len],
            first_seen: vec![usize::MAX; len],
        }
    }

    /// Adds the opaque pixels in `pixels`, where the first pixel has index `offset` in the raster.
    fn add_pixels(&mut self, binner: Binner, offset: usize, pixels: &[Srgba<u8>]) {
        for (i, pixel) in pixels.iter().enumerate() {
            if pixel.alpha < ALPHA_THRESHOLD {
                continue;
            }

            let color = pixel.color;
            let bin = binner.bin(color);
            if self.counts[bin] == 0 {
                self.first_seen[bin] = offset + i;
            }
            self.counts[bin] += 1;
            let sum = &mut self.sums[bin];
            sum[0] += u64::from(color.red);
            sum[1] += u64::from(color.green);
            sum[2] += u64::from(color.blue);
        }
    }

    /// Counts the opaque pixels of `raster`.
    pub(crate) fn new(raster: &Raster, binner: Binner) -> Self {
        let mut hist = Self::zeroed(binner.num_bins());
        hist.add_pixels(binner, 0, raster.pixels());
        hist
    }

    /// Counts the opaque pixels of `raster` in parallel.
    #[cfg(feature = "threads")]
    pub(crate) fn new_par(raster: &Raster, binner: Binner) -> Self {
        let len = binner.num_bins();
        raster
            .pixels()
            .par_chunks(CHUNK_SIZE)
            .enumerate()
            .fold(
                || Self::zeroed(len),
                |mut hist, (chunk, pixels)| {
                    hist.add_pixels(binner, chunk * CHUNK_SIZE, pixels);
                    hist
                },
            )
            .reduce(|| Self::zeroed(len), Self::merge)
    }

    /// Combines the counts of two histograms over the same buckets.
    #[cfg(feature = "threads")]
    fn merge(mut self, other: Self) -> Self {
        for (i, count) in other.counts.into_iter().enumerate() {
            if count == 0 {
                continue;
            }
            self.counts[i] += count;
            self.first_seen[i] = self.first_seen[i].min(other.first_seen[i]);
            for c in 0..3 {
                self.sums[i][c] += other.sums[i][c];
            }
        }
        self
    }

    /// Returns the non-empty buckets sorted by descending count,
    /// with ties broken by which bucket was hit first.
    pub(crate) fn buckets(&self) -> Vec<Bucket> {
        let mut buckets = self
            .counts
            .iter()
            .zip(&self.sums)
            .zip(&self.first_seen)
            .filter(|((&count, _), _)| count > 0)
            .map(|((&count, sum), &first_seen)| {
                let n = count;
                #[allow(clippy::cast_possible_truncation)]
                let [red, green, blue] = sum.map(|s| ((s + n / 2) / n) as u8);
                Bucket {
                    color: Srgb::new(red, green, blue),
                    count,
                    first_seen,
                }
            })
            .collect::<Vec<_>>();

        buckets.sort_by_key(|b| (Reverse(b.count), b.first_seen));
        buckets
    }
}
