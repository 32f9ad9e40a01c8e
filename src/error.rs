//! The error type shared by the fallible parts of the crate.
//!
//! Palette extraction and quantization recover from their own internal failures,
//! so the variants here only cover conditions that no fallback can fix.

use thiserror::Error;

/// Errors surfaced to callers of `pixelette`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The raster has a zero width or height.
    #[error("invalid image: {width}x{height} has no pixels")]
    InvalidImage {
        /// The width of the rejected raster.
        width: u32,
        /// The height of the rejected raster.
        height: u32,
    },

    /// A pixel buffer did not have the length implied by its dimensions.
    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    BufferSize {
        /// The number of bytes the dimensions require.
        expected: usize,
        /// The number of bytes that were supplied.
        actual: usize,
    },

    /// The drawing surface or encoder could not be read or written.
    #[error("render failure: {0}")]
    RenderFailure(String),

    /// The image source failed to produce a raster.
    #[error("image source failed: {0}")]
    Source(String),
}

/// A `Result` alias with [`Error`] as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(feature = "image")]
impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::RenderFailure(err.to_string())
    }
}
