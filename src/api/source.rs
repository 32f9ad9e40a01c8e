//! Asynchronous providers of [`Raster`]s.

use crate::{Raster, Result};
#[cfg(feature = "image")]
use {crate::Error, std::path::PathBuf};

/// Something that can asynchronously produce a [`Raster`], like a file, a network fetch, or a
/// decoded upload.
///
/// Timeouts and retries are up to the implementation.
#[allow(async_fn_in_trait)]
pub trait ImageSource {
    /// Loads the raster.
    ///
    /// # Errors
    /// Returns an error if the raster could not be produced,
    /// usually [`Error::Source`](crate::Error::Source).
    async fn load(&self) -> Result<Raster>;
}

impl ImageSource for Raster {
    async fn load(&self) -> Result<Raster> {
        Ok(self.clone())
    }
}

/// An [`ImageSource`] that decodes an image file with the `image` crate.
///
/// Decoding happens on the calling task.
#[cfg(feature = "image")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    /// The path of the image file.
    path: PathBuf,
}

#[cfg(feature = "image")]
impl FileSource {
    /// Creates a source for the image at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(feature = "image")]
impl ImageSource for FileSource {
    async fn load(&self) -> Result<Raster> {
        let image = image::open(&self.path)
            .map_err(|err| Error::Source(format!("{}: {err}", self.path.display())))?;
        log::debug!("decoded {} ({}x{})", self.path.display(), image.width(), image.height());
        Raster::try_from(image.into_rgba8())
    }
}
