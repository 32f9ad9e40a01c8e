//! The fixed size pixel-art buffer.

use crate::{Error, Raster, Result, GRID_CELLS, GRID_SIZE};
use palette::{cast, Srgba};
#[cfg(feature = "image")]
use image::RgbaImage;

/// A fully transparent pixel.
#[inline]
#[must_use]
pub fn transparent() -> Srgba<u8> {
    Srgba::new(0, 0, 0, 0)
}

/// A [`GRID_SIZE`] by [`GRID_SIZE`] grid of RGBA cells, stored in row-major order.
///
/// Coordinates are `(x, y)` with `(0, 0)` at the top left.
/// Accessors return `None` or ignore writes for coordinates outside of the grid.
#[derive(Clone, Copy, PartialEq)]
pub struct PixelGrid {
    /// The cells in row-major order.
    cells: [Srgba<u8>; GRID_CELLS],
}

impl std::fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelGrid")
            .field("cells", &self.cells.as_slice())
            .finish()
    }
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::filled(transparent())
    }
}

impl PixelGrid {
    /// The index of `(x, y)` into the cell array, if it is in bounds.
    #[inline]
    fn index(x: u32, y: u32) -> Option<usize> {
        (x < GRID_SIZE && y < GRID_SIZE).then(|| (y * GRID_SIZE + x) as usize)
    }

    /// Creates a grid where every cell is `color`.
    #[must_use]
    pub fn filled(color: Srgba<u8>) -> Self {
        Self { cells: [color; GRID_CELLS] }
    }

    /// Creates a grid from exactly [`GRID_CELLS`] pixels.
    ///
    /// # Errors
    /// Returns [`Error::BufferSize`] if `pixels` has the wrong length.
    pub fn from_pixels(pixels: &[Srgba<u8>]) -> Result<Self> {
        let cells = pixels.try_into().map_err(|_| Error::BufferSize {
            expected: GRID_CELLS * 4,
            actual: pixels.len() * 4,
        })?;
        Ok(Self { cells })
    }

    /// Creates a grid from exactly `GRID_CELLS * 4` RGBA bytes.
    ///
    /// # Errors
    /// Returns [`Error::BufferSize`] if `bytes` has the wrong length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != GRID_CELLS * 4 {
            return Err(Error::BufferSize {
                expected: GRID_CELLS * 4,
                actual: bytes.len(),
            });
        }

        let mut grid = Self::default();
        for (cell, p) in grid.cells.iter_mut().zip(bytes.chunks_exact(4)) {
            *cell = Srgba::new(p[0], p[1], p[2], p[3]);
        }
        Ok(grid)
    }

    /// The cell at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Srgba<u8>> {
        Self::index(x, y).map(|i| self.cells[i])
    }

    /// Sets the cell at `(x, y)`, returning whether the cell changed.
    pub fn set(&mut self, x: u32, y: u32, color: Srgba<u8>) -> bool {
        match Self::index(x, y) {
            Some(i) if self.cells[i] != color => {
                self.cells[i] = color;
                true
            }
            _ => false,
        }
    }

    /// Sets every cell to `color`.
    pub fn fill(&mut self, color: Srgba<u8>) {
        self.cells = [color; GRID_CELLS];
    }

    /// The cells in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Srgba<u8>] {
        &self.cells
    }

    /// The cells as mutable row-major slice.
    pub(crate) fn pixels_mut(&mut self) -> &mut [Srgba<u8>] {
        &mut self.cells
    }

    /// The cells as a flat slice of RGBA bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        cast::into_component_slice(&self.cells)
    }

    /// Converts the grid into a [`Raster`].
    #[must_use]
    pub fn to_raster(&self) -> Raster {
        #[allow(clippy::expect_used)]
        {
            // a grid always has exactly GRID_SIZE * GRID_SIZE cells
            Raster::from_pixels(GRID_SIZE, GRID_SIZE, self.cells.to_vec()).expect("grid sized")
        }
    }

    /// Converts the grid into an [`RgbaImage`].
    #[cfg(feature = "image")]
    #[must_use]
    pub fn to_rgba_image(&self) -> RgbaImage {
        #[allow(clippy::expect_used)]
        {
            // the byte buffer always holds GRID_SIZE * GRID_SIZE pixels
            RgbaImage::from_vec(GRID_SIZE, GRID_SIZE, self.as_bytes().to_vec())
                .expect("large enough buffer")
        }
    }
}

impl TryFrom<&Raster> for PixelGrid {
    type Error = Error;

    fn try_from(raster: &Raster) -> Result<Self> {
        if raster.width() == GRID_SIZE && raster.height() == GRID_SIZE {
            Self::from_pixels(raster.pixels())
        } else {
            Err(Error::BufferSize {
                expected: GRID_CELLS * 4,
                actual: raster.pixels().len() * 4,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        let mut grid = PixelGrid::default();
        let red = Srgba::new(255, 0, 0, 255);

        assert!(grid.set(15, 15, red));
        assert!(!grid.set(15, 15, red));
        assert!(!grid.set(16, 0, red));
        assert!(!grid.set(0, 16, red));

        assert_eq!(grid.get(15, 15), Some(red));
        assert_eq!(grid.get(16, 15), None);
        assert_eq!(grid.pixels()[255], red);
        assert_eq!(grid.pixels().iter().filter(|&&p| p == red).count(), 1);
    }

    #[test]
    fn byte_layout() {
        let mut grid = PixelGrid::default();
        grid.set(1, 0, Srgba::new(1, 2, 3, 4));
        assert_eq!(&grid.as_bytes()[4..8], &[1, 2, 3, 4]);

        let copy = PixelGrid::from_bytes(grid.as_bytes()).unwrap();
        assert_eq!(copy, grid);

        assert_eq!(
            PixelGrid::from_bytes(&[0; 12]),
            Err(Error::BufferSize { expected: 1024, actual: 12 })
        );
    }

    #[test]
    fn raster_conversion() {
        let grid = PixelGrid::filled(Srgba::new(9, 8, 7, 255));
        let raster = grid.to_raster();
        assert_eq!((raster.width(), raster.height()), (16, 16));
        assert_eq!(PixelGrid::try_from(&raster).unwrap(), grid);

        let wrong = Raster::filled(4, 4, transparent()).unwrap();
        assert!(PixelGrid::try_from(&wrong).is_err());
    }
}
