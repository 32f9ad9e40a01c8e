//! Contains various types needed across the crate.

use crate::{Error, Result, ALPHA_THRESHOLD, MAX_COLORS};
use palette::{cast, Srgb, Srgba};
use std::{
    fmt::{Debug, Display},
    ops::Deref,
};
#[cfg(feature = "image")]
use image::RgbaImage;

/// An error type for when a value is outside of its supported range.
///
/// The inner values are the inclusive minimum and maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OutOfRange<T>(pub T, pub T);

impl<T: Display> Display for OutOfRange<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "outside of the supported range {}..={}", self.0, self.1)
    }
}

impl<T: Debug + Display> std::error::Error for OutOfRange<T> {}

/// This type is used to specify the maximum number of colors to include in a palette (`K`).
///
/// This is a simple new type wrapper around `u16` with the invariant that it must be
/// in the range `2..=`[`MAX_COLORS`].
///
/// # Examples
/// ```
/// # use pixelette::{PaletteSize, OutOfRange};
/// # fn main() -> Result<(), OutOfRange<u16>> {
/// let size = PaletteSize::try_from(16u16)?;
/// let size: PaletteSize = 128u16.try_into()?;
/// let size = PaletteSize::from_clamped(1024);
/// assert_eq!(size, PaletteSize::MAX);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u16", into = "u16")
)]
#[repr(transparent)]
pub struct PaletteSize(u16);

impl PaletteSize {
    /// The smallest supported palette size.
    pub const MIN: Self = Self(2);

    /// The largest supported palette size (given by [`MAX_COLORS`]).
    pub const MAX: Self = Self(MAX_COLORS);

    /// The default palette size of `16`.
    pub const DEFAULT: Self = Self(16);

    /// The palette sizes offered to users.
    pub const CHOICES: [Self; 8] = [
        Self(2),
        Self(4),
        Self(8),
        Self(16),
        Self(32),
        Self(64),
        Self(128),
        Self(256),
    ];

    /// Gets the inner `u16` value.
    #[must_use]
    pub const fn into_inner(self) -> u16 {
        self.0
    }

    /// Gets the palette size as a `usize` for lengths and comparisons.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// Creates a [`PaletteSize`] by clamping the given `u16` into the supported range.
    #[must_use]
    pub const fn from_clamped(value: u16) -> Self {
        if value < Self::MIN.0 {
            Self::MIN
        } else if value > MAX_COLORS {
            Self::MAX
        } else {
            Self(value)
        }
    }
}

impl Default for PaletteSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<PaletteSize> for u16 {
    fn from(val: PaletteSize) -> Self {
        val.into_inner()
    }
}

impl TryFrom<u16> for PaletteSize {
    type Error = OutOfRange<u16>;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=MAX_COLORS).contains(&value) {
            Ok(PaletteSize(value))
        } else {
            Err(OutOfRange(Self::MIN.0, MAX_COLORS))
        }
    }
}

impl Display for PaletteSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

/// Whether every channel of `color` is below `30`.
#[must_use]
pub fn is_near_black(color: Srgb<u8>) -> bool {
    color.red < 30 && color.green < 30 && color.blue < 30
}

/// Whether every channel of `color` is above `225`.
#[must_use]
pub fn is_near_white(color: Srgb<u8>) -> bool {
    color.red > 225 && color.green > 225 && color.blue > 225
}

/// An ordered list of unique representative colors.
///
/// Palettes are plain value sets: two palettes with the same colors in the same order are equal.
///
/// # Examples
/// ```
/// # use pixelette::Palette;
/// # use palette::Srgb;
/// let palette = Palette::new(vec![
///     Srgb::new(0, 0, 0),
///     Srgb::new(255, 255, 255),
///     Srgb::new(0, 0, 0), // duplicates are dropped
/// ]);
/// assert_eq!(palette.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette(Vec<Srgb<u8>>);

impl Palette {
    /// Creates a new [`Palette`], keeping only the first occurrence of each color.
    #[must_use]
    pub fn new(colors: Vec<Srgb<u8>>) -> Self {
        let mut palette = Self(Vec::with_capacity(colors.len()));
        for color in colors {
            palette.push_unique(color);
        }
        palette
    }

    /// Creates a [`Palette`] from colors that are already known to be unique.
    pub(crate) fn new_unchecked(colors: Vec<Srgb<u8>>) -> Self {
        debug_assert!(colors
            .iter()
            .enumerate()
            .all(|(i, c)| !colors[..i].contains(c)));
        Self(colors)
    }

    /// The two color palette used whenever no palette is available.
    #[must_use]
    pub fn black_and_white() -> Self {
        Self(vec![Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)])
    }

    /// Appends `color` if it is not already in the palette.
    /// Returns whether the color was added.
    pub(crate) fn push_unique(&mut self, color: Srgb<u8>) -> bool {
        if self.0.contains(&color) {
            false
        } else {
            self.0.push(color);
            true
        }
    }

    /// Shortens the palette to at most `len` colors.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    /// Returns the colors as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Srgb<u8>] {
        &self.0
    }

    /// Consumes the palette and returns the inner `Vec`.
    #[must_use]
    pub fn into_inner(self) -> Vec<Srgb<u8>> {
        self.0
    }

    /// Whether the palette has a color with all channels below `30`.
    #[must_use]
    pub fn contains_near_black(&self) -> bool {
        self.0.iter().copied().any(is_near_black)
    }

    /// Whether the palette has a color with all channels above `225`.
    #[must_use]
    pub fn contains_near_white(&self) -> bool {
        self.0.iter().copied().any(is_near_white)
    }
}

impl Deref for Palette {
    type Target = [Srgb<u8>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Palette> for Vec<Srgb<u8>> {
    fn from(val: Palette) -> Self {
        val.0
    }
}

/// A decoded image: its dimensions and a dense, row-major list of RGBA pixels.
///
/// A [`Raster`] always has a non-zero width and height, and exactly `width * height` pixels.
///
/// # Examples
/// ```
/// # use pixelette::{Raster, Error};
/// # fn main() -> Result<(), Error> {
/// let raster = Raster::new(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255])?;
/// assert_eq!(raster.pixels().len(), 2);
///
/// assert!(Raster::new(0, 10, Vec::new()).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// The number of pixels in each row.
    width: u32,
    /// The number of rows.
    height: u32,
    /// The pixels in row-major order.
    pixels: Vec<Srgba<u8>>,
}

impl Raster {
    /// Checks that the dimensions are non-zero and returns the number of pixels.
    fn pixel_count(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            Err(Error::InvalidImage { width, height })
        } else {
            Ok(width as usize * height as usize)
        }
    }

    /// Creates a new [`Raster`] from RGBA bytes (four bytes per pixel).
    ///
    /// # Errors
    /// Returns [`Error::InvalidImage`] if `width` or `height` is zero,
    /// or [`Error::BufferSize`] if `bytes` does not hold exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        let expected = Self::pixel_count(width, height)? * 4;
        if bytes.len() != expected {
            return Err(Error::BufferSize { expected, actual: bytes.len() });
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Srgba::new(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self { width, height, pixels })
    }

    /// Creates a new [`Raster`] from a list of pixels.
    ///
    /// # Errors
    /// Returns [`Error::InvalidImage`] if `width` or `height` is zero,
    /// or [`Error::BufferSize`] if `pixels` does not have `width * height` entries.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Srgba<u8>>) -> Result<Self> {
        let expected = Self::pixel_count(width, height)?;
        if pixels.len() == expected {
            Ok(Self { width, height, pixels })
        } else {
            Err(Error::BufferSize {
                expected: expected * 4,
                actual: pixels.len() * 4,
            })
        }
    }

    /// Creates a raster where every pixel is `color`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidImage`] if `width` or `height` is zero.
    pub fn filled(width: u32, height: u32, color: Srgba<u8>) -> Result<Self> {
        let len = Self::pixel_count(width, height)?;
        Ok(Self { width, height, pixels: vec![color; len] })
    }

    /// The width of the raster.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The height of the raster.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Srgba<u8>] {
        &self.pixels
    }

    /// The pixel at `(x, y)`, if it is in bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Srgba<u8>> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// The pixels as a flat slice of RGBA bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        cast::into_component_slice(&self.pixels)
    }

    /// Iterates over the colors of the pixels whose alpha is at least [`ALPHA_THRESHOLD`].
    pub(crate) fn opaque_colors(&self) -> impl Iterator<Item = Srgb<u8>> + '_ {
        self.pixels
            .iter()
            .filter(|p| p.alpha >= ALPHA_THRESHOLD)
            .map(|p| p.color)
    }
}

#[cfg(feature = "image")]
impl TryFrom<&RgbaImage> for Raster {
    type Error = Error;

    fn try_from(image: &RgbaImage) -> Result<Self, Self::Error> {
        Self::new(image.width(), image.height(), image.as_raw().clone())
    }
}

#[cfg(feature = "image")]
impl TryFrom<RgbaImage> for Raster {
    type Error = Error;

    fn try_from(image: RgbaImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }
}
