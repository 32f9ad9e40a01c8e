//! A library that turns arbitrary images into `16x16` pixel art and edits the result.
//!
//! The engine has four parts:
//! - [`colorspace`]: HSL conversion and the color distances used everywhere else.
//! - [`extract`]: palette extraction, choosing a strategy by palette size (see [`palette`]).
//! - Quantization: downsampling to the grid and mapping every cell to the palette,
//!   with Floyd–Steinberg dithering for large palettes (see [`quantize`]).
//! - [`PixelEditor`]: brush, bucket, eyedropper, and eraser tools with stroke-based undo and redo.
//!
//! # Features
//! To reduce dependencies and compile times, `pixelette` has several `cargo` features
//! that can be turned off or on:
//! - `pipelines`: exposes the [`PixelArtPipeline`] builder and the [`Session`] lifecycle type.
//! - `threads`: exposes parallel versions of palette extraction via [`rayon`].
//! - `image`: enables integration with the [`image`] crate, a PNG [`Codec`], and the preview.
//! - `serde`: derives `Serialize` and `Deserialize` for the option types.
//!
//! # High-Level API
//! ```no_run
//! # use pixelette::{DitherMode, PixelArtPipeline, PaletteSize, Raster};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?.into_rgba8();
//! let raster = Raster::try_from(img)?;
//!
//! let (palette, grid) = PixelArtPipeline::new(&raster)
//!     .palette_size(PaletteSize::try_from(32)?) // set the max number of colors in the palette
//!     .dither(DitherMode::Never) // turn dithering off
//!     .pixel_art_par();
//! # Ok(())
//! # }
//! ```
//!
//! Note that some of the options and functions above require certain features to be enabled.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod dither;
mod editor;
mod error;
mod grid;
mod quantize;
mod remap;
mod types;

#[cfg(feature = "pipelines")]
mod api;

pub mod codec;
pub mod colorspace;
pub mod extract;
pub mod resample;

pub use codec::{Codec, RawCodec};
#[cfg(feature = "image")]
pub use codec::{preview, PngCodec};
pub use dither::FloydSteinberg;
pub use editor::{EditorOptions, PixelEditor, Tool, ToolState};
pub use error::{Error, Result};
#[cfg(feature = "threads")]
pub use extract::palette_par;
pub use extract::{diverse_palette, palette, ExtractionStrategy};
pub use grid::{transparent, PixelGrid};
pub use quantize::{quantize, quantize_with, DitherMode, DITHER_THRESHOLD};
pub use remap::{nearest_color, nearest_index, remap};
pub use types::*;

#[cfg(feature = "pipelines")]
pub use api::*;

/// The width and height of a [`PixelGrid`].
pub const GRID_SIZE: u32 = 16;

/// The number of cells in a [`PixelGrid`].
pub const GRID_CELLS: usize = (GRID_SIZE * GRID_SIZE) as usize;

/// The magnification of the preview image.
pub const PREVIEW_SCALE: u32 = 16;

/// The maximum supported number of palette colors is `256`.
pub const MAX_COLORS: u16 = u8::MAX as u16 + 1;

/// Pixels with an alpha below this do not count towards palette extraction.
pub const ALPHA_THRESHOLD: u8 = 128;

/// The default maximum number of history snapshots of a [`PixelEditor`].
pub const DEFAULT_HISTORY_LIMIT: usize = 256;
