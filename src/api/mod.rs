//! Contains the types for the high level API: the pipeline builder and editing sessions.

mod pixel_art_pipeline;
mod session;
mod source;

pub use pixel_art_pipeline::{PipelineOptions, PixelArtPipeline};
pub use session::{LoadOutcome, LoadTicket, Session};
#[cfg(feature = "image")]
pub use source::FileSource;
pub use source::ImageSource;
