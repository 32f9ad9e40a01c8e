#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{fmt::Display, path::PathBuf};

use clap::{Parser, ValueEnum};
use pixelette::{
    Codec, DitherMode, FileSource, LoadOutcome, PaletteSize, PipelineOptions, PngCodec, Session,
};

#[derive(Copy, Clone, ValueEnum)]
enum CliDither {
    Auto,
    Always,
    Never,
}

impl From<CliDither> for DitherMode {
    fn from(value: CliDither) -> Self {
        match value {
            CliDither::Auto => DitherMode::Auto,
            CliDither::Always => DitherMode::Always,
            CliDither::Never => DitherMode::Never,
        }
    }
}

impl Display for CliDither {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        DitherMode::from(*self).fmt(f)
    }
}

/// Turns an image into a 16x16 pixel art PNG.
#[derive(Parser)]
pub struct Options {
    #[arg(short, long, default_value_t = PaletteSize::default(), value_parser = parse_palette_size)]
    k: PaletteSize,

    #[arg(long, default_value_t = CliDither::Auto)]
    dither: CliDither,

    /// Also write the 256x256 nearest-neighbor preview to this path.
    #[arg(long)]
    preview: Option<PathBuf>,

    input: PathBuf,

    output: PathBuf,
}

fn parse_palette_size(s: &str) -> Result<PaletteSize, String> {
    let value: u16 = s.parse().map_err(|e| format!("{e}"))?;
    value.try_into().map_err(|e| format!("{e}"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let Options { k, dither, preview, input, output } = Options::parse();

    let options = PipelineOptions {
        palette_size: k,
        dither: dither.into(),
        ..PipelineOptions::new()
    };
    let mut session = Session::new(options, pixelette::EditorOptions::new());

    let time = std::time::Instant::now();
    if session.load(&FileSource::new(input)).await? == LoadOutcome::Superseded {
        return Err("load was superseded".into());
    }
    log::info!("pixelated in {}ms", time.elapsed().as_millis());

    let Some(editor) = session.editor() else {
        return Err("no grid was produced".into());
    };
    let grid = editor.commit();

    std::fs::write(&output, PngCodec::new().encode(&grid)?)?;
    if let Some(preview) = preview {
        std::fs::write(preview, PngCodec::preview().encode(&grid)?)?;
    }

    if let Some(palette) = session.palette() {
        println!("{} colors written to {}", palette.len(), output.display());
    }
    Ok(())
}
