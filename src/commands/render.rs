use eyre::{Context, Result};
use std::path::PathBuf;

use crate::compositor::PNG_CONTENT_TYPE;
use crate::config::Config;
use crate::engine::FrameEngine;
use crate::selector::Identifier;

pub fn run(fid: &str, size: Option<u32>, output: Option<&PathBuf>, config: &Config) -> Result<()> {
    let engine = FrameEngine::from_config(config)?;
    let identifier = Identifier::parse(fid);

    let png = engine
        .render_png(&identifier, size)
        .with_context(|| format!("Failed to render #{}", identifier))?;
    log::info!("Rendered #{} as {} ({} bytes)", identifier, PNG_CONTENT_TYPE, png.len());

    super::output_binary(&png, output)
}
