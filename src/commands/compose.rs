use eyre::Result;
use std::path::PathBuf;

use crate::compositor::SVG_CONTENT_TYPE;
use crate::config::Config;
use crate::engine::FrameEngine;
use crate::selector::Identifier;

pub fn run(fid: &str, output: Option<&PathBuf>, config: &Config) -> Result<()> {
    let engine = FrameEngine::from_config(config)?;
    let identifier = Identifier::parse(fid);

    let (_, document) = engine.compose(&identifier);
    log::info!(
        "Composed #{} as {} with {} layers: {}",
        identifier,
        SVG_CONTENT_TYPE,
        document.layers().len(),
        document.layers().join(", ")
    );

    super::output_text(document.as_str(), output)
}
