use eyre::Result;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::engine::FrameEngine;
use crate::selector::Identifier;

pub fn run(fid: &str, image: Option<&str>, format: Option<OutputFormat>, config: &Config) -> Result<()> {
    let engine = FrameEngine::from_config(config)?;
    let mut metadata = engine.metadata(&Identifier::parse(fid));
    if let Some(template) = image {
        metadata = metadata.with_image(template);
    }

    match format.unwrap_or(OutputFormat::Json) {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&metadata)?),
        OutputFormat::Json | OutputFormat::Text => println!("{}", serde_json::to_string_pretty(&metadata)?),
    }

    Ok(())
}
