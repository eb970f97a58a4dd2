//! Show the traits chosen for an identifier

use colored::*;
use eyre::Result;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::engine::FrameEngine;
use crate::selector::{Identifier, Selection};

pub fn run(fid: &str, format: Option<OutputFormat>, config: &Config) -> Result<()> {
    let engine = FrameEngine::from_config(config)?;
    let identifier = Identifier::parse(fid);
    let selection = engine.select(&identifier);

    match OutputFormat::resolve(format) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&selection)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&selection)?),
        OutputFormat::Text => print_text(&selection),
    }

    Ok(())
}

fn print_text(selection: &Selection) {
    println!("{} #{}", "Frame".bold(), selection.identifier());
    println!();

    let width = selection.iter().map(|(c, _)| c.len()).max().unwrap_or(0);
    for (category, option) in selection.iter() {
        match option {
            Some(option) => println!(
                "  {}  {} {}",
                format!("{:width$}", category, width = width).cyan(),
                option.id,
                format!("({})", option.asset).dimmed()
            ),
            None => println!(
                "  {}  {}",
                format!("{:width$}", category, width = width).cyan(),
                "-".dimmed()
            ),
        }
    }
}
