pub mod batch;
pub mod completions;
pub mod compose;
pub mod config;
pub mod doctor;
pub mod init;
pub mod metadata;
pub mod render;
pub mod select;

use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

fn output_text(content: &str, output: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = output {
        fs::write(path, content).context("Failed to write output file")?;
        eprintln!("{} Saved: {}", "✓".green(), path.display());
    } else {
        print!("{}", content);
    }

    Ok(())
}

fn output_binary(content: &[u8], output: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = output {
        fs::write(path, content).context("Failed to write output file")?;
        eprintln!("{} Saved: {}", "✓".green(), path.display());
    } else if io::stdout().is_terminal() {
        eyre::bail!("Refusing to write binary output to a terminal. Use --output or pipe to a file.");
    } else {
        io::stdout().write_all(content).context("Failed to write to stdout")?;
    }

    Ok(())
}
