//! Initialize the fidframe directory

use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::assets;
use crate::config::Config;
use crate::traits::DEFAULT_TRAITS_YAML;

pub fn run(path: Option<PathBuf>, force: bool, config: &Config) -> Result<()> {
    let fidframe_dir = path.unwrap_or_else(Config::fidframe_dir);

    println!("{} Initializing fidframe in {}", "→".blue(), fidframe_dir.display());
    fs::create_dir_all(&fidframe_dir)
        .with_context(|| format!("Failed to create {}", fidframe_dir.display()))?;

    // Point the written config at this directory regardless of where it was loaded from
    let mut new_config = config.clone();
    new_config.paths.traits = fidframe_dir.join("traits.yaml");
    new_config.paths.fragments = fidframe_dir.join("fragments");

    let config_file = fidframe_dir.join("fidframe.yaml");
    if config_file.exists() && !force {
        println!("  {} fidframe.yaml exists, keeping it", "✓".green());
    } else {
        let yaml_str = serde_yaml::to_string(&new_config).context("Failed to serialize config")?;
        fs::write(&config_file, yaml_str).context("Failed to write fidframe.yaml")?;
        println!("  {} Created fidframe.yaml", "✓".green());
    }

    let traits_file = &new_config.paths.traits;
    if traits_file.exists() && !force {
        println!("  {} traits.yaml exists, keeping it", "✓".green());
    } else {
        fs::write(traits_file, DEFAULT_TRAITS_YAML).context("Failed to write traits.yaml")?;
        println!("  {} Created traits.yaml", "✓".green());
    }

    let written = assets::write_fragments(&new_config.paths.fragments, force)?;
    println!(
        "  {} Wrote {} of {} fragments",
        "✓".green(),
        written,
        assets::BUILTIN_FRAGMENTS.len()
    );

    println!();
    println!("{} fidframe initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run {} to verify setup", "fidframe doctor".cyan());
    println!("  2. Run {} to see a selection", "fidframe select 12345".cyan());
    println!("  3. Run {} to render it", "fidframe render 12345 -O frame.png".cyan());

    Ok(())
}
