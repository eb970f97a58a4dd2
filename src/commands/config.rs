use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "fidframe Configuration".bold());
            println!();

            println!("{}:", "paths".cyan());
            println!("  traits: {}", config.traits_path().display());
            println!("  fragments: {}", config.fragments_dir().display());
            println!();

            println!("{}:", "selector".cyan());
            println!("  salt: {}", config.selector.salt);
            println!();

            println!("{}:", "canvas".cyan());
            println!("  size: {}x{}", config.canvas.width, config.canvas.height);
            println!(
                "  background: {}",
                config.canvas.background.as_deref().unwrap_or("none")
            );
            println!("  label: {}", config.canvas.label.enabled);
            println!();

            println!("{}:", "raster".cyan());
            println!("  size: {}", config.raster.size);
            println!("  max_size: {}", config.raster.max_size);
        }
    }

    Ok(())
}

fn lookup(key: &str, config: &Config) -> Option<String> {
    match key {
        "paths.traits" => Some(config.traits_path().display().to_string()),
        "paths.fragments" => Some(config.fragments_dir().display().to_string()),
        "selector.salt" => Some(config.selector.salt.clone()),
        "canvas.width" => Some(config.canvas.width.to_string()),
        "canvas.height" => Some(config.canvas.height.to_string()),
        "canvas.background" => config.canvas.background.clone(),
        "canvas.label.enabled" => Some(config.canvas.label.enabled.to_string()),
        "raster.size" => Some(config.raster.size.to_string()),
        "raster.max_size" => Some(config.raster.max_size.to_string()),
        "log_level" | "log-level" => Some(config.log_level.as_filter().to_string()),
        _ => None,
    }
}

fn get(key: &str, config: &Config) -> Result<()> {
    let Some(value) = lookup(key, config) else {
        eyre::bail!("Unknown or unset config key: {}", key);
    };
    println!("{}", value);

    Ok(())
}
