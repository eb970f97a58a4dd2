//! Diagnose fidframe setup issues

use colored::*;
use eyre::Result;
use std::collections::HashSet;

use crate::compositor::DirFragmentStore;
use crate::config::Config;
use crate::engine::{FrameEngine, Source};
use crate::selector::Identifier;
use crate::traits::TraitSet;

pub fn run(config: &Config) -> Result<()> {
    println!("{}", "fidframe Doctor".bold());
    println!("{}", "═".repeat(50));
    println!();

    let mut issues = 0;

    let fidframe_dir = Config::fidframe_dir();
    if fidframe_dir.exists() {
        println!("{} fidframe directory: {}", "✓".green(), fidframe_dir.display());
    } else {
        println!("{} fidframe directory missing: {}", "⚠".yellow(), fidframe_dir.display());
        println!("  Run {} to create it", "fidframe init".cyan());
    }

    let config_file = fidframe_dir.join("fidframe.yaml");
    if config_file.exists() {
        println!("{} Config file: {}", "✓".green(), config_file.display());
    } else {
        println!("{} Config file missing: {} (using defaults)", "⚠".yellow(), config_file.display());
    }

    let engine = match FrameEngine::from_config(config) {
        Ok(engine) => engine,
        Err(e) => {
            println!("{} Failed to load trait set: {:#}", "✗".red(), e);
            println!();
            println!("{}", "═".repeat(50));
            println!("{} 1 issue(s) found", "⚠".yellow().bold());
            return Ok(());
        }
    };

    println!("{} Trait set: {}", "✓".green(), engine.traits_source);
    println!("{} Fragments: {}", "✓".green(), engine.fragments_source);
    println!();

    println!("{}", "Categories:".bold());
    issues += check_tables(engine.trait_set());
    println!();

    println!("{}", "Rules:".bold());
    issues += check_rules(engine.trait_set());
    println!();

    println!("{}", "Fragments:".bold());
    issues += check_fragments(&engine, config);
    println!();

    println!("{}", "Rasterizer:".bold());
    match engine.render_png(&Identifier::from(0), Some(64)) {
        Ok(png) => println!("  {} test render ok ({} bytes)", "✓".green(), png.len()),
        Err(e) => {
            println!("  {} {}", "✗".red(), e);
            issues += 1;
        }
    }
    if !config.raster.load_system_fonts {
        println!("  {} system fonts disabled, PNG labels will not be drawn", "⚠".yellow());
    }
    println!();

    println!("{}", "═".repeat(50));
    if issues == 0 {
        println!("{} All checks passed!", "✓".green().bold());
    } else {
        println!("{} {} issue(s) found", "⚠".yellow().bold(), issues);
    }

    Ok(())
}

fn check_tables(set: &TraitSet) -> usize {
    let mut issues = 0;
    for category in &set.order {
        let table = set.table(category);
        let total: f64 = table.iter().map(|o| o.weight).sum();
        if table.is_empty() {
            println!("  {} {} has no options, layer will be absent", "⚠".yellow(), category);
        } else if total <= 0.0 {
            println!(
                "  {} {} has only zero weights, always falls back to '{}'",
                "⚠".yellow(),
                category,
                table[0].id
            );
        } else {
            println!("  {} {} ({} options)", "✓".green(), category, table.len());
        }
    }

    for category in set.tables.keys() {
        if !set.order.contains(category) {
            println!("  {} {} has a table but is not in order", "✗".red(), category);
            issues += 1;
        }
    }
    issues
}

fn check_rules(set: &TraitSet) -> usize {
    if set.rules.is_empty() {
        println!("  {} no rules configured", "✓".green());
        return 0;
    }

    let mut issues = 0;
    for category in set.unknown_rule_categories() {
        println!("  {} rule references unknown category '{}'", "✗".red(), category);
        issues += 1;
    }

    let mut unknown_ids = Vec::new();
    let mut collect = |category: &str, ids: &[String]| {
        for id in ids {
            if !set.table(category).iter().any(|o| &o.id == id) {
                unknown_ids.push(format!("{}/{}", category, id));
            }
        }
    };
    for rule in &set.rules.conflicts {
        collect(&rule.category, &rule.options);
        for (category, ids) in &rule.deny {
            collect(category, ids);
        }
    }
    for rule in &set.rules.requirements {
        collect(&rule.category, &rule.options);
        collect(&rule.target, &rule.allowed);
    }
    for key in &unknown_ids {
        println!("  {} rule names unknown option {}", "⚠".yellow(), key);
    }

    if issues == 0 && unknown_ids.is_empty() {
        println!(
            "  {} {} conflict, {} requirement rule(s)",
            "✓".green(),
            set.rules.conflicts.len(),
            set.rules.requirements.len()
        );
    }
    issues
}

fn check_fragments(engine: &FrameEngine, config: &Config) -> usize {
    let set = engine.trait_set();
    let store = engine.store();
    let mut missing = 0;

    for category in &set.order {
        for option in set.table(category) {
            if store.fragment(category, &option.asset).is_none() {
                let fallback = set.fallbacks(category).iter().find(|a| store.fragment(category, a).is_some());
                match fallback {
                    Some(asset) => println!(
                        "  {} {}/{} missing, falls back to {}",
                        "⚠".yellow(),
                        category,
                        option.asset,
                        asset
                    ),
                    None => {
                        println!("  {} {}/{} missing, layer will be skipped", "✗".red(), category, option.asset);
                        missing += 1;
                    }
                }
            }
        }
    }

    if engine.fragments_source != Source::Builtin {
        let dir = DirFragmentStore::new(config.fragments_dir());
        for category in &set.order {
            let referenced: HashSet<&str> = set
                .table(category)
                .iter()
                .map(|o| o.asset.as_str())
                .chain(set.fallbacks(category).iter().map(String::as_str))
                .collect();
            for asset in dir.assets(category) {
                if !referenced.contains(asset.as_str()) {
                    println!("  {} {}/{}.svg is not referenced", "·".dimmed(), category, asset);
                }
            }
        }
    }

    if missing == 0 {
        println!("  {} every option resolves to a fragment", "✓".green());
    }
    missing
}
