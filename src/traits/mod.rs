//! Trait tables, paint order, and compatibility rules (traits.yaml)
//!
//! The trait set is loaded once at startup and treated as read-only for the
//! lifetime of the process.
//!
//! # Format
//!
//! ```yaml
//! order: [background, body, eyes, headgear]
//! tables:
//!   eyes:
//!     - id: laser
//!       svgId: eyes-laser
//!       weight: 2
//! rules:
//!   conflicts:
//!     - category: eyes
//!       options: [laser]
//!       deny:
//!         headgear: [headset]
//! defaults:
//!   eyes: [eyes-plain]
//! ```

pub mod rules;

use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub use rules::{ConflictRule, RequirementRule, RuleSet};

/// Built-in trait set written out by `fidframe init`
pub const DEFAULT_TRAITS_YAML: &str = include_str!("../../assets/traits.yaml");

/// One selectable option within a category
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TraitOption {
    /// Stable option id, reported in metadata
    pub id: String,

    /// Fragment key used to look up the visual layer
    #[serde(alias = "svgId", alias = "svg_id")]
    pub asset: String,

    /// Relative selection weight within the category
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// The complete static trait configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TraitSet {
    /// Category iteration and paint order (first = bottom layer)
    pub order: Vec<String>,

    #[serde(default)]
    pub tables: IndexMap<String, Vec<TraitOption>>,

    #[serde(default)]
    pub rules: RuleSet,

    /// Per-category fallback fragment keys, tried in order
    #[serde(default)]
    pub defaults: IndexMap<String, Vec<String>>,
}

impl TraitSet {
    /// Load a trait set from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read trait file {}", path.display()))?;
        let set = Self::from_str(&content).with_context(|| format!("Invalid trait file {}", path.display()))?;
        log::info!(
            "Loaded {} categories ({} options) from {}",
            set.order.len(),
            set.option_count(),
            path.display()
        );
        Ok(set)
    }

    /// Parse and validate a trait set from a YAML string
    pub fn from_str(content: &str) -> Result<Self> {
        let set: Self = serde_yaml::from_str(content).context("Failed to parse trait YAML")?;
        set.validate()?;
        Ok(set)
    }

    /// The built-in trait set
    pub fn builtin() -> Result<Self> {
        Self::from_str(DEFAULT_TRAITS_YAML)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for category in &self.order {
            if !seen.insert(category.as_str()) {
                eyre::bail!("Category '{}' appears more than once in order", category);
            }
        }

        for (category, options) in &self.tables {
            let mut ids = HashSet::new();
            for option in options {
                if !ids.insert(option.id.as_str()) {
                    eyre::bail!("Duplicate option '{}' in category '{}'", option.id, category);
                }
                if !option.weight.is_finite() || option.weight < 0.0 {
                    eyre::bail!(
                        "Option '{}' in category '{}' has invalid weight {}",
                        option.id,
                        category,
                        option.weight
                    );
                }
            }

            let total: f64 = options.iter().map(|o| o.weight).sum();
            if !total.is_finite() {
                eyre::bail!("Weights in category '{}' sum to {}", category, total);
            }
        }

        Ok(())
    }

    /// Options for a category, empty when the category has no table
    pub fn table(&self, category: &str) -> &[TraitOption] {
        self.tables.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fallback fragment keys configured for a category
    pub fn fallbacks(&self, category: &str) -> &[String] {
        self.defaults.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn option_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    /// Categories named by rules that are neither ordered nor tabled
    pub fn unknown_rule_categories(&self) -> Vec<String> {
        let mut unknown: Vec<String> = self
            .rules
            .referenced_categories()
            .into_iter()
            .filter(|c| !self.order.contains(c) && !self.tables.contains_key(c))
            .collect();
        unknown.sort();
        unknown.dedup();
        unknown
    }
}
