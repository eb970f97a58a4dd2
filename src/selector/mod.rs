//! Deterministic trait selection
//!
//! `select_traits` is a pure function of identifier, trait set and salt:
//!
//! 1. one weighted draw per category in paint order
//! 2. conflict rules unset denied picks
//! 3. requirement rules unset disallowed targets
//! 4. every unset category with a non-empty table gets its first option

pub mod seed;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::RenderError;
use crate::traits::{ConflictRule, RequirementRule, TraitOption, TraitSet};

pub use seed::{Identifier, SeedStream};

/// Resolved category → option map for one identifier
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    identifier: Identifier,
    picks: IndexMap<String, Option<TraitOption>>,
}

impl Selection {
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn get(&self, category: &str) -> Option<&TraitOption> {
        self.picks.get(category).and_then(Option::as_ref)
    }

    /// Categories in paint order with their chosen option
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&TraitOption>)> {
        self.picks.iter().map(|(c, o)| (c.as_str(), o.as_ref()))
    }

    #[cfg(test)]
    /// Category → chosen option id
    pub fn to_ids(&self) -> IndexMap<String, Option<String>> {
        self.iter()
            .map(|(c, o)| (c.to_string(), o.map(|o| o.id.clone())))
            .collect()
    }
}

#[derive(Serialize)]
struct SelectionView<'a> {
    identifier: String,
    traits: IndexMap<&'a str, Option<&'a str>>,
}

impl Serialize for Selection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SelectionView {
            identifier: self.identifier.to_string(),
            traits: self.iter().map(|(c, o)| (c, o.map(|o| o.id.as_str()))).collect(),
        }
        .serialize(serializer)
    }
}

/// Pick an option proportionally to weight. `unit` must be in [0, 1).
///
/// Returns `None` for an empty table or one whose weights sum to zero. When
/// float accumulation never brings the remainder to zero the last option wins.
pub fn weighted_draw(options: &[TraitOption], unit: f64) -> Option<&TraitOption> {
    let total: f64 = options.iter().map(|o| o.weight).sum();
    if total <= 0.0 {
        return None;
    }

    let mut remainder = unit * total;
    for option in options {
        remainder -= option.weight;
        if remainder <= 0.0 {
            return Some(option);
        }
    }
    options.last()
}

pub fn select_traits(identifier: &Identifier, set: &TraitSet, salt: &str) -> Selection {
    let mut stream = SeedStream::new(identifier, salt);
    let mut picks = IndexMap::with_capacity(set.order.len());

    for category in &set.order {
        // Draw even for empty tables so later categories keep their stream position
        let unit = stream.next_unit();
        let table = set.table(category);
        if table.is_empty() {
            log::debug!("{}", RenderError::EmptyCategoryTable(category.clone()));
        }
        picks.insert(category.clone(), weighted_draw(table, unit).cloned());
    }

    apply_conflicts(&mut picks, &set.rules.conflicts);
    apply_requirements(&mut picks, &set.rules.requirements);
    fill_fallbacks(&mut picks, set);

    Selection {
        identifier: identifier.clone(),
        picks,
    }
}

fn chosen_id(picks: &IndexMap<String, Option<TraitOption>>, category: &str) -> Option<String> {
    picks
        .get(category)
        .and_then(Option::as_ref)
        .map(|o| o.id.clone())
}

fn apply_conflicts(picks: &mut IndexMap<String, Option<TraitOption>>, rules: &[ConflictRule]) {
    for rule in rules {
        if !rule.triggered_by(chosen_id(picks, &rule.category).as_deref()) {
            continue;
        }
        for category in rule.deny.keys() {
            if let Some(slot) = picks.get_mut(category)
                && slot.as_ref().is_some_and(|o| rule.denies(category, &o.id))
            {
                log::debug!("conflict on {}={:?} clears {}", rule.category, rule.options, category);
                *slot = None;
            }
        }
    }
}

fn apply_requirements(picks: &mut IndexMap<String, Option<TraitOption>>, rules: &[RequirementRule]) {
    for rule in rules {
        if rule.allowed.is_empty() || !rule.triggered_by(chosen_id(picks, &rule.category).as_deref()) {
            continue;
        }
        if let Some(slot) = picks.get_mut(&rule.target)
            && slot.as_ref().is_some_and(|o| !rule.allows(&o.id))
        {
            log::debug!("requirement on {}={:?} clears {}", rule.category, rule.options, rule.target);
            *slot = None;
        }
    }
}

fn fill_fallbacks(picks: &mut IndexMap<String, Option<TraitOption>>, set: &TraitSet) {
    for (category, slot) in picks.iter_mut() {
        if slot.is_none() {
            *slot = set.table(category).first().cloned();
        }
    }
}
