//! Compatibility rules between trait categories

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// All compatibility rules, applied conflicts first then requirements
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RuleSet {
    #[serde(default)]
    pub conflicts: Vec<ConflictRule>,

    #[serde(default)]
    pub requirements: Vec<RequirementRule>,
}

/// When `category` resolves to one of `options`, every category in `deny`
/// whose selection is in its listed ids is unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConflictRule {
    pub category: String,
    pub options: Vec<String>,
    pub deny: IndexMap<String, Vec<String>>,
}

/// When `category` resolves to one of `options`, `target` must be one of
/// `allowed` or it is unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RequirementRule {
    pub category: String,
    pub options: Vec<String>,

    #[serde(default = "default_target")]
    pub target: String,

    pub allowed: Vec<String>,
}

fn default_target() -> String {
    "body".to_string()
}

impl ConflictRule {
    pub fn triggered_by(&self, chosen: Option<&str>) -> bool {
        chosen.is_some_and(|id| self.options.iter().any(|o| o == id))
    }

    /// Whether `id` in `category` is denied by this rule
    pub fn denies(&self, category: &str, id: &str) -> bool {
        self.deny.get(category).is_some_and(|ids| ids.iter().any(|d| d == id))
    }
}

impl RequirementRule {
    pub fn triggered_by(&self, chosen: Option<&str>) -> bool {
        chosen.is_some_and(|id| self.options.iter().any(|o| o == id))
    }

    pub fn allows(&self, id: &str) -> bool {
        self.allowed.iter().any(|a| a == id)
    }
}

impl RuleSet {
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty() && self.requirements.is_empty()
    }

    /// Every category name mentioned by any rule
    pub fn referenced_categories(&self) -> Vec<String> {
        let mut categories = Vec::new();
        for rule in &self.conflicts {
            categories.push(rule.category.clone());
            categories.extend(rule.deny.keys().cloned());
        }
        for rule in &self.requirements {
            categories.push(rule.category.clone());
            categories.push(rule.target.clone());
        }
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laser_rule() -> ConflictRule {
        ConflictRule {
            category: "eyes".to_string(),
            options: vec!["laser".to_string()],
            deny: IndexMap::from([("headgear".to_string(), vec!["headset".to_string()])]),
        }
    }

    #[test]
    fn test_conflict_trigger() {
        let rule = laser_rule();
        assert!(rule.triggered_by(Some("laser")));
        assert!(!rule.triggered_by(Some("sleepy")));
        assert!(!rule.triggered_by(None));
    }

    #[test]
    fn test_conflict_denies() {
        let rule = laser_rule();
        assert!(rule.denies("headgear", "headset"));
        assert!(!rule.denies("headgear", "crown"));
        assert!(!rule.denies("mouth", "headset"));
    }

    #[test]
    fn test_requirement_default_target() {
        let yaml = r#"
category: aura
options: [holy]
allowed: [angel]
"#;
        let rule: RequirementRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.target, "body");
        assert!(rule.allows("angel"));
        assert!(!rule.allows("robot"));
    }

    #[test]
    fn test_referenced_categories() {
        let rules = RuleSet {
            conflicts: vec![laser_rule()],
            requirements: vec![],
        };
        assert_eq!(rules.referenced_categories(), vec!["eyes", "headgear"]);
        assert!(!rules.is_empty());
        assert!(RuleSet::default().is_empty());
    }
}
