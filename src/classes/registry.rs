//! Minion class definitions and the class registry
//!
//! A class is a fixed bundle of spirits with an unlock requirement. The
//! registry also carries the interest -> class table used for
//! recommendations.

use crate::core::error::{ProgressionError, Result};
use crate::core::types::{Rank, SpiritId};
use crate::spirits::{score_synergy, SpiritRegistry, SpiritRelations, SynergyReport};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_unlock_level() -> u32 {
    1
}

/// A pre-configured spirit bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinionClass {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub unlock_rank: Rank,
    #[serde(default = "default_unlock_level")]
    pub unlock_level: u32,
    pub spirits: Vec<SpiritId>,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub perfect_for: Vec<String>,
    #[serde(default)]
    pub tools_count: u32,
}

impl MinionClass {
    /// Nominal performance of the class's own spirit set
    pub fn nominal_performance<R: SpiritRelations + ?Sized>(&self, relations: &R) -> SynergyReport {
        score_synergy(&self.spirits, relations)
    }
}

#[derive(Debug, Deserialize)]
struct ClassFile {
    #[serde(default)]
    classes: Vec<MinionClass>,
    #[serde(default)]
    interests: AHashMap<String, Vec<String>>,
}

/// Registry of all minion classes
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: AHashMap<String, MinionClass>,
    /// Interest keyword (lowercase) -> class names, in preference order
    interests: AHashMap<String, Vec<String>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, replacing any previous definition with the same name
    pub fn register(&mut self, class: MinionClass) {
        self.classes.insert(class.name.clone(), class);
    }

    /// Map an interest keyword to classes for `recommend`
    pub fn add_interest(&mut self, interest: &str, classes: Vec<String>) {
        self.interests.insert(interest.to_lowercase(), classes);
    }

    /// Parse `[[classes]]` tables and an optional `[interests]` table
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ClassFile = toml::from_str(content)?;
        let mut registry = Self::new();
        for class in file.classes {
            if registry.classes.contains_key(&class.name) {
                return Err(ProgressionError::config(format!(
                    "class '{}' defined more than once",
                    class.name
                )));
            }
            registry.register(class);
        }
        for (interest, classes) in file.interests {
            registry.add_interest(&interest, classes);
        }
        Ok(registry)
    }

    /// Load a class catalog and check it against the spirit registry
    pub fn load(path: &Path, spirits: &SpiritRegistry) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_toml_str(&content)?;
        registry.validate(spirits)?;
        tracing::info!("Loaded {} classes from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Every class needs at least one spirit, all known and distinct;
    /// recommendations may only name known classes.
    pub fn validate(&self, spirits: &SpiritRegistry) -> Result<()> {
        for class in self.classes.values() {
            if class.spirits.is_empty() {
                return Err(ProgressionError::config(format!(
                    "class '{}' has no spirits",
                    class.name
                )));
            }
            for (i, spirit) in class.spirits.iter().enumerate() {
                if !spirits.contains(spirit.as_str()) {
                    return Err(ProgressionError::config(format!(
                        "class '{}' references unknown spirit '{}'",
                        class.name, spirit
                    )));
                }
                if class.spirits[..i].contains(spirit) {
                    return Err(ProgressionError::config(format!(
                        "class '{}' lists spirit '{}' twice",
                        class.name, spirit
                    )));
                }
            }
        }
        for (interest, names) in &self.interests {
            if let Some(unknown) = names.iter().find(|n| !self.classes.contains_key(*n)) {
                return Err(ProgressionError::config(format!(
                    "interest '{}' recommends unknown class '{}'",
                    interest, unknown
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&MinionClass> {
        self.classes.get(name)
    }

    /// Like `get`, but a missing class is an error
    pub fn require(&self, name: &str) -> Result<&MinionClass> {
        self.get(name)
            .ok_or_else(|| ProgressionError::ClassNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// All classes, sorted by category then name
    pub fn all(&self) -> Vec<&MinionClass> {
        let mut all: Vec<&MinionClass> = self.classes.values().collect();
        all.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        all
    }

    /// Classes in a category, sorted by name
    pub fn by_category(&self, category: &str) -> Vec<&MinionClass> {
        let mut found: Vec<&MinionClass> = self
            .classes
            .values()
            .filter(|c| c.category == category)
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    /// Classes a user at `rank`/`level` can unlock
    pub fn available_for(&self, rank: Rank, level: u32) -> Vec<&MinionClass> {
        self.all()
            .into_iter()
            .filter(|c| crate::classes::can_unlock(c, rank, level).is_granted())
            .collect()
    }

    /// Classes matching any of the interests, without duplicates, in the
    /// order the interests were given
    pub fn recommend<S: AsRef<str>>(&self, interests: &[S]) -> Vec<&MinionClass> {
        let mut seen = std::collections::HashSet::new();
        let mut found = Vec::new();
        for interest in interests {
            let Some(names) = self.interests.get(&interest.as_ref().to_lowercase()) else {
                continue;
            };
            for name in names {
                if let Some(class) = self.classes.get(name) {
                    if seen.insert(name.as_str()) {
                        found.push(class);
                    }
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spirits::Spirit;

    const CLASSES: &str = r#"
[[classes]]
name = "planner"
display_name = "Planner"
category = "Development & Technical"
spirits = ["analyst", "writer", "researcher"]
tools_count = 15

[[classes]]
name = "devops"
display_name = "DevOps Engineer"
category = "Development & Technical"
unlock_rank = "Skilled"
unlock_level = 3
spirits = ["devops", "analyst"]

[[classes]]
name = "creative"
display_name = "Creative Assistant"
category = "Content & Creative"
spirits = ["writer"]

[interests]
development = ["devops", "planner"]
content = ["creative", "planner"]
"#;

    fn spirits() -> SpiritRegistry {
        let mut reg = SpiritRegistry::new();
        reg.register(Spirit::new("analyst", "analysis").with_synergy("researcher", 0.3));
        reg.register(Spirit::new("writer", "content").with_synergy("analyst", 0.15));
        reg.register(Spirit::new("researcher", "analysis"));
        reg.register(Spirit::new("devops", "operations").with_synergy("analyst", 0.25));
        reg
    }

    #[test]
    fn test_parse_and_validate() {
        let registry = ClassRegistry::from_toml_str(CLASSES).unwrap();
        assert_eq!(registry.len(), 3);
        assert!(registry.validate(&spirits()).is_ok());

        let devops = registry.get("devops").unwrap();
        assert_eq!(devops.unlock_rank, Rank::Skilled);
        assert_eq!(devops.unlock_level, 3);
        assert_eq!(registry.get("planner").unwrap().unlock_rank, Rank::Novice);
    }

    #[test]
    fn test_unknown_spirit_rejected() {
        let mut registry = ClassRegistry::from_toml_str(CLASSES).unwrap();
        let mut class = registry.get("creative").unwrap().clone();
        class.spirits.push(SpiritId::from("ghost"));
        registry.register(class);
        assert!(registry.validate(&spirits()).is_err());
    }

    #[test]
    fn test_unknown_recommendation_rejected() {
        let mut registry = ClassRegistry::from_toml_str(CLASSES).unwrap();
        registry.add_interest("data", vec!["data_scientist".to_string()]);
        assert!(registry.validate(&spirits()).is_err());
    }

    #[test]
    fn test_nominal_performance() {
        let registry = ClassRegistry::from_toml_str(CLASSES).unwrap();
        let report = registry.get("planner").unwrap().nominal_performance(&spirits());
        assert!((report.synergy_bonus - 0.45).abs() < 1e-12);
        assert_eq!(report.synergy_pairs.len(), 2);
    }

    #[test]
    fn test_available_for() {
        let registry = ClassRegistry::from_toml_str(CLASSES).unwrap();
        let names = |v: Vec<&MinionClass>| v.iter().map(|c| c.name.clone()).collect::<Vec<_>>();

        assert_eq!(names(registry.available_for(Rank::Novice, 10)), vec!["creative", "planner"]);
        assert_eq!(
            names(registry.available_for(Rank::Skilled, 3)),
            vec!["creative", "devops", "planner"]
        );
    }

    #[test]
    fn test_recommend_dedups() {
        let registry = ClassRegistry::from_toml_str(CLASSES).unwrap();
        let names: Vec<&str> = registry
            .recommend(&["Development", "content", "cooking"])
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["devops", "planner", "creative"]);
    }

    #[test]
    fn test_by_category() {
        let registry = ClassRegistry::from_toml_str(CLASSES).unwrap();
        assert_eq!(registry.by_category("Development & Technical").len(), 2);
        assert!(matches!(registry.require("nope"), Err(ProgressionError::ClassNotFound(_))));
    }
}
