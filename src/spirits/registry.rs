//! Spirit definitions and the registry that holds them

use crate::core::error::{ProgressionError, Result};
use crate::core::types::{Rank, SpiritId};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_max_level() -> u32 {
    10
}

fn default_unlock_level() -> u32 {
    1
}

/// Percent of a spirit's tools usable at spirit levels 1 through 10
const TOOL_UNLOCK_PERCENT: [usize; 10] = [25, 35, 50, 65, 80, 90, 95, 98, 99, 100];

/// A capability that can be assigned to a minion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spirit {
    pub id: SpiritId,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unlock_rank: Rank,
    #[serde(default = "default_unlock_level")]
    pub unlock_level: u32,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    #[serde(default)]
    pub tools: Vec<String>,
    /// Bonus when paired with the keyed spirit
    #[serde(default)]
    pub synergies: AHashMap<SpiritId, f64>,
    /// Penalty when paired with the keyed spirit (sign ignored)
    #[serde(default)]
    pub conflicts: AHashMap<SpiritId, f64>,
}

impl Spirit {
    pub fn new(id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: SpiritId::new(id),
            category: category.into(),
            description: String::new(),
            unlock_rank: Rank::Novice,
            unlock_level: 1,
            max_level: default_max_level(),
            tools: Vec::new(),
            synergies: AHashMap::new(),
            conflicts: AHashMap::new(),
        }
    }

    pub fn with_synergy(mut self, other: &str, weight: f64) -> Self {
        self.synergies.insert(SpiritId::from(other), weight);
        self
    }

    pub fn with_conflict(mut self, other: &str, weight: f64) -> Self {
        self.conflicts.insert(SpiritId::from(other), weight);
        self
    }

    pub fn with_unlock(mut self, rank: Rank, level: u32) -> Self {
        self.unlock_rank = rank;
        self.unlock_level = level;
        self
    }

    /// Whether a user at `rank`/`level` may use this spirit
    pub fn is_available(&self, rank: Rank, level: u32) -> bool {
        rank >= self.unlock_rank && level >= self.unlock_level
    }

    /// Tools usable at a spirit level: a leading share of `tools` growing
    /// from 25% at level 1 to all of them at level 10, never fewer than one.
    /// The level is clamped to `1..=max_level` first.
    pub fn tools_at_level(&self, level: u32) -> &[String] {
        if self.tools.is_empty() {
            return &[];
        }
        let level = level.clamp(1, self.max_level.max(1)) as usize;
        let percent = TOOL_UNLOCK_PERCENT.get(level - 1).copied().unwrap_or(100);
        let count = (self.tools.len() * percent / 100).max(1);
        &self.tools[..count]
    }
}

/// Pairwise relations between spirits, as configured (one-sided)
pub trait SpiritRelations {
    /// Synergy weight configured on `from` for `to`
    fn synergy(&self, from: &SpiritId, to: &SpiritId) -> Option<f64>;

    /// Conflict weight configured on `from` for `to`
    fn conflict(&self, from: &SpiritId, to: &SpiritId) -> Option<f64>;
}

#[derive(Debug, Deserialize)]
struct SpiritFile {
    #[serde(default)]
    spirits: Vec<Spirit>,
}

/// Registry of all known spirits
#[derive(Debug, Clone, Default)]
pub struct SpiritRegistry {
    spirits: AHashMap<SpiritId, Spirit>,
}

impl SpiritRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spirit, replacing any previous definition with the same id
    pub fn register(&mut self, spirit: Spirit) {
        self.spirits.insert(spirit.id.clone(), spirit);
    }

    /// Parse `[[spirits]]` tables from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: SpiritFile = toml::from_str(content)?;
        let mut registry = Self::new();
        for spirit in file.spirits {
            if registry.contains(spirit.id.as_str()) {
                return Err(ProgressionError::config(format!(
                    "spirit '{}' defined more than once",
                    spirit.id
                )));
            }
            registry.register(spirit);
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Load a spirit catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_toml_str(&content)?;
        tracing::info!("Loaded {} spirits from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Relations must point at known spirits, never at the spirit itself,
    /// and carry finite weights.
    pub fn validate(&self) -> Result<()> {
        for spirit in self.spirits.values() {
            let relations = spirit
                .synergies
                .iter()
                .map(|r| ("synergy", r))
                .chain(spirit.conflicts.iter().map(|r| ("conflict", r)));
            for (kind, (other, weight)) in relations {
                if other == &spirit.id {
                    return Err(ProgressionError::config(format!(
                        "spirit '{}' has a {} with itself",
                        spirit.id, kind
                    )));
                }
                if !self.spirits.contains_key(other) {
                    return Err(ProgressionError::config(format!(
                        "spirit '{}' has a {} with unknown spirit '{}'",
                        spirit.id, kind, other
                    )));
                }
                if !weight.is_finite() {
                    return Err(ProgressionError::config(format!(
                        "spirit '{}' {} weight for '{}' is not finite",
                        spirit.id, kind, other
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Spirit> {
        self.spirits.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.spirits.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.spirits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spirits.is_empty()
    }

    /// All spirits, sorted by id
    pub fn all(&self) -> Vec<&Spirit> {
        let mut all: Vec<&Spirit> = self.spirits.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Spirits in a category, sorted by id
    pub fn by_category(&self, category: &str) -> Vec<&Spirit> {
        let mut found: Vec<&Spirit> = self
            .spirits
            .values()
            .filter(|s| s.category == category)
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    /// Spirits a user at `rank`/`level` may use, sorted by id
    pub fn available_for(&self, rank: Rank, level: u32) -> Vec<&Spirit> {
        let mut found: Vec<&Spirit> = self
            .spirits
            .values()
            .filter(|s| s.is_available(rank, level))
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }
}

impl SpiritRelations for SpiritRegistry {
    fn synergy(&self, from: &SpiritId, to: &SpiritId) -> Option<f64> {
        self.spirits.get(from)?.synergies.get(to).copied()
    }

    fn conflict(&self, from: &SpiritId, to: &SpiritId) -> Option<f64> {
        self.spirits.get(from)?.conflicts.get(to).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
[[spirits]]
id = "analyst"
category = "analysis"
tools = ["chart", "stats"]
synergies = { researcher = 0.3 }

[[spirits]]
id = "researcher"
category = "analysis"
unlock_rank = "Skilled"
unlock_level = 3

[[spirits]]
id = "creative"
category = "content"
conflicts = { analyst = -0.1 }
"#;

    #[test]
    fn test_parse_catalog() {
        let registry = SpiritRegistry::from_toml_str(CATALOG).unwrap();
        assert_eq!(registry.len(), 3);

        let analyst = registry.get("analyst").unwrap();
        assert_eq!(analyst.tools, vec!["chart", "stats"]);
        assert_eq!(analyst.max_level, 10);
        assert_eq!(analyst.unlock_rank, Rank::Novice);
        assert_eq!(analyst.unlock_level, 1);

        let researcher = registry.get("researcher").unwrap();
        assert_eq!(researcher.unlock_rank, Rank::Skilled);
        assert_eq!(researcher.unlock_level, 3);
    }

    #[test]
    fn test_tools_unlock_with_level() {
        let tools: Vec<String> = (1..=8).map(|i| format!("tool_{}", i)).collect();
        let spirit = Spirit {
            tools: tools.clone(),
            ..Spirit::new("builder", "development")
        };

        assert_eq!(spirit.tools_at_level(1), &tools[..2]);
        assert_eq!(spirit.tools_at_level(2).len(), 2);
        assert_eq!(spirit.tools_at_level(3).len(), 4);
        assert_eq!(spirit.tools_at_level(5).len(), 6);
        assert_eq!(spirit.tools_at_level(9).len(), 7);
        assert_eq!(spirit.tools_at_level(10), tools.as_slice());
        // Out-of-range levels clamp
        assert_eq!(spirit.tools_at_level(0).len(), 2);
        assert_eq!(spirit.tools_at_level(50).len(), 8);
    }

    #[test]
    fn test_tools_at_level_keeps_one_and_respects_max_level() {
        let registry = SpiritRegistry::from_toml_str(CATALOG).unwrap();
        // 2 tools * 25% rounds down to 0, but one stays usable
        assert_eq!(registry.get("analyst").unwrap().tools_at_level(1).to_vec(), vec!["chart"]);
        assert!(registry.get("creative").unwrap().tools_at_level(10).is_empty());

        let capped = Spirit {
            tools: (1..=4).map(|i| format!("tool_{}", i)).collect(),
            max_level: 3,
            ..Spirit::new("checker", "quality")
        };
        // Level 3 is the cap: 50% of 4
        assert_eq!(capped.tools_at_level(10).len(), 2);
    }

    #[test]
    fn test_relations_are_one_sided() {
        let registry = SpiritRegistry::from_toml_str(CATALOG).unwrap();
        let analyst = SpiritId::from("analyst");
        let researcher = SpiritId::from("researcher");
        assert_eq!(registry.synergy(&analyst, &researcher), Some(0.3));
        assert_eq!(registry.synergy(&researcher, &analyst), None);
        assert_eq!(registry.conflict(&SpiritId::from("creative"), &analyst), Some(-0.1));
    }

    #[test]
    fn test_available_for_rank() {
        let registry = SpiritRegistry::from_toml_str(CATALOG).unwrap();
        let ids = |v: Vec<&Spirit>| v.iter().map(|s| s.id.0.clone()).collect::<Vec<_>>();

        assert_eq!(ids(registry.available_for(Rank::Novice, 5)), vec!["analyst", "creative"]);
        assert_eq!(ids(registry.available_for(Rank::Skilled, 2)), vec!["analyst", "creative"]);
        assert_eq!(
            ids(registry.available_for(Rank::Skilled, 3)),
            vec!["analyst", "creative", "researcher"]
        );
    }

    #[test]
    fn test_by_category() {
        let registry = SpiritRegistry::from_toml_str(CATALOG).unwrap();
        assert_eq!(registry.by_category("analysis").len(), 2);
        assert_eq!(registry.by_category("content").len(), 1);
        assert!(registry.by_category("nothing").is_empty());
    }

    #[test]
    fn test_unknown_relation_target_rejected() {
        let err = SpiritRegistry::from_toml_str(
            r#"
[[spirits]]
id = "analyst"
category = "analysis"
synergies = { ghost = 0.3 }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ProgressionError::Configuration(_)));
    }

    #[test]
    fn test_duplicate_spirit_rejected() {
        let err = SpiritRegistry::from_toml_str(
            r#"
[[spirits]]
id = "analyst"
category = "analysis"

[[spirits]]
id = "analyst"
category = "content"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ProgressionError::Configuration(_)));
    }
}
