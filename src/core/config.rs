//! Engine configuration: the static progression tables
//!
//! Everything here is immutable once loaded. Callers build one
//! `EngineConfig` at startup (defaults or a TOML file), validate it, and pass
//! it by reference into every engine operation.

use crate::core::error::{ProgressionError, Result};
use crate::progression::{RankLadder, UnlockTable, XpCurve};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Training XP policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingPolicy {
    /// Fraction of base XP granted at a quality score of 100
    ///
    /// At 0.2, a perfect-quality run adds 20% of the curve XP.
    pub quality_weight: f64,

    /// Validation score bands, highest first. The first band whose
    /// `min_score` is reached wins; below every band the bonus is 0.
    pub validation_bands: Vec<ValidationBand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationBand {
    pub min_score: f64,
    pub bonus: i64,
}

impl Default for TrainingPolicy {
    fn default() -> Self {
        Self {
            quality_weight: 0.2,
            validation_bands: vec![
                ValidationBand { min_score: 100.0, bonus: 200 },
                ValidationBand { min_score: 90.0, bonus: 150 },
                ValidationBand { min_score: 80.0, bonus: 100 },
                ValidationBand { min_score: 70.0, bonus: 50 },
            ],
        }
    }
}

/// Usage XP policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsagePolicy {
    /// XP per usage event before the success multiplier
    pub xp_per_event: i64,

    /// Maximum XP a single accounting call can award
    ///
    /// The caller invokes usage accounting once per day, so this acts as
    /// the daily cap. The engine keeps no rolling total.
    pub cap: i64,
}

impl Default for UsagePolicy {
    fn default() -> Self {
        Self { xp_per_event: 5, cap: 500 }
    }
}

/// Configuration for the progression engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub curve: XpCurve,
    pub ladder: RankLadder,
    pub unlocks: UnlockTable,
    pub training: TrainingPolicy,
    pub usage: UsagePolicy,
}

impl EngineConfig {
    /// Create a new config with the canonical tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from TOML. Missing sections fall back to
    /// the canonical tables. Malformed TOML is a `TomlError`; well-formed TOML
    /// with bad tables is a `Configuration` error.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = content.parse()?;
        let config: EngineConfig = toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ProgressionError::config(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            ProgressionError::Configuration(msg) => {
                ProgressionError::config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        tracing::info!(
            "Loaded progression config from {} ({} breakpoints, {} ranks)",
            path.display(),
            config.curve.breakpoints().len(),
            config.ladder.ranks().len()
        );
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.curve.validate()?;
        self.ladder.validate()?;
        self.unlocks.validate()?;

        if !self.training.quality_weight.is_finite() || self.training.quality_weight < 0.0 {
            return Err(ProgressionError::config(format!(
                "training.quality_weight must be a non-negative number, got {}",
                self.training.quality_weight
            )));
        }
        for pair in self.training.validation_bands.windows(2) {
            if pair[0].min_score <= pair[1].min_score {
                return Err(ProgressionError::config(format!(
                    "training.validation_bands must be strictly descending by min_score ({} then {})",
                    pair[0].min_score, pair[1].min_score
                )));
            }
        }
        if self.training.validation_bands.iter().any(|b| b.bonus < 0) {
            return Err(ProgressionError::config("validation bonuses must be non-negative"));
        }

        if self.usage.xp_per_event < 0 || self.usage.cap < 0 {
            return Err(ProgressionError::config(format!(
                "usage.xp_per_event ({}) and usage.cap ({}) must be non-negative",
                self.usage.xp_per_event, self.usage.cap
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
[usage]
xp_per_event = 10
cap = 300
"#,
        )
        .unwrap();

        assert_eq!(config.usage.xp_per_event, 10);
        assert_eq!(config.usage.cap, 300);
        assert_eq!(config.curve, XpCurve::default());
        assert_eq!(config.ladder, RankLadder::default());
    }

    #[test]
    fn test_unsorted_breakpoints_rejected() {
        let err = EngineConfig::from_toml_str(
            r#"
[curve]
breakpoints = [[0, 0], [100, 200], [10, 20]]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ProgressionError::Configuration(_)));
    }

    #[test]
    fn test_short_tables_rejected() {
        let err = EngineConfig::from_toml_str("[curve]\nbreakpoints = []\n").unwrap_err();
        assert!(matches!(err, ProgressionError::Configuration(_)));

        let err = EngineConfig::from_toml_str(
            r#"
[[ladder.ranks]]
rank = "Novice"
title = "Apprentice"
level_range = [1, 5]
xp_required = 0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ProgressionError::Configuration(_)));
    }

    #[test]
    fn test_ascending_validation_bands_rejected() {
        let mut config = EngineConfig::default();
        config.training.validation_bands = vec![
            ValidationBand { min_score: 70.0, bonus: 50 },
            ValidationBand { min_score: 90.0, bonus: 150 },
        ];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_toml_error() {
        let err = EngineConfig::from_toml_str("[curve\nbreakpoints = ").unwrap_err();
        assert!(matches!(err, ProgressionError::TomlError(_)));
    }
}
