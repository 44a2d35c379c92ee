//! XP awards for completed activities
//!
//! Training XP = curve XP for the processed items + a quality bonus + a
//! banded validation bonus. Usage XP is a flat per-event rate scaled by the
//! success rate and capped per accounting call.

use crate::core::config::EngineConfig;
use crate::core::error::{ProgressionError, Result};
use serde::{Deserialize, Serialize};

/// Where an XP delta came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpSource {
    Training,
    Usage,
    /// Rank-up bonus granted by the engine's award sequencing
    RankBonus,
}

/// One ledger line of an award
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpEntry {
    pub source: XpSource,
    pub xp: i64,
}

/// Breakdown of a training award
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingXp {
    pub base: i64,
    pub quality_bonus: i64,
    pub validation_bonus: i64,
    pub total: i64,
}

fn check_score(name: &str, value: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 || value > max {
        return Err(ProgressionError::invalid(format!(
            "{} must be within [0, {}], got {}",
            name, max, value
        )));
    }
    Ok(())
}

impl EngineConfig {
    /// Training XP with its components
    ///
    /// `quality_score` and `validation_score` are percentages in [0, 100].
    pub fn training_breakdown(
        &self,
        processed_items: i64,
        quality_score: f64,
        validation_score: f64,
    ) -> Result<TrainingXp> {
        check_score("quality_score", quality_score, 100.0)?;
        check_score("validation_score", validation_score, 100.0)?;

        let base = self.curve.resolve(processed_items)?;
        let quality_bonus =
            (base as f64 * (quality_score / 100.0) * self.training.quality_weight).floor() as i64;
        let validation_bonus = self.validation_bonus(validation_score);

        let xp = TrainingXp {
            base,
            quality_bonus,
            validation_bonus,
            total: base + quality_bonus + validation_bonus,
        };

        tracing::debug!(
            items = processed_items,
            quality = quality_score,
            validation = validation_score,
            base = xp.base,
            quality_bonus = xp.quality_bonus,
            validation_bonus = xp.validation_bonus,
            total = xp.total,
            "training xp computed"
        );

        Ok(xp)
    }

    /// Total training XP. Not capped.
    pub fn training_xp(
        &self,
        processed_items: i64,
        quality_score: f64,
        validation_score: f64,
    ) -> Result<i64> {
        Ok(self
            .training_breakdown(processed_items, quality_score, validation_score)?
            .total)
    }

    /// Bonus for a validation score; bands are checked highest first
    pub fn validation_bonus(&self, validation_score: f64) -> i64 {
        self.training
            .validation_bands
            .iter()
            .find(|band| validation_score >= band.min_score)
            .map_or(0, |band| band.bonus)
    }

    /// Usage XP for one accounting period
    ///
    /// Stateless: only the per-call cap is enforced. `success_rate` is a
    /// fraction in [0, 1].
    pub fn usage_xp(&self, event_count: i64, success_rate: f64) -> Result<i64> {
        if event_count < 0 {
            return Err(ProgressionError::invalid(format!(
                "event_count must be non-negative, got {}",
                event_count
            )));
        }
        check_score("success_rate", success_rate, 1.0)?;

        let raw = event_count.saturating_mul(self.usage.xp_per_event);
        let earned = (raw as f64 * success_rate).trunc() as i64;
        let capped = earned.min(self.usage.cap);

        if capped < earned {
            tracing::debug!(earned, cap = self.usage.cap, "usage xp capped");
        }

        Ok(capped)
    }
}
