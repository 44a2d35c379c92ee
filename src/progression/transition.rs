//! Level-up / rank-up detection and XP award sequencing
//!
//! Order of operations for every award:
//! 1. add the base delta to the old total
//! 2. diff old total against the new total (`check_transition`)
//! 3. if the rank went up, add that rank's bonus exactly once
//! 4. return the final total for the caller to persist
//!
//! A rank reached only because of a bonus is reported, but earns no bonus
//! of its own.

use crate::core::config::EngineConfig;
use crate::core::error::{ProgressionError, Result};
use crate::core::types::Rank;
use crate::progression::rank::{LevelInfo, RankDefinition};
use crate::progression::xp::{XpEntry, XpSource};
use serde::{Deserialize, Serialize};

/// Differences between two XP totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub leveled_up: bool,
    pub ranked_up: bool,
    pub old_level: u32,
    pub new_level: u32,
    pub old_rank: Rank,
    pub new_rank: Rank,
    /// Skillsets available at `new_rank` but not at `old_rank`
    pub newly_unlocked: Vec<String>,
}

/// Result of applying one XP award
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpAward {
    pub source: XpSource,
    pub old_total: i64,
    /// Delta supplied by the caller
    pub base_xp: i64,
    /// Rank-up bonus added by the engine (0 without a rank-up)
    pub rank_bonus: i64,
    /// Total to persist
    pub new_total: i64,
    /// Old total vs old total + base delta
    pub transition: Transition,
    /// Rank change caused by the bonus alone, if any
    pub bonus_transition: Option<Transition>,
    /// Derived state at `new_total`
    pub progress: LevelInfo,
    /// Ledger lines: the base delta under `source`, then any rank bonus
    pub entries: Vec<XpEntry>,
}

impl XpAward {
    /// Highest rank reached by this award
    pub fn final_rank(&self) -> Rank {
        self.progress.rank
    }

    pub fn leveled_up(&self) -> bool {
        self.progress.level > self.transition.old_level
    }

    pub fn ranked_up(&self) -> bool {
        self.progress.rank > self.transition.old_rank
    }
}

impl EngineConfig {
    /// Level and rank for a total XP
    pub fn level_info(&self, total_xp: i64) -> Result<LevelInfo> {
        self.ladder.level_info(total_xp)
    }

    /// Compare two XP totals. Call with the total before the award and the
    /// total after the base delta but before any rank bonus.
    pub fn check_transition(&self, old_xp: i64, new_xp: i64) -> Result<Transition> {
        let old = self.ladder.level_info(old_xp)?;
        let new = self.ladder.level_info(new_xp)?;

        Ok(Transition {
            leveled_up: new.level > old.level,
            ranked_up: new.rank > old.rank,
            old_level: old.level,
            new_level: new.level,
            old_rank: old.rank,
            new_rank: new.rank,
            newly_unlocked: self.unlocks.newly_unlocked(old.rank, new.rank),
        })
    }

    /// Bonus XP for reaching a rank
    pub fn rank_up_bonus(&self, rank: Rank) -> i64 {
        self.ladder.rank_up_bonus(rank)
    }

    pub fn rank_definition(&self, rank: Rank) -> &RankDefinition {
        self.ladder.definition(rank)
    }

    /// Every skillset available at `rank`, lowest rank first
    pub fn unlocked_skillsets(&self, rank: Rank) -> Vec<String> {
        self.unlocks.unlocked_through(rank)
    }

    /// Apply an XP delta to a total
    pub fn award_xp(&self, old_total: i64, delta: i64, source: XpSource) -> Result<XpAward> {
        if old_total < 0 {
            return Err(ProgressionError::invalid(format!(
                "old_total must be non-negative, got {}",
                old_total
            )));
        }
        if delta < 0 {
            return Err(ProgressionError::invalid(format!(
                "XP delta must be non-negative, got {}",
                delta
            )));
        }

        let after_base = old_total.saturating_add(delta);
        let transition = self.check_transition(old_total, after_base)?;

        let rank_bonus = if transition.ranked_up {
            self.rank_up_bonus(transition.new_rank)
        } else {
            0
        };
        let new_total = after_base.saturating_add(rank_bonus);

        let bonus_transition = if rank_bonus > 0 {
            let t = self.check_transition(after_base, new_total)?;
            t.ranked_up.then_some(t)
        } else {
            None
        };

        let progress = self.ladder.level_info(new_total)?;

        let mut entries = vec![XpEntry { source, xp: delta }];
        if rank_bonus > 0 {
            entries.push(XpEntry {
                source: XpSource::RankBonus,
                xp: rank_bonus,
            });
        }

        if transition.ranked_up {
            tracing::info!(
                "Rank up: {} -> {} (+{} bonus XP, unlocked: {:?})",
                transition.old_rank,
                transition.new_rank,
                rank_bonus,
                transition.newly_unlocked
            );
        } else if transition.leveled_up {
            tracing::debug!("Level up: {} -> {}", transition.old_level, transition.new_level);
        }
        if let Some(bt) = &bonus_transition {
            tracing::info!("Rank bonus carried {} -> {}", bt.old_rank, bt.new_rank);
        }

        Ok(XpAward {
            source,
            old_total,
            base_xp: delta,
            rank_bonus,
            new_total,
            transition,
            bonus_transition,
            progress,
            entries,
        })
    }
}
