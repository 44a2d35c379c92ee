//! Rank ladder and level resolution
//!
//! Cumulative XP picks a rank (highest rank whose requirement is met). Inside
//! a capped rank, the XP span up to the next rank is split into equal bands,
//! one per level. The top rank is uncapped: every `uncapped_xp_per_level` XP
//! past its requirement is another level.

use crate::core::error::{ProgressionError, Result};
use crate::core::types::Rank;
use serde::{Deserialize, Serialize};

/// One rung of the rank ladder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankDefinition {
    pub rank: Rank,
    /// Display title, e.g. "Journeyman"
    pub title: String,
    /// Inclusive level range covered by this rank
    pub level_range: (u32, u32),
    /// Cumulative XP needed to enter this rank
    pub xp_required: i64,
    /// One-time XP bonus for reaching this rank
    #[serde(default)]
    pub rank_up_bonus: i64,
}

impl RankDefinition {
    pub fn min_level(&self) -> u32 {
        self.level_range.0
    }

    pub fn max_level(&self) -> u32 {
        self.level_range.1
    }

    /// Number of levels (bands) in this rank
    pub fn level_count(&self) -> u32 {
        self.level_range.1 - self.level_range.0 + 1
    }
}

/// Derived progression state for a total XP value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u32,
    pub rank: Rank,
    /// Position within the rank, 1-based
    pub rank_level: u32,
}

/// Distance to the next level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextLevel {
    pub xp_needed: i64,
    /// Progress through the current level band, in [0, 100)
    pub progress_percent: f64,
}

/// Ladder as written in a config file; checked before it becomes a `RankLadder`
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RankLadderTable {
    ranks: Vec<RankDefinition>,
    uncapped_xp_per_level: i64,
}

impl Default for RankLadderTable {
    fn default() -> Self {
        let RankLadder { ranks, uncapped_xp_per_level } = RankLadder::default();
        Self { ranks, uncapped_xp_per_level }
    }
}

impl TryFrom<RankLadderTable> for RankLadder {
    type Error = ProgressionError;

    fn try_from(table: RankLadderTable) -> Result<Self> {
        RankLadder::new(table.ranks, table.uncapped_xp_per_level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RankLadderTable")]
pub struct RankLadder {
    ranks: Vec<RankDefinition>,
    /// XP per level once the top rank is reached
    uncapped_xp_per_level: i64,
}

fn rung(rank: Rank, title: &str, levels: (u32, u32), xp: i64, bonus: i64) -> RankDefinition {
    RankDefinition {
        rank,
        title: title.to_string(),
        level_range: levels,
        xp_required: xp,
        rank_up_bonus: bonus,
    }
}

impl Default for RankLadder {
    fn default() -> Self {
        Self {
            ranks: vec![
                rung(Rank::Novice, "Apprentice", (1, 5), 0, 0),
                rung(Rank::Skilled, "Journeyman", (6, 10), 1_000, 500),
                rung(Rank::Specialist, "Craftsman", (11, 15), 5_000, 800),
                rung(Rank::Expert, "Strategist", (16, 20), 15_000, 1_200),
                rung(Rank::Master, "Architect", (21, 25), 35_000, 2_000),
                rung(Rank::Grandmaster, "Sentinel", (26, 30), 70_000, 3_000),
                rung(Rank::Autonomous, "Sovereign", (31, 35), 120_000, 5_000),
            ],
            uncapped_xp_per_level: 1_000,
        }
    }
}

fn check_xp(total_xp: i64) -> Result<()> {
    if total_xp < 0 {
        return Err(ProgressionError::invalid(format!(
            "total_xp must be non-negative, got {}",
            total_xp
        )));
    }
    Ok(())
}

impl RankLadder {
    /// Build and validate a ladder
    pub fn new(ranks: Vec<RankDefinition>, uncapped_xp_per_level: i64) -> Result<Self> {
        let ladder = Self { ranks, uncapped_xp_per_level };
        ladder.validate()?;
        Ok(ladder)
    }

    pub fn ranks(&self) -> &[RankDefinition] {
        &self.ranks
    }

    pub fn uncapped_xp_per_level(&self) -> i64 {
        self.uncapped_xp_per_level
    }

    /// The ladder must list every rank exactly once, in order, starting at
    /// 0 XP, with strictly ascending requirements and contiguous levels.
    pub fn validate(&self) -> Result<()> {
        if self.ranks.len() != Rank::ALL.len() {
            return Err(ProgressionError::config(format!(
                "rank ladder must define {} ranks, got {}",
                Rank::ALL.len(),
                self.ranks.len()
            )));
        }
        for (def, expected) in self.ranks.iter().zip(Rank::ALL) {
            if def.rank != expected {
                return Err(ProgressionError::config(format!(
                    "rank ladder out of order: expected {}, found {}",
                    expected, def.rank
                )));
            }
            if def.level_range.0 == 0 || def.level_range.0 > def.level_range.1 {
                return Err(ProgressionError::config(format!(
                    "{}: invalid level range {:?}",
                    def.rank, def.level_range
                )));
            }
            if def.rank_up_bonus < 0 {
                return Err(ProgressionError::config(format!(
                    "{}: rank_up_bonus must be non-negative",
                    def.rank
                )));
            }
        }
        if self.ranks[0].xp_required != 0 {
            return Err(ProgressionError::config(format!(
                "{} must require 0 XP, got {}",
                self.ranks[0].rank, self.ranks[0].xp_required
            )));
        }
        for pair in self.ranks.windows(2) {
            if pair[1].xp_required <= pair[0].xp_required {
                return Err(ProgressionError::config(format!(
                    "xp_required must be strictly ascending ({} {} then {} {})",
                    pair[0].rank, pair[0].xp_required, pair[1].rank, pair[1].xp_required
                )));
            }
            if pair[1].level_range.0 != pair[0].level_range.1 + 1 {
                return Err(ProgressionError::config(format!(
                    "level ranges of {} and {} are not contiguous",
                    pair[0].rank, pair[1].rank
                )));
            }
        }
        if self.uncapped_xp_per_level <= 0 {
            return Err(ProgressionError::config(format!(
                "uncapped_xp_per_level must be positive, got {}",
                self.uncapped_xp_per_level
            )));
        }
        Ok(())
    }

    /// Definition for a rank
    pub fn definition(&self, rank: Rank) -> &RankDefinition {
        // validate() guarantees one entry per rank in ordinal order
        &self.ranks[rank.ordinal() as usize - 1]
    }

    fn top(&self) -> &RankDefinition {
        &self.ranks[self.ranks.len() - 1]
    }

    /// Index of the highest rank whose requirement is met
    fn rank_index(&self, total_xp: i64) -> usize {
        self.ranks
            .partition_point(|def| def.xp_required <= total_xp)
            .saturating_sub(1)
    }

    /// Rank reached at a total XP
    pub fn rank_for(&self, total_xp: i64) -> Result<Rank> {
        check_xp(total_xp)?;
        Ok(self.ranks[self.rank_index(total_xp)].rank)
    }

    /// Level, rank, and position within the rank for a total XP
    pub fn level_info(&self, total_xp: i64) -> Result<LevelInfo> {
        check_xp(total_xp)?;
        let idx = self.rank_index(total_xp);
        let def = &self.ranks[idx];
        let xp_in_rank = total_xp - def.xp_required;

        match self.ranks.get(idx + 1) {
            Some(next) => {
                let span = (next.xp_required - def.xp_required) as i128;
                let bands = def.level_count() as i128;
                // floor(progress * bands) + 1, with progress < 1 inside the rank
                let rank_level = ((xp_in_rank as i128 * bands / span) + 1).clamp(1, bands) as u32;
                Ok(LevelInfo {
                    level: def.min_level() + rank_level - 1,
                    rank: def.rank,
                    rank_level,
                })
            }
            None => {
                let extra =
                    u32::try_from(xp_in_rank / self.uncapped_xp_per_level).unwrap_or(u32::MAX);
                let bands = def.level_count();
                Ok(LevelInfo {
                    level: def.max_level().saturating_add(extra),
                    rank: def.rank,
                    rank_level: (extra % bands) + 1,
                })
            }
        }
    }

    /// XP remaining in the current level band and progress through it
    pub fn xp_to_next_level(&self, total_xp: i64) -> Result<NextLevel> {
        check_xp(total_xp)?;
        let idx = self.rank_index(total_xp);
        let def = &self.ranks[idx];
        let xp_in_rank = total_xp - def.xp_required;

        let (band_start, band_end) = match self.ranks.get(idx + 1) {
            Some(next) => {
                let span = (next.xp_required - def.xp_required) as i128;
                let bands = def.level_count() as i128;
                let band = (xp_in_rank as i128 * bands / span).min(bands - 1);
                // Band k covers [ceil(k*span/bands), ceil((k+1)*span/bands)),
                // both edges within [0, span]
                let ceil_div = |n: i128| ((n + bands - 1) / bands) as i64;
                (ceil_div(band * span), ceil_div((band + 1) * span))
            }
            None => {
                let per_level = self.uncapped_xp_per_level;
                let start = xp_in_rank - xp_in_rank % per_level;
                (start, start.saturating_add(per_level))
            }
        };

        let size = band_end - band_start;
        Ok(NextLevel {
            xp_needed: band_end - xp_in_rank,
            progress_percent: (xp_in_rank - band_start) as f64 / size as f64 * 100.0,
        })
    }

    /// One-time bonus for reaching a rank (0 for the starting rank)
    pub fn rank_up_bonus(&self, rank: Rank) -> i64 {
        self.definition(rank).rank_up_bonus
    }

    /// Whether `rank` is the uncapped top of the ladder
    pub fn is_top(&self, rank: Rank) -> bool {
        self.top().rank == rank
    }
}
