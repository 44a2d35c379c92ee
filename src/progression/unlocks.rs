//! Rank-gated skillset unlocks
//!
//! Unlocks are cumulative: a minion at rank R can use every skillset listed
//! for ranks 1 through R.

use crate::core::error::{ProgressionError, Result};
use crate::core::types::Rank;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockEntry {
    pub rank: Rank,
    pub skillsets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockTable {
    entries: Vec<UnlockEntry>,
}

fn entry(rank: Rank, skillsets: &[&str]) -> UnlockEntry {
    UnlockEntry {
        rank,
        skillsets: skillsets.iter().map(|s| s.to_string()).collect(),
    }
}

impl Default for UnlockTable {
    fn default() -> Self {
        Self {
            entries: vec![
                entry(Rank::Novice, &["Web Search"]),
                entry(Rank::Skilled, &["File Operations", "Code Execution"]),
                entry(Rank::Specialist, &["API Integration", "Database Query"]),
                entry(Rank::Expert, &["Image Processing", "Email Operations"]),
                entry(Rank::Master, &["Calendar Management", "Advanced Analytics"]),
                entry(Rank::Grandmaster, &["Multi-Agent Orchestration", "Self-Improvement"]),
                entry(Rank::Autonomous, &["Autonomous Decision Making"]),
            ],
        }
    }
}

impl UnlockTable {
    pub fn new(entries: Vec<UnlockEntry>) -> Result<Self> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    pub fn entries(&self) -> &[UnlockEntry] {
        &self.entries
    }

    /// Entries must be strictly ascending by rank, and a skillset may only be
    /// unlocked once.
    pub fn validate(&self) -> Result<()> {
        for pair in self.entries.windows(2) {
            if pair[1].rank <= pair[0].rank {
                return Err(ProgressionError::config(format!(
                    "unlock table must be strictly ascending by rank ({} then {})",
                    pair[0].rank, pair[1].rank
                )));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for name in self.entries.iter().flat_map(|e| e.skillsets.iter()) {
            if !seen.insert(name.as_str()) {
                return Err(ProgressionError::config(format!(
                    "skillset '{}' is unlocked more than once",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Skillsets unlocked exactly at `rank`
    pub fn at(&self, rank: Rank) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.rank == rank)
            .map(|e| e.skillsets.as_slice())
            .unwrap_or(&[])
    }

    /// Every skillset available at `rank`, in unlock order
    pub fn unlocked_through(&self, rank: Rank) -> Vec<String> {
        self.entries
            .iter()
            .take_while(|e| e.rank <= rank)
            .flat_map(|e| e.skillsets.iter().cloned())
            .collect()
    }

    /// Skillsets gained moving from `old` to `new`; empty unless `new` is higher
    pub fn newly_unlocked(&self, old: Rank, new: Rank) -> Vec<String> {
        Rank::ALL
            .into_iter()
            .filter(|&rank| rank > old && rank <= new)
            .flat_map(|rank| self.at(rank).iter().cloned())
            .collect()
    }
}
