//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for minions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MinionId(pub Uuid);

impl MinionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MinionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of a spirit (capability), e.g. `"analyst"`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpiritId(pub String);

impl SpiritId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SpiritId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SpiritId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for SpiritId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Progression rank. Ordering is by ordinal; names are display-only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[repr(u8)]
pub enum Rank {
    #[default]
    Novice = 1,
    Skilled = 2,
    Specialist = 3,
    Expert = 4,
    Master = 5,
    Grandmaster = 6,
    Autonomous = 7,
}

impl Rank {
    /// All ranks, lowest first
    pub const ALL: [Rank; 7] = [
        Rank::Novice,
        Rank::Skilled,
        Rank::Specialist,
        Rank::Expert,
        Rank::Master,
        Rank::Grandmaster,
        Rank::Autonomous,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(value: u8) -> Option<Rank> {
        Rank::ALL.get((value as usize).checked_sub(1)?).copied()
    }

    /// Human-readable name for this rank
    pub fn name(&self) -> &'static str {
        match self {
            Rank::Novice => "Novice",
            Rank::Skilled => "Skilled",
            Rank::Specialist => "Specialist",
            Rank::Expert => "Expert",
            Rank::Master => "Master",
            Rank::Grandmaster => "Grandmaster",
            Rank::Autonomous => "Autonomous",
        }
    }

    /// Case-insensitive lookup by display name
    pub fn from_name(name: &str) -> Option<Rank> {
        Rank::ALL
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Returns true if this rank outranks the other
    pub fn outranks(&self, other: &Rank) -> bool {
        (*self as u8) > (*other as u8)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(n) = s.trim().parse::<u8>() {
            return Rank::from_ordinal(n).ok_or_else(|| format!("rank ordinal out of range: {}", n));
        }
        Rank::from_name(s).ok_or_else(|| format!("unknown rank: {}", s))
    }
}
