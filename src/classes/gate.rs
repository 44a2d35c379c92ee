//! Class unlock gating
//!
//! A denial is an ordinary outcome, not an error: callers show the reason
//! to the user and move on.

use crate::classes::registry::MinionClass;
use crate::core::types::Rank;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a class is still locked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnlockDenial {
    RankInsufficient { required: Rank, current: Rank },
    LevelInsufficient { required: u32, current: u32 },
}

impl fmt::Display for UnlockDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnlockDenial::RankInsufficient { required, current } => write!(
                f,
                "requires rank {} ({}), currently {} ({})",
                required.ordinal(),
                required,
                current.ordinal(),
                current
            ),
            UnlockDenial::LevelInsufficient { required, current } => {
                write!(f, "requires level {}, currently level {}", required, current)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnlockCheck {
    Granted,
    Denied(UnlockDenial),
}

impl UnlockCheck {
    pub fn is_granted(&self) -> bool {
        matches!(self, UnlockCheck::Granted)
    }

    pub fn denial(&self) -> Option<UnlockDenial> {
        match self {
            UnlockCheck::Granted => None,
            UnlockCheck::Denied(denial) => Some(*denial),
        }
    }

    /// Human-readable reason, suitable for display
    pub fn reason(&self) -> String {
        match self {
            UnlockCheck::Granted => "unlocked".to_string(),
            UnlockCheck::Denied(denial) => denial.to_string(),
        }
    }
}

/// Check whether a user at `rank`/`level` may unlock `class`.
///
/// Rank is compared by ordinal and checked before level.
pub fn can_unlock(class: &MinionClass, rank: Rank, level: u32) -> UnlockCheck {
    if class.unlock_rank > rank {
        return UnlockCheck::Denied(UnlockDenial::RankInsufficient {
            required: class.unlock_rank,
            current: rank,
        });
    }
    if class.unlock_level > level {
        return UnlockCheck::Denied(UnlockDenial::LevelInsufficient {
            required: class.unlock_level,
            current: level,
        });
    }
    UnlockCheck::Granted
}
