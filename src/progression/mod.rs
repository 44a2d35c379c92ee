//! Minion progression
//!
//! Activity becomes XP through the curve and the training/usage policies;
//! cumulative XP maps onto the seven-rank ladder, and crossing a rank unlocks
//! skillsets and earns a one-time bonus.

pub mod curve;
pub mod rank;
pub mod transition;
pub mod unlocks;
pub mod xp;

pub use curve::{XpBreakpoint, XpCurve, DEFAULT_BREAKPOINTS};
pub use rank::{LevelInfo, NextLevel, RankDefinition, RankLadder};
pub use transition::{Transition, XpAward};
pub use unlocks::{UnlockEntry, UnlockTable};
pub use xp::{TrainingXp, XpEntry, XpSource};
