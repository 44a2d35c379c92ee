//! Spirits: capabilities composed onto minions
//!
//! Spirits carry sparse synergy and conflict weights toward other spirits.
//! The net performance of a composition is the sum of pairwise synergies
//! minus the sum of pairwise conflicts.

pub mod registry;
pub mod synergy;

pub use registry::{Spirit, SpiritRegistry, SpiritRelations};
pub use synergy::{score_synergy, SpiritPair, SynergyReport};
