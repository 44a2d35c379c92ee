//! Minion classes: pre-built spirit bundles, unlock gating and assignment

pub mod assignment;
pub mod gate;
pub mod registry;

pub use assignment::{AssignError, ClassAssignment, MinionLoadout, SpiritAssignment};
pub use gate::{can_unlock, UnlockCheck, UnlockDenial};
pub use registry::{ClassRegistry, MinionClass};
