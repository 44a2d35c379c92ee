//! AI Republic - minion progression and composition engine
//!
//! Turns training and usage activity into XP, resolves XP into levels and
//! ranks, scores spirit compositions, and gates class unlocks.

pub mod classes;
pub mod core;
pub mod progression;
pub mod score;
pub mod spirits;
