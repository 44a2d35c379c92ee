//! Minion scoring
//!
//! A single leaderboard number built from progression (level, rank) and
//! model specs (parameter count, context window, capabilities, family).

pub mod calculator;

pub use calculator::{parse_parameter_size, MinionScore, ScoreInputs};
