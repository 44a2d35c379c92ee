//! Score breakdown for a minion

use crate::core::config::EngineConfig;
use crate::core::error::{ProgressionError, Result};
use crate::core::types::Rank;
use serde::{Deserialize, Serialize};

/// Cap on the XP/level component
const MAX_XP_SCORE: f64 = 50.0;

/// Points per level in the XP component
const POINTS_PER_LEVEL: f64 = 5.0;

/// XP per point in the XP component
const XP_PER_POINT: f64 = 100.0;

/// Rank bonus, indexed by ordinal - 1
const RANK_SCORES: [u32; 7] = [0, 10, 15, 20, 22, 24, 25];

/// Points per billion parameters, and the cap
const PARAM_POINTS_PER_BILLION: f64 = 0.5;
const MAX_PARAM_SCORE: f64 = 15.0;

/// Context tokens per point, and the cap
const CONTEXT_TOKENS_PER_POINT: f64 = 20_000.0;
const MAX_CONTEXT_SCORE: f64 = 10.0;

const POINTS_PER_CAPABILITY: u32 = 2;
const MAX_CAPABILITY_SCORE: u32 = 10;

/// Model family bonuses, checked in order against the lowercased name
const ARCHITECTURE_SCORES: [(&str, u32); 4] = [("llama", 5), ("gemma", 4), ("mistral", 3), ("qwen", 2)];
const DEFAULT_ARCHITECTURE_SCORE: u32 = 1;

/// What the score is computed from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreInputs {
    /// Training plus usage XP
    pub total_xp: i64,
    pub parameters_billions: f64,
    pub context_length: u64,
    pub capability_count: u32,
    /// Model family or type, e.g. "llama3.1"
    pub architecture: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinionScore {
    pub level: u32,
    pub rank: Rank,
    /// 0-50
    pub xp_score: f64,
    /// 0-25
    pub rank_score: u32,
    /// 0-15
    pub param_score: f64,
    /// 0-10
    pub context_score: f64,
    /// 0-10
    pub cap_score: u32,
    /// 1-5
    pub arch_score: u32,
    pub total: i64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn architecture_score(architecture: &str) -> u32 {
    let lower = architecture.to_lowercase();
    ARCHITECTURE_SCORES
        .iter()
        .find(|(family, _)| lower.contains(family))
        .map(|(_, score)| *score)
        .unwrap_or(DEFAULT_ARCHITECTURE_SCORE)
}

impl MinionScore {
    /// Compute the breakdown. Level and rank come from the configured ladder.
    pub fn compute(config: &EngineConfig, inputs: &ScoreInputs) -> Result<Self> {
        if !inputs.parameters_billions.is_finite() || inputs.parameters_billions < 0.0 {
            return Err(ProgressionError::invalid(format!(
                "parameters_billions must be a non-negative number, got {}",
                inputs.parameters_billions
            )));
        }
        let info = config.level_info(inputs.total_xp)?;

        let xp_score = (info.level as f64 * POINTS_PER_LEVEL + inputs.total_xp as f64 / XP_PER_POINT)
            .min(MAX_XP_SCORE);
        let rank_score = RANK_SCORES[usize::from(info.rank.ordinal()) - 1];
        let param_score = (inputs.parameters_billions * PARAM_POINTS_PER_BILLION).min(MAX_PARAM_SCORE);
        let context_score =
            (inputs.context_length as f64 / CONTEXT_TOKENS_PER_POINT).min(MAX_CONTEXT_SCORE);
        let cap_score = inputs
            .capability_count
            .saturating_mul(POINTS_PER_CAPABILITY)
            .min(MAX_CAPABILITY_SCORE);
        let arch_score = architecture_score(&inputs.architecture);

        let sum = xp_score
            + f64::from(rank_score)
            + param_score
            + context_score
            + f64::from(cap_score)
            + f64::from(arch_score);
        // Every component is capped, so the sum always fits
        let total = sum.round_ties_even() as i64;

        Ok(Self {
            level: info.level,
            rank: info.rank,
            xp_score: round1(xp_score),
            rank_score,
            param_score: round1(param_score),
            context_score: round1(context_score),
            cap_score,
            arch_score,
            total,
        })
    }
}

/// Parse a parameter size such as `"7B"` or `"1.5b"` into billions.
/// Anything without a `B` suffix is not understood.
pub fn parse_parameter_size(size: &str) -> Option<f64> {
    let trimmed = size.trim();
    let number = trimmed
        .strip_suffix('B')
        .or_else(|| trimmed.strip_suffix('b'))?;
    let value: f64 = number.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(total_xp: i64) -> ScoreInputs {
        ScoreInputs {
            total_xp,
            parameters_billions: 7.0,
            context_length: 128_000,
            capability_count: 3,
            architecture: "llama3.1".to_string(),
        }
    }

    #[test]
    fn test_fresh_minion() {
        let score = MinionScore::compute(&EngineConfig::default(), &inputs(0)).unwrap();
        assert_eq!(score.level, 1);
        assert_eq!(score.rank, Rank::Novice);
        assert_eq!(score.xp_score, 5.0);
        assert_eq!(score.rank_score, 0);
        assert_eq!(score.param_score, 3.5);
        assert_eq!(score.context_score, 6.4);
        assert_eq!(score.cap_score, 6);
        assert_eq!(score.arch_score, 5);
        // 5 + 0 + 3.5 + 6.4 + 6 + 5 = 25.9
        assert_eq!(score.total, 26);
    }

    #[test]
    fn test_trained_minion() {
        // 1877 XP: level 7, Skilled
        let score = MinionScore::compute(&EngineConfig::default(), &inputs(1877)).unwrap();
        assert_eq!(score.level, 7);
        assert_eq!(score.rank_score, 10);
        // 7 * 5 + 18.77 exceeds the cap
        assert_eq!(score.xp_score, 50.0);
    }

    #[test]
    fn test_components_are_capped() {
        let score = MinionScore::compute(
            &EngineConfig::default(),
            &ScoreInputs {
                total_xp: 500_000,
                parameters_billions: 405.0,
                context_length: 2_000_000,
                capability_count: 40,
                architecture: "Qwen2".to_string(),
            },
        )
        .unwrap();
        assert_eq!(score.xp_score, 50.0);
        assert_eq!(score.rank_score, 25);
        assert_eq!(score.param_score, 15.0);
        assert_eq!(score.context_score, 10.0);
        assert_eq!(score.cap_score, 10);
        assert_eq!(score.arch_score, 2);
        assert_eq!(score.total, 112);
    }

    #[test]
    fn test_unknown_architecture() {
        assert_eq!(architecture_score("phi-3"), 1);
        assert_eq!(architecture_score(""), 1);
        assert_eq!(architecture_score("CodeGemma"), 4);
    }

    #[test]
    fn test_invalid_inputs() {
        let config = EngineConfig::default();
        assert!(MinionScore::compute(&config, &inputs(-1)).is_err());

        let mut bad = inputs(0);
        bad.parameters_billions = f64::NAN;
        assert!(matches!(
            MinionScore::compute(&config, &bad),
            Err(ProgressionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_parameter_size() {
        assert_eq!(parse_parameter_size("7B"), Some(7.0));
        assert_eq!(parse_parameter_size(" 1.5b "), Some(1.5));
        assert_eq!(parse_parameter_size("70"), None);
        assert_eq!(parse_parameter_size("xB"), None);
        assert_eq!(parse_parameter_size("-3B"), None);
    }
}
