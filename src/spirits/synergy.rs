//! Synergy / conflict scoring for a set of spirits
//!
//! Every unordered pair is visited once. Relations are stored on one side
//! only, so each relation type looks at `a -> b` first and falls back to
//! `b -> a`; a relation configured on both sides counts once.

use crate::core::types::SpiritId;
use crate::spirits::registry::SpiritRelations;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A scored pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpiritPair {
    pub spirits: (SpiritId, SpiritId),
    pub weight: f64,
}

/// Net effect of composing a set of spirits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynergyReport {
    pub synergy_bonus: f64,
    /// Sum of absolute conflict weights
    pub conflict_penalty: f64,
    /// `synergy_bonus - conflict_penalty`; negative when conflicts dominate
    pub net_performance: f64,
    pub synergy_pairs: Vec<SpiritPair>,
    pub conflict_pairs: Vec<SpiritPair>,
}

impl SynergyReport {
    pub fn has_conflicts(&self) -> bool {
        !self.conflict_pairs.is_empty()
    }
}

/// Score a set of spirits. Duplicate ids are ignored; pairs are reported in
/// sorted id order.
pub fn score_synergy<'a, I, R>(ids: I, relations: &R) -> SynergyReport
where
    I: IntoIterator<Item = &'a SpiritId>,
    R: SpiritRelations + ?Sized,
{
    let ids: Vec<&SpiritId> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    let mut report = SynergyReport::default();

    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            let synergy = relations.synergy(a, b).or_else(|| relations.synergy(b, a));
            if let Some(weight) = synergy {
                report.synergy_bonus += weight;
                report.synergy_pairs.push(SpiritPair {
                    spirits: ((*a).clone(), (*b).clone()),
                    weight,
                });
            }

            let conflict = relations.conflict(a, b).or_else(|| relations.conflict(b, a));
            if let Some(weight) = conflict {
                let penalty = weight.abs();
                report.conflict_penalty += penalty;
                report.conflict_pairs.push(SpiritPair {
                    spirits: ((*a).clone(), (*b).clone()),
                    weight: penalty,
                });
            }
        }
    }

    report.net_performance = report.synergy_bonus - report.conflict_penalty;

    tracing::debug!(
        spirits = ids.len(),
        synergy = report.synergy_bonus,
        conflict = report.conflict_penalty,
        net = report.net_performance,
        "synergy scored"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spirits::registry::{Spirit, SpiritRegistry};

    fn ids(names: &[&str]) -> Vec<SpiritId> {
        names.iter().map(|n| SpiritId::from(*n)).collect()
    }

    fn registry(spirits: Vec<Spirit>) -> SpiritRegistry {
        let mut registry = SpiritRegistry::new();
        for spirit in spirits {
            registry.register(spirit);
        }
        registry
    }

    #[test]
    fn test_empty_and_single() {
        let reg = registry(vec![Spirit::new("a", "x").with_synergy("b", 0.5)]);
        assert_eq!(score_synergy(&ids(&[]), &reg), SynergyReport::default());
        assert_eq!(score_synergy(&ids(&["a"]), &reg), SynergyReport::default());
    }

    #[test]
    fn test_relation_found_from_either_side() {
        let reg = registry(vec![
            Spirit::new("a", "x"),
            Spirit::new("b", "x").with_synergy("a", 0.25),
        ]);
        let report = score_synergy(&ids(&["a", "b"]), &reg);
        assert_eq!(report.synergy_bonus, 0.25);
        assert_eq!(report.synergy_pairs.len(), 1);
        assert_eq!(report.synergy_pairs[0].spirits, (SpiritId::from("a"), SpiritId::from("b")));
    }

    #[test]
    fn test_symmetric_configuration_counts_once() {
        let reg = registry(vec![
            Spirit::new("a", "x").with_synergy("b", 0.3),
            Spirit::new("b", "x").with_synergy("a", 0.3),
        ]);
        let report = score_synergy(&ids(&["a", "b"]), &reg);
        assert_eq!(report.synergy_bonus, 0.3);
        assert_eq!(report.synergy_pairs.len(), 1);
    }

    #[test]
    fn test_forward_side_wins_when_both_configured() {
        let reg = registry(vec![
            Spirit::new("a", "x").with_synergy("b", 0.2),
            Spirit::new("b", "x").with_synergy("a", 0.9),
        ]);
        let report = score_synergy(&ids(&["b", "a"]), &reg);
        // Pairs are visited in sorted order, so a -> b is checked first
        assert_eq!(report.synergy_bonus, 0.2);
    }

    #[test]
    fn test_conflicts_only_is_negative() {
        let reg = registry(vec![
            Spirit::new("a", "x").with_conflict("b", -0.2),
            Spirit::new("b", "x").with_conflict("c", 0.1),
            Spirit::new("c", "x"),
        ]);
        let report = score_synergy(&ids(&["a", "b", "c"]), &reg);
        assert_eq!(report.synergy_bonus, 0.0);
        assert!((report.conflict_penalty - 0.3).abs() < 1e-12);
        assert!(report.net_performance < 0.0);
        assert!(report.has_conflicts());
    }

    #[test]
    fn test_synergy_and_conflict_on_same_pair() {
        let reg = registry(vec![
            Spirit::new("a", "x").with_synergy("b", 0.4).with_conflict("b", 0.1),
            Spirit::new("b", "x"),
        ]);
        let report = score_synergy(&ids(&["a", "b"]), &reg);
        assert_eq!(report.synergy_pairs.len(), 1);
        assert_eq!(report.conflict_pairs.len(), 1);
        assert!((report.net_performance - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_duplicates_and_unknown_ids_ignored() {
        let reg = registry(vec![
            Spirit::new("a", "x").with_synergy("b", 0.5),
            Spirit::new("b", "x"),
        ]);
        let report = score_synergy(&ids(&["a", "b", "a", "ghost"]), &reg);
        assert_eq!(report.synergy_bonus, 0.5);
        assert_eq!(report.synergy_pairs.len(), 1);
    }
}
