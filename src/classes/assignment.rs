//! Spirit assignments on a minion and class assignment

use crate::classes::registry::MinionClass;
use crate::core::error::{ProgressionError, Result as ProgressionResult};
use crate::core::types::{MinionId, SpiritId};
use crate::spirits::{score_synergy, Spirit, SpiritRegistry, SpiritRelations, SynergyReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur when assigning a class
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    #[error("Minion already has class '{existing}' assigned")]
    AlreadyAssigned { existing: String },
}

/// A spirit assigned to a minion, with its own progression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiritAssignment {
    pub spirit: SpiritId,
    pub level: u32,
    pub xp: i64,
}

impl SpiritAssignment {
    /// Fresh assignment at level 1 with no XP
    pub fn new(spirit: SpiritId) -> Self {
        Self {
            spirit,
            level: 1,
            xp: 0,
        }
    }
}

/// Result of a successful class assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassAssignment {
    pub class: String,
    /// Assignments created by this call; spirits already held are not listed
    pub created: Vec<SpiritAssignment>,
    /// Nominal report over the class's own spirits
    pub report: SynergyReport,
}

/// The spirits and class currently held by one minion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinionLoadout {
    pub minion: MinionId,
    pub class: Option<String>,
    pub assignments: BTreeMap<SpiritId, SpiritAssignment>,
}

impl MinionLoadout {
    pub fn new(minion: MinionId) -> Self {
        Self {
            minion,
            class: None,
            assignments: BTreeMap::new(),
        }
    }

    pub fn has_spirit(&self, spirit: &str) -> bool {
        self.assignments.contains_key(spirit)
    }

    /// Assign a single spirit. Returns the new assignment, or `None` if the
    /// spirit was already held (the existing one is left untouched).
    pub fn grant_spirit(&mut self, spirit: SpiritId) -> Option<SpiritAssignment> {
        if self.assignments.contains_key(&spirit) {
            return None;
        }
        let assignment = SpiritAssignment::new(spirit.clone());
        self.assignments.insert(spirit, assignment.clone());
        Some(assignment)
    }

    /// Set a spirit's level and XP, adding the spirit if it is not held yet.
    /// The level is clamped to `1..=spirit.max_level`.
    pub fn set_spirit_progress(
        &mut self,
        spirit: &Spirit,
        level: u32,
        xp: i64,
    ) -> ProgressionResult<SpiritAssignment> {
        if xp < 0 {
            return Err(ProgressionError::invalid(format!(
                "spirit XP must be non-negative, got {}",
                xp
            )));
        }
        let level = level.clamp(1, spirit.max_level.max(1));
        let assignment = self
            .assignments
            .entry(spirit.id.clone())
            .or_insert_with(|| SpiritAssignment::new(spirit.id.clone()));
        assignment.level = level;
        assignment.xp = xp;

        tracing::debug!(spirit = %spirit.id, level, xp, "spirit progress set");
        Ok(assignment.clone())
    }

    /// Tools usable through the held spirits at their current levels, in
    /// spirit id order. Spirits missing from the registry contribute nothing.
    pub fn usable_tools<'a>(&self, registry: &'a SpiritRegistry) -> Vec<&'a str> {
        self.assignments
            .values()
            .filter_map(|a| registry.get(a.spirit.as_str()).map(|s| (s, a.level)))
            .flat_map(|(spirit, level)| spirit.tools_at_level(level))
            .map(String::as_str)
            .collect()
    }

    /// Actual performance over the live assignment set
    pub fn net_performance<R: SpiritRelations + ?Sized>(&self, relations: &R) -> SynergyReport {
        score_synergy(self.assignments.keys(), relations)
    }

    /// Assign a class. A minion holds at most one class; spirits it already
    /// has keep their level and XP.
    pub fn assign_class<R: SpiritRelations + ?Sized>(
        &mut self,
        class: &MinionClass,
        relations: &R,
    ) -> Result<ClassAssignment, AssignError> {
        if let Some(existing) = &self.class {
            return Err(AssignError::AlreadyAssigned {
                existing: existing.clone(),
            });
        }

        let created: Vec<SpiritAssignment> = class
            .spirits
            .iter()
            .filter_map(|spirit| self.grant_spirit(spirit.clone()))
            .collect();
        self.class = Some(class.name.clone());

        tracing::info!(
            minion = %self.minion.0,
            class = %class.name,
            created = created.len(),
            "class assigned"
        );

        Ok(ClassAssignment {
            class: class.name.clone(),
            created,
            report: class.nominal_performance(relations),
        })
    }
}
