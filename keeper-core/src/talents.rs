//! Talent selection with an exact-count slot limit
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::fields::{FieldCategory, FieldUpdate};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TalentError {
    #[error("unknown talent: {0}")]
    UnknownTalent(String),
}

/// Result of toggling a talent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected { remaining: usize },
    Deselected { remaining: usize },
    /// All slots are taken; the selection set did not change.
    LimitReached,
}

impl ToggleOutcome {
    /// The change to hand to the persistence collaborator, if any.
    #[must_use]
    pub fn update(&self, talent: &str) -> Option<FieldUpdate> {
        match self {
            Self::Selected { .. } => Some(FieldUpdate::new(FieldCategory::Talents, talent, true)),
            Self::Deselected { .. } => Some(FieldUpdate::new(FieldCategory::Talents, talent, false)),
            Self::LimitReached => None,
        }
    }
}

/// Enforces "pick exactly N talents out of the catalog".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TalentPicker {
    catalog: BTreeSet<String>,
    selected: BTreeSet<String>,
    max_talents: usize,
}

impl TalentPicker {
    #[must_use]
    pub fn new(catalog: impl IntoIterator<Item = String>, max_talents: usize) -> Self {
        Self {
            catalog: catalog.into_iter().collect(),
            selected: BTreeSet::new(),
            max_talents,
        }
    }

    #[must_use]
    pub fn is_selected(&self, talent: &str) -> bool {
        self.selected.contains(talent)
    }

    #[must_use]
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Open slots. Saturates at zero for deserialized pickers that carry
    /// more selections than the cap.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.max_talents.saturating_sub(self.selected.len())
    }

    /// Exactly `max_talents` picked; the continue affordance unlocks.
    #[must_use]
    pub fn complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Select or deselect a talent, enforcing the slot cap.
    ///
    /// # Errors
    ///
    /// Returns `TalentError::UnknownTalent` for names outside the catalog.
    pub fn toggle(&mut self, talent: &str) -> Result<ToggleOutcome, TalentError> {
        if !self.catalog.contains(talent) {
            return Err(TalentError::UnknownTalent(talent.to_string()));
        }
        if self.selected.remove(talent) {
            return Ok(ToggleOutcome::Deselected {
                remaining: self.remaining(),
            });
        }
        if self.remaining() == 0 {
            return Ok(ToggleOutcome::LimitReached);
        }
        self.selected.insert(talent.to_string());
        Ok(ToggleOutcome::Selected {
            remaining: self.remaining(),
        })
    }

    /// Undo a toggle after a persistence failure.
    pub fn revert(&mut self, talent: &str, outcome: &ToggleOutcome) {
        match outcome {
            ToggleOutcome::Selected { .. } => {
                self.selected.remove(talent);
            }
            ToggleOutcome::Deselected { .. } => {
                if self.catalog.contains(talent) && self.selected.len() < self.max_talents {
                    self.selected.insert(talent.to_string());
                }
            }
            ToggleOutcome::LimitReached => {}
        }
    }
}
