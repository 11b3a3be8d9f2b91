//! Skill point-budget allocation for character creation
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::derived::Derived;
use crate::fields::{FieldCategory, FieldUpdate};

/// Hard cap on any allocation-governed skill value.
pub const SKILL_CAP: i32 = 90;

/// Which point pool a skill draws from. Intrinsic to the field, never
/// inferred from view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Archetype,
    Occupation,
    General,
}

impl SkillCategory {
    pub const ALL: [Self; 3] = [Self::Archetype, Self::Occupation, Self::General];
}

/// One allocatable skill or attribute field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillField {
    pub name: String,
    pub value: i32,
    /// Committed value used to compute point deltas.
    pub previous: i32,
    /// Starting value; the field can never be reduced below this.
    pub default: i32,
    pub category: SkillCategory,
}

impl SkillField {
    #[must_use]
    pub fn new(name: impl Into<String>, default: i32, category: SkillCategory) -> Self {
        Self {
            name: name.into(),
            value: default,
            previous: default,
            default,
            category,
        }
    }

    #[must_use]
    pub fn derived(&self) -> Derived {
        Derived::of(self.value)
    }
}

/// Remaining allocatable points, one pool per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointPools {
    pub archetype: i32,
    pub occupation: i32,
    pub general: i32,
}

impl PointPools {
    #[must_use]
    pub const fn get(&self, category: SkillCategory) -> i32 {
        match category {
            SkillCategory::Archetype => self.archetype,
            SkillCategory::Occupation => self.occupation,
            SkillCategory::General => self.general,
        }
    }

    pub const fn set(&mut self, category: SkillCategory, points: i32) {
        match category {
            SkillCategory::Archetype => self.archetype = points,
            SkillCategory::Occupation => self.occupation = points,
            SkillCategory::General => self.general = points,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SkillError {
    #[error("unknown skill field: {0}")]
    UnknownField(String),
}

/// Everything needed to undo a committed edit if persistence fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertToken {
    pub field: String,
    pub previous: i32,
    pub category: SkillCategory,
    /// Points taken from (positive) or returned to (negative) the pool.
    pub spent: i32,
}

/// A successfully committed edit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedEdit {
    pub field: String,
    pub value: i32,
    /// True when the proposed value was pulled back into bounds first.
    pub clamped: bool,
    pub derived: Derived,
    pub category: SkillCategory,
    pub remaining: i32,
    /// The pool for this category is exactly spent.
    pub category_complete: bool,
    /// The general pool is spent, which finishes the build.
    pub build_complete: bool,
    pub revert: RevertToken,
}

impl CommittedEdit {
    /// The change to hand to the persistence collaborator.
    #[must_use]
    pub fn update(&self) -> FieldUpdate {
        FieldUpdate::new(FieldCategory::Skills, self.field.clone(), self.value)
    }
}

/// Result of proposing a new value for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Committed(Box<CommittedEdit>),
    /// The edit would overdraw the pool; nothing changed.
    Rejected { reverted_to: i32 },
    /// Clamping produced the already-committed value; nothing to do.
    Unchanged { value: i32 },
}

/// Point-budget allocator shared by the wizard's skill step and the sheet's
/// editable skill fields. The single source of truth for field values:
/// mirrored inputs render from here, never the other way around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SkillAllocator {
    fields: BTreeMap<String, SkillField>,
    pools: PointPools,
}

impl SkillAllocator {
    #[must_use]
    pub fn new(pools: PointPools) -> Self {
        Self {
            fields: BTreeMap::new(),
            pools,
        }
    }

    pub fn add_field(&mut self, field: SkillField) {
        self.fields.insert(field.name.clone(), field);
    }

    #[must_use]
    pub fn with_field(mut self, field: SkillField) -> Self {
        self.add_field(field);
        self
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SkillField> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.fields.get(name).map(|f| f.value)
    }

    #[must_use]
    pub fn fields(&self) -> impl Iterator<Item = &SkillField> {
        self.fields.values()
    }

    #[must_use]
    pub const fn pools(&self) -> PointPools {
        self.pools
    }

    #[must_use]
    pub const fn remaining(&self, category: SkillCategory) -> i32 {
        self.pools.get(category)
    }

    /// All points for the category are spent, enabling its confirm action.
    #[must_use]
    pub const fn category_complete(&self, category: SkillCategory) -> bool {
        self.pools.get(category) == 0
    }

    /// Propose a new value for a field. Clamps into `[default, SKILL_CAP]`,
    /// charges the category's pool for the delta, and rejects any edit that
    /// would drive the pool negative, leaving field and pool untouched.
    ///
    /// # Errors
    ///
    /// Returns `SkillError::UnknownField` if no field with this name exists.
    pub fn apply_edit(&mut self, name: &str, proposed: i32) -> Result<EditOutcome, SkillError> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| SkillError::UnknownField(name.to_string()))?;

        let target = proposed.max(field.default).min(SKILL_CAP);
        let clamped = target != proposed;
        let difference = target - field.previous;
        if difference == 0 {
            // Display may have drifted (e.g. an over-cap keystroke); snap back.
            field.value = target;
            return Ok(EditOutcome::Unchanged { value: target });
        }

        let category = field.category;
        let remaining = self.pools.get(category) - difference;
        if remaining < 0 {
            field.value = field.previous;
            return Ok(EditOutcome::Rejected {
                reverted_to: field.previous,
            });
        }

        let revert = RevertToken {
            field: field.name.clone(),
            previous: field.previous,
            category,
            spent: difference,
        };
        field.value = target;
        field.previous = target;
        self.pools.set(category, remaining);

        let category_complete = remaining == 0;
        Ok(EditOutcome::Committed(Box::new(CommittedEdit {
            field: name.to_string(),
            value: target,
            clamped,
            derived: Derived::of(target),
            category,
            remaining,
            category_complete,
            build_complete: category_complete && category == SkillCategory::General,
            revert,
        })))
    }

    /// Undo a committed edit (persistence failed downstream).
    ///
    /// # Errors
    ///
    /// Returns `SkillError::UnknownField` if the token's field no longer exists.
    pub fn rollback(&mut self, token: &RevertToken) -> Result<(), SkillError> {
        let field = self
            .fields
            .get_mut(&token.field)
            .ok_or_else(|| SkillError::UnknownField(token.field.clone()))?;
        field.value = token.previous;
        field.previous = token.previous;
        let refunded = self.pools.get(token.category) + token.spent;
        self.pools.set(token.category, refunded);
        Ok(())
    }
}
