//! Keeper Core Rules Engine
//!
//! Platform-agnostic rules for the Keeper investigator builder: derived
//! value math, creation-wizard budgets and limits, and the session-scoped
//! combat and chase trackers. No UI or platform-specific dependencies.

pub mod chase;
pub mod combat;
pub mod derived;
pub mod dice;
pub mod event_log;
pub mod fields;
pub mod skills;
pub mod talents;
pub mod wizard;

// Re-export commonly used types
pub use chase::{
    ChaseTracker, Hazard, HazardId, MoveOutcome, Participant, ParticipantId, ParticipantStatus,
};
pub use combat::{
    ActionKind, ActionRecord, Combatant, CombatantId, CombatantKind, CombatantStatus,
    CombatTracker, MAJOR_WOUND,
};
pub use derived::Derived;
pub use event_log::{EventKind, EventLog, LogEntry};
pub use fields::{FieldCategory, FieldUpdate, FieldValue, InvestigatorId};
pub use skills::{
    CommittedEdit, EditOutcome, PointPools, RevertToken, SKILL_CAP, SkillAllocator,
    SkillCategory, SkillError, SkillField,
};
pub use talents::{TalentError, TalentPicker, ToggleOutcome};
pub use wizard::{AttributeSet, Characteristic, CreationWizard, PersonalInfo, WizardStep};

use serde::{Deserialize, Serialize};

/// Lifecycle shared by both trackers. `Ended` is terminal; only `reset`
/// produces a fresh `Setup` tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackerStatus {
    #[default]
    Setup,
    Active,
    Ended,
}

/// Trait for abstracting tracker persistence.
/// Platform-specific implementations should provide this.
pub trait TrackerStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the combat tracker aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregate cannot be serialized or stored.
    fn save_combat(&self, tracker: &CombatTracker) -> Result<(), Self::Error>;

    /// Load a previously saved combat tracker, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored aggregate exists but cannot be decoded.
    fn load_combat(&self) -> Result<Option<CombatTracker>, Self::Error>;

    /// Persist the chase tracker aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregate cannot be serialized or stored.
    fn save_chase(&self, tracker: &ChaseTracker) -> Result<(), Self::Error>;

    /// Load a previously saved chase tracker, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored aggregate exists but cannot be decoded.
    fn load_chase(&self) -> Result<Option<ChaseTracker>, Self::Error>;
}
