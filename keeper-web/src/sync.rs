//! Optimistic local commits with revert-on-persistence-failure
//!
//! Wizard edits apply locally first so the UI never waits on the network,
//! then push one field update. If the push fails the local commit is undone
//! and the error surfaced; the sheet must never show a value the backend
//! refused to store. Validation rejections stay local and cost no request.

use keeper_core::skills::{EditOutcome, SkillAllocator, SkillError};
use keeper_core::talents::{TalentError, TalentPicker, ToggleOutcome};
use keeper_core::{FieldUpdate, InvestigatorId};

/// The remote end of the field-update flow. Implemented by
/// [`crate::ApiClient`]; test builds substitute an in-memory double.
pub trait RemoteFields {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn update_field(
        &self,
        id: &InvestigatorId,
        update: &FieldUpdate,
    ) -> Result<(), Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError<E: std::error::Error> {
    #[error(transparent)]
    Skill(#[from] SkillError),
    #[error(transparent)]
    Talent(#[from] TalentError),
    /// The backend refused or never saw the update; the local commit was
    /// already reverted when this is returned.
    #[error("persistence failed, change reverted: {0}")]
    Persistence(E),
}

/// Apply a proposed skill value, then persist it. Rejections and no-op
/// edits resolve locally without touching the network.
///
/// # Errors
///
/// `SyncError::Skill` for unknown field names, `SyncError::Persistence`
/// when the backend call fails (the edit has been rolled back).
pub async fn commit_skill_edit<R: RemoteFields>(
    skills: &mut SkillAllocator,
    remote: &R,
    id: &InvestigatorId,
    field: &str,
    proposed: i32,
) -> Result<EditOutcome, SyncError<R::Error>> {
    let outcome = skills.apply_edit(field, proposed)?;
    if let EditOutcome::Committed(edit) = &outcome
        && let Err(e) = remote.update_field(id, &edit.update()).await
    {
        log::warn!("update for skill '{field}' failed, reverting: {e}");
        skills.rollback(&edit.revert)?;
        return Err(SyncError::Persistence(e));
    }
    Ok(outcome)
}

/// Toggle a talent, then persist the new flag. A toggle refused by the
/// slot limit resolves locally without a request.
///
/// # Errors
///
/// `SyncError::Talent` for names outside the catalog,
/// `SyncError::Persistence` when the backend call fails (the toggle has
/// been reverted).
pub async fn commit_talent_toggle<R: RemoteFields>(
    talents: &mut TalentPicker,
    remote: &R,
    id: &InvestigatorId,
    talent: &str,
) -> Result<ToggleOutcome, SyncError<R::Error>> {
    let outcome = talents.toggle(talent)?;
    if let Some(update) = outcome.update(talent)
        && let Err(e) = remote.update_field(id, &update).await
    {
        log::warn!("update for talent '{talent}' failed, reverting: {e}");
        talents.revert(talent, &outcome);
        return Err(SyncError::Persistence(e));
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use keeper_core::skills::{PointPools, SkillCategory, SkillField};
    use keeper_core::{FieldCategory, FieldValue};
    use std::cell::RefCell;

    #[derive(Debug, thiserror::Error)]
    #[error("backend unavailable")]
    struct Unavailable;

    /// Records every update; optionally refuses them all.
    #[derive(Default)]
    struct FakeRemote {
        updates: RefCell<Vec<FieldUpdate>>,
        fail: bool,
    }

    impl RemoteFields for FakeRemote {
        type Error = Unavailable;

        async fn update_field(
            &self,
            _id: &InvestigatorId,
            update: &FieldUpdate,
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(Unavailable);
            }
            self.updates.borrow_mut().push(update.clone());
            Ok(())
        }
    }

    fn skills() -> SkillAllocator {
        SkillAllocator::new(PointPools {
            general: 5,
            ..PointPools::default()
        })
        .with_field(SkillField::new("Dodge", 40, SkillCategory::General))
    }

    fn investigator() -> InvestigatorId {
        InvestigatorId::new("inv-1")
    }

    #[test]
    fn committed_edit_is_persisted() {
        let mut skills = skills();
        let remote = FakeRemote::default();
        let outcome = block_on(commit_skill_edit(
            &mut skills,
            &remote,
            &investigator(),
            "Dodge",
            43,
        ))
        .unwrap();
        assert!(matches!(outcome, EditOutcome::Committed(_)));
        assert_eq!(skills.value_of("Dodge"), Some(43));

        let updates = remote.updates.borrow();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].category, FieldCategory::Skills);
        assert_eq!(updates[0].value, FieldValue::Int(43));
    }

    #[test]
    fn failed_persistence_reverts_the_edit() {
        let mut skills = skills();
        let remote = FakeRemote {
            fail: true,
            ..FakeRemote::default()
        };
        let result = block_on(commit_skill_edit(
            &mut skills,
            &remote,
            &investigator(),
            "Dodge",
            43,
        ));
        assert!(matches!(result, Err(SyncError::Persistence(_))));
        assert_eq!(skills.value_of("Dodge"), Some(40), "value rolled back");
        assert_eq!(skills.remaining(SkillCategory::General), 5, "points refunded");
    }

    #[test]
    fn rejected_edit_never_reaches_the_network() {
        let mut skills = skills();
        let remote = FakeRemote::default();
        let outcome = block_on(commit_skill_edit(
            &mut skills,
            &remote,
            &investigator(),
            "Dodge",
            47,
        ))
        .unwrap();
        assert!(matches!(outcome, EditOutcome::Rejected { reverted_to: 40 }));
        assert!(remote.updates.borrow().is_empty());
    }

    #[test]
    fn unknown_field_is_a_local_error() {
        let mut skills = skills();
        let remote = FakeRemote::default();
        let result = block_on(commit_skill_edit(
            &mut skills,
            &remote,
            &investigator(),
            "Cthulhu Mythos",
            5,
        ));
        assert!(matches!(result, Err(SyncError::Skill(_))));
        assert!(remote.updates.borrow().is_empty());
    }

    fn talents() -> TalentPicker {
        TalentPicker::new(["Keen Vision", "Endurance"].map(String::from), 1)
    }

    #[test]
    fn talent_toggle_persists_a_flag() {
        let mut picker = talents();
        let remote = FakeRemote::default();
        let outcome = block_on(commit_talent_toggle(
            &mut picker,
            &remote,
            &investigator(),
            "Keen Vision",
        ))
        .unwrap();
        assert!(matches!(outcome, ToggleOutcome::Selected { .. }));

        let updates = remote.updates.borrow();
        assert_eq!(updates[0].category, FieldCategory::Talents);
        assert_eq!(updates[0].value, FieldValue::Flag(true));
    }

    #[test]
    fn failed_talent_persistence_reverts_the_toggle() {
        let mut picker = talents();
        let remote = FakeRemote {
            fail: true,
            ..FakeRemote::default()
        };
        let result = block_on(commit_talent_toggle(
            &mut picker,
            &remote,
            &investigator(),
            "Keen Vision",
        ));
        assert!(matches!(result, Err(SyncError::Persistence(_))));
        assert!(!picker.is_selected("Keen Vision"));
        assert_eq!(picker.remaining(), 1);
    }

    #[test]
    fn limit_reached_costs_no_request() {
        let mut picker = talents();
        let remote = FakeRemote::default();
        block_on(commit_talent_toggle(
            &mut picker,
            &remote,
            &investigator(),
            "Keen Vision",
        ))
        .unwrap();
        let outcome = block_on(commit_talent_toggle(
            &mut picker,
            &remote,
            &investigator(),
            "Endurance",
        ))
        .unwrap();
        assert_eq!(outcome, ToggleOutcome::LimitReached);
        assert_eq!(remote.updates.borrow().len(), 1);
    }
}
