//! Session-storage persistence for both trackers
//!
//! Trackers live for one keeper session only, so they go to sessionStorage
//! under the same keys and JSON layouts the sheet page reads back.

use gloo::storage::{SessionStorage, Storage};
use keeper_core::{ChaseTracker, CombatTracker, TrackerStorage};

const COMBAT_KEY: &str = "combatTracker";
const CHASE_KEY: &str = "chaseTracker";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Tracker persistence backed by the browser's sessionStorage.
pub struct BrowserSession;

impl BrowserSession {
    fn set<T: serde::Serialize>(key: &str, value: &T) -> Result<(), SessionError> {
        SessionStorage::set(key, value).map_err(|e| SessionError::Storage(format!("{e:?}")))
    }

    fn get<T: serde::de::DeserializeOwned>(key: &str) -> Option<T> {
        SessionStorage::get(key).ok()
    }
}

impl TrackerStorage for BrowserSession {
    type Error = SessionError;

    fn save_combat(&self, tracker: &CombatTracker) -> Result<(), Self::Error> {
        Self::set(COMBAT_KEY, tracker)
    }

    fn load_combat(&self) -> Result<Option<CombatTracker>, Self::Error> {
        Ok(Self::get(COMBAT_KEY))
    }

    fn save_chase(&self, tracker: &ChaseTracker) -> Result<(), Self::Error> {
        Self::set(CHASE_KEY, tracker)
    }

    fn load_chase(&self) -> Result<Option<ChaseTracker>, Self::Error> {
        Ok(Self::get(CHASE_KEY))
    }
}

/// Persist a tracker after a mutation. Failures are informational only:
/// the in-memory tracker stays authoritative for the rest of the session.
pub fn persist_combat<S: TrackerStorage>(store: &S, tracker: &CombatTracker) {
    if let Err(e) = store.save_combat(tracker) {
        log::warn!("failed to persist combat tracker: {e}");
    }
}

/// See [`persist_combat`].
pub fn persist_chase<S: TrackerStorage>(store: &S, tracker: &ChaseTracker) {
    if let Err(e) = store.save_chase(tracker) {
        log::warn!("failed to persist chase tracker: {e}");
    }
}
