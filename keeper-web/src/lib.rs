#![forbid(unsafe_code)]
//! Browser adapters for the Keeper investigator builder
//!
//! Implements the keeper-core persistence seams on top of the browser:
//! session storage for the trackers and the HTTP field-update API for the
//! creation wizard.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod api;
pub mod storage;
pub mod sync;

// Re-export all types from keeper-core
pub use keeper_core::*;

pub use api::{ApiClient, ApiError, OccupationSuggestions};
pub use storage::{BrowserSession, SessionError, persist_chase, persist_combat};
pub use sync::{RemoteFields, SyncError, commit_skill_edit, commit_talent_toggle};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
