//! HTTP client for the investigator persistence API

use gloo_net::http::Request;
use keeper_core::{FieldCategory, FieldUpdate, FieldValue, InvestigatorId};
use serde::{Deserialize, Serialize};

use crate::sync::RemoteFields;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server returned status {0}")]
    Status(u16),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<gloo_net::Error> for ApiError {
    fn from(e: gloo_net::Error) -> Self {
        Self::Network(e.to_string())
    }
}

/// Wire body for a single field update.
#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    section: FieldCategory,
    field: &'a str,
    value: &'a FieldValue,
}

/// Occupation suggestions for a chosen archetype.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OccupationSuggestions {
    pub suggested: Vec<String>,
    pub others: Vec<String>,
}

/// Client for the investigator backend. One confirmed change per request,
/// no retries; callers decide what to do on failure.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new("")
    }
}

impl ApiClient {
    /// `base` is prefixed to every path; empty means same-origin.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Push one confirmed field change.
    ///
    /// # Errors
    ///
    /// Fails on network errors or any non-2xx response.
    pub async fn put_field(
        &self,
        id: &InvestigatorId,
        update: &FieldUpdate,
    ) -> Result<(), ApiError> {
        let body = UpdateBody {
            section: update.category,
            field: &update.field,
            value: &update.value,
        };
        let response = Request::put(&self.url(&format!("/api/investigator/{id}")))
            .json(&body)?
            .send()
            .await?;
        if !response.ok() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(())
    }

    /// Occupations suggested for an archetype, used on the first wizard page.
    ///
    /// # Errors
    ///
    /// Fails on network errors, non-2xx responses, or a malformed payload.
    pub async fn occupations_for(
        &self,
        archetype: &str,
    ) -> Result<OccupationSuggestions, ApiError> {
        let response = Request::get(&self.url(&format!("/api/archetype/{archetype}/occupations")))
            .send()
            .await?;
        if !response.ok() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    /// Re-fetch the rendered sheet for an investigator.
    ///
    /// # Errors
    ///
    /// Fails on network errors or any non-2xx response.
    pub async fn fetch_sheet(&self, id: &InvestigatorId) -> Result<String, ApiError> {
        let response = Request::get(&self.url(&format!("/api/investigator/{id}")))
            .send()
            .await?;
        if !response.ok() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.text().await?)
    }
}

impl RemoteFields for ApiClient {
    type Error = ApiError;

    async fn update_field(
        &self,
        id: &InvestigatorId,
        update: &FieldUpdate,
    ) -> Result<(), Self::Error> {
        self.put_field(id, update).await
    }
}
