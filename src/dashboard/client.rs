use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::leads::{Conversation, Lead, Note};

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{0}")]
    Api(String),
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: String,
    #[serde(default)]
    #[allow(dead_code)]
    data: Vec<serde_json::Value>,
}

/// HTTP client for the service's own lead-management API, used by the
/// dashboard view layer.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let envelope: ErrorEnvelope = response.json().await.unwrap_or_default();
            return Err(ApiError::Api(envelope.error));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn fetch_leads(&self) -> Result<Vec<Lead>, ApiError> {
        self.get_json("/api/leads").await
    }

    pub async fn fetch_conversations(&self, lead_id: Uuid) -> Result<Vec<Conversation>, ApiError> {
        self.get_json(&format!("/api/leads/{lead_id}/conversations"))
            .await
    }

    pub async fn fetch_notes(&self, lead_id: Uuid) -> Result<Vec<Note>, ApiError> {
        self.get_json(&format!("/api/leads/{lead_id}/notes")).await
    }

    pub async fn post_note(&self, lead_id: Uuid, note: &str) -> Result<Note, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/leads/{lead_id}/notes", self.base_url))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "note": note }))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let envelope: ErrorEnvelope = response.json().await.unwrap_or_default();
            return Err(ApiError::Api(envelope.error));
        }

        response
            .json::<Note>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
