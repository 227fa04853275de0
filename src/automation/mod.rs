//! Lead creation is delegated to an external workflow-automation webhook.
//! The workflow owns the side effects and eventually writes the Lead row
//! that the dashboard observes on a later poll; this client only fires the
//! request and reports whether the webhook accepted it.

use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source tag stamped on every payload sent from this service.
pub const LEAD_SOURCE: &str = "dashboard";

#[derive(Debug, Clone, Error)]
pub enum AutomationError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to create lead")]
    WebhookRejected,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadPayload {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub budget: Option<i64>,
    pub timeline: Option<String>,
    pub is_vip: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct WebhookRequest<'a> {
    name: &'a str,
    phone: &'a str,
    email: Option<&'a str>,
    budget: Option<i64>,
    timeline: Option<&'a str>,
    is_vip: bool,
    notes: Option<&'a str>,
    source: &'static str,
}

impl<'a> WebhookRequest<'a> {
    fn from_payload(payload: &'a LeadPayload) -> Self {
        Self {
            name: &payload.name,
            phone: &payload.phone,
            email: payload.email.as_deref(),
            budget: payload.budget,
            timeline: payload.timeline.as_deref(),
            is_vip: payload.is_vip,
            notes: payload.notes.as_deref(),
            source: LEAD_SOURCE,
        }
    }
}

pub struct AutomationClient {
    client: reqwest::Client,
    webhook_url: String,
}

impl AutomationClient {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
        }
    }

    /// Fire-and-forget lead creation. Any non-success status is a failure;
    /// there are no retries. The webhook's response body, if any, is passed
    /// through to the caller.
    pub async fn create_lead(
        &self,
        payload: &LeadPayload,
    ) -> Result<serde_json::Value, AutomationError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .header("Content-Type", "application/json")
            .json(&WebhookRequest::from_payload(payload))
            .send()
            .await
            .map_err(|e| {
                error!("Error sending lead to automation webhook: {e}");
                AutomationError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Automation webhook rejected lead creation: {status}");
            return Err(AutomationError::WebhookRejected);
        }

        let text = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_webhook_request_carries_source_tag() {
        let payload = LeadPayload {
            name: "John Smith".to_string(),
            phone: "+15551234567".to_string(),
            email: Some("john.smith@example.com".to_string()),
            budget: Some(500_000),
            timeline: Some("immediate".to_string()),
            is_vip: true,
            notes: None,
        };
        let value = serde_json::to_value(WebhookRequest::from_payload(&payload)).unwrap();
        assert_eq!(value["source"], json!("dashboard"));
        assert_eq!(value["name"], json!("John Smith"));
        assert_eq!(value["budget"], json!(500_000));
        assert_eq!(value["notes"], json!(null));
    }

    #[test]
    fn test_automation_error_display() {
        assert_eq!(
            AutomationError::WebhookRejected.to_string(),
            "Failed to create lead"
        );
    }
}
