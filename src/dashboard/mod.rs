//! Dashboard view layer: a state holder that polls the lead API, drives
//! filtering/search/selection, and performs the two mutating user actions
//! (create lead via the automation webhook, append a note).

mod client;
mod state;

pub use client::{ApiClient, ApiError};
pub use state::*;

use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::interval;
use uuid::Uuid;

use crate::automation::{AutomationClient, AutomationError, LeadPayload};
use crate::config::DashboardConfig;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Name and phone are required")]
    MissingRequiredFields,
    #[error("No lead selected")]
    NoLeadSelected,
    #[error("Note text is empty")]
    EmptyNote,
    #[error("Lead {0} is not in the current list")]
    UnknownLead(Uuid),
    #[error(transparent)]
    Automation(#[from] AutomationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn payload_from_form(form: &LeadForm) -> LeadPayload {
    fn opt(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    LeadPayload {
        name: form.name.trim().to_string(),
        phone: form.phone.trim().to_string(),
        email: opt(&form.email),
        budget: form.budget.trim().parse::<i64>().ok(),
        timeline: opt(&form.timeline),
        is_vip: form.is_vip,
        notes: opt(&form.notes),
    }
}

pub struct Dashboard {
    api: ApiClient,
    automation: AutomationClient,
    state: RwLock<DashboardState>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl Dashboard {
    pub fn new(api: ApiClient, automation: AutomationClient) -> Arc<Self> {
        Arc::new(Self {
            api,
            automation,
            state: RwLock::new(DashboardState::new()),
            poller: Mutex::new(None),
        })
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Apply a synchronous edit to the view state (search term, status
    /// filter, note draft, form fields, form visibility).
    pub async fn update_state(&self, edit: impl FnOnce(&mut DashboardState)) {
        edit(&mut *self.state.write().await);
    }

    /// Initial mount: fetch the lead list and flip loading to ready.
    pub async fn load(&self) {
        self.fetch_leads_into_state().await;
    }

    /// Full mount lifecycle: initial fetch, then the scheduled refresh at
    /// the configured interval.
    pub async fn mount(self: &Arc<Self>, config: &DashboardConfig) {
        self.load().await;
        self.spawn_poller(Duration::from_secs(config.poll_secs)).await;
    }

    async fn fetch_leads_into_state(&self) {
        match self.api.fetch_leads().await {
            Ok(leads) => self.state.write().await.leads = leads,
            Err(e) => error!("Error fetching leads: {e}"),
        }
        let mut state = self.state.write().await;
        state.loading = false;
        state.refreshing = false;
    }

    async fn fetch_detail(&self, lead_id: Uuid) {
        match self.api.fetch_conversations(lead_id).await {
            Ok(conversations) => self.state.write().await.conversations = conversations,
            Err(e) => error!("Error fetching conversations: {e}"),
        }
        match self.api.fetch_notes(lead_id).await {
            Ok(notes) => self.state.write().await.notes = notes,
            Err(e) => error!("Error fetching notes: {e}"),
        }
    }

    /// Scheduled-refresh task owned by this view's lifecycle. Replaces any
    /// previous poller; `shutdown` cancels it.
    pub async fn spawn_poller(self: &Arc<Self>, every: Duration) {
        let dashboard = Arc::clone(self);
        let handle = tokio::spawn(async move {
            info!("Dashboard poller started ({}s interval)", every.as_secs());
            let mut tick = interval(every);
            // the first tick of a tokio interval completes immediately
            tick.tick().await;
            loop {
                tick.tick().await;
                dashboard.fetch_leads_into_state().await;
            }
        });
        if let Some(old) = self.poller.lock().await.replace(handle) {
            old.abort();
        }
    }

    pub async fn shutdown(&self) {
        if let Some(handle) = self.poller.lock().await.take() {
            handle.abort();
            info!("Dashboard poller stopped");
        }
    }

    pub async fn select_lead(&self, lead_id: Uuid) -> Result<(), DashboardError> {
        let lead = self
            .state
            .read()
            .await
            .leads
            .iter()
            .find(|l| l.id == lead_id)
            .cloned()
            .ok_or(DashboardError::UnknownLead(lead_id))?;
        self.state.write().await.selected = Some(lead);
        self.fetch_detail(lead_id).await;
        Ok(())
    }

    pub async fn clear_selection(&self) {
        let mut state = self.state.write().await;
        state.selected = None;
        state.conversations.clear();
        state.notes.clear();
    }

    /// Manual refresh. The refreshing flag only suppresses duplicate manual
    /// triggers; the poller is not synchronized against it.
    pub async fn refresh(&self) {
        {
            let mut state = self.state.write().await;
            if state.refreshing {
                return;
            }
            state.refreshing = true;
        }
        let selected = self.state.read().await.selected.as_ref().map(|l| l.id);
        self.fetch_leads_into_state().await;
        if let Some(lead_id) = selected {
            self.fetch_detail(lead_id).await;
        }
    }

    /// Validates the form, forwards the payload to the automation webhook,
    /// and on success resets the form and refetches the lead list. On
    /// failure the form stays open so the agent can retry.
    pub async fn create_lead(&self) -> Result<serde_json::Value, DashboardError> {
        let payload = {
            let state = self.state.read().await;
            if state.lead_form.name.trim().is_empty() || state.lead_form.phone.trim().is_empty() {
                return Err(DashboardError::MissingRequiredFields);
            }
            payload_from_form(&state.lead_form)
        };

        self.state.write().await.creating_lead = true;
        match self.automation.create_lead(&payload).await {
            Ok(response) => {
                {
                    let mut state = self.state.write().await;
                    state.lead_form.clear();
                    state.show_lead_form = false;
                    state.creating_lead = false;
                }
                self.fetch_leads_into_state().await;
                Ok(response)
            }
            Err(e) => {
                self.state.write().await.creating_lead = false;
                error!("Error creating lead: {e}");
                Err(e.into())
            }
        }
    }

    /// Posts the trimmed note draft for the selected lead, clears the
    /// draft, and refetches that lead's notes.
    pub async fn add_note(&self) -> Result<(), DashboardError> {
        let (lead_id, text) = {
            let state = self.state.read().await;
            let lead = state
                .selected
                .as_ref()
                .ok_or(DashboardError::NoLeadSelected)?;
            let text = state.note_draft.trim().to_string();
            if text.is_empty() {
                return Err(DashboardError::EmptyNote);
            }
            (lead.id, text)
        };

        match self.api.post_note(lead_id, &text).await {
            Ok(_) => {
                self.state.write().await.note_draft.clear();
                match self.api.fetch_notes(lead_id).await {
                    Ok(notes) => self.state.write().await.notes = notes,
                    Err(e) => error!("Error fetching notes: {e}"),
                }
                Ok(())
            }
            Err(e) => {
                error!("Error adding note: {e}");
                Err(e.into())
            }
        }
    }
}
