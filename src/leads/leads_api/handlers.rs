use super::error::LeadsError;
use super::service::LeadStore;
use super::types::*;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::shared::state::AppState;

// Path segments arrive percent-decoded; a blank segment is the "missing
// lead ID" case the upstream contract reports as a client error.
fn parse_lead_id(raw: &str) -> Result<Uuid, LeadsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LeadsError::MissingLeadId);
    }
    Uuid::parse_str(trimmed).map_err(|_| LeadsError::InvalidLeadId(trimmed.to_string()))
}

pub async fn list_leads_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Lead>>, LeadsError> {
    let store = LeadStore::new(state.conn.clone());
    let leads = store.list_leads().await?;
    Ok(Json(leads))
}

pub async fn list_conversations_handler(
    State(state): State<Arc<AppState>>,
    Path(lead_id): Path<String>,
) -> Result<Json<Vec<Conversation>>, LeadsError> {
    let lead_id = parse_lead_id(&lead_id)?;
    let store = LeadStore::new(state.conn.clone());
    let conversations = store.conversations_for(lead_id).await?;
    Ok(Json(conversations))
}

pub async fn list_notes_handler(
    State(state): State<Arc<AppState>>,
    Path(lead_id): Path<String>,
) -> Result<Json<Vec<Note>>, LeadsError> {
    let lead_id = parse_lead_id(&lead_id)?;
    let store = LeadStore::new(state.conn.clone());
    let notes = store.notes_for(lead_id).await?;
    Ok(Json(notes))
}

pub async fn create_note_handler(
    State(state): State<Arc<AppState>>,
    Path(lead_id): Path<String>,
    Json(request): Json<CreateNoteRequest>,
) -> Result<Json<Note>, LeadsError> {
    let lead_id = parse_lead_id(&lead_id)?;
    if request.note.trim().is_empty() {
        return Err(LeadsError::EmptyNote);
    }
    let store = LeadStore::new(state.conn.clone());
    let note = store.insert_note(lead_id, &request.note).await?;
    Ok(Json(note))
}
