//! API Router
//!
//! Wires all lead-management endpoints into a single router consumed by
//! the server and by the dashboard's own HTTP client.

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::shared::state::AppState;

pub fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(crate::server::health_check))
        .route("/api/leads", get(crate::leads::list_leads_handler))
        .route(
            "/api/leads/:id/conversations",
            get(crate::leads::list_conversations_handler),
        )
        .route(
            "/api/leads/:id/notes",
            get(crate::leads::list_notes_handler).post(crate::leads::create_note_handler),
        )
}
