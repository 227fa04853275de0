// Dashboard view-layer tests against in-process stub servers: one standing
// in for the lead API, one for the automation webhook.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use leadserver::automation::AutomationClient;
use leadserver::config::DashboardConfig;
use leadserver::dashboard::{ApiClient, Dashboard, DashboardError, StatusFilter};
use leadserver::leads::LeadStatus;

#[derive(Clone, Default)]
struct StubCounters {
    leads_fetches: Arc<AtomicUsize>,
    webhook_hits: Arc<AtomicUsize>,
}

fn lead_json(id: Uuid) -> Value {
    json!({
        "id": id,
        "name": "John Smith",
        "phone": "+15551234567",
        "email": "john.smith@example.com",
        "budget": 500000,
        "timeline": "immediate",
        "working_with_agent": null,
        "status": "qualified",
        "is_vip": true,
        "created_at": "2026-08-20T12:00:00Z",
        "updated_at": "2026-08-20T12:00:00Z"
    })
}

fn stub_api(lead_id: Uuid, counters: StubCounters) -> Router {
    Router::new()
        .route(
            "/api/leads",
            get(move |State(c): State<StubCounters>| async move {
                c.leads_fetches.fetch_add(1, Ordering::SeqCst);
                Json(json!([lead_json(lead_id)]))
            }),
        )
        .route(
            "/api/leads/:id/conversations",
            get(move |Path(id): Path<Uuid>| async move {
                Json(json!([
                    {
                        "id": Uuid::new_v4(),
                        "lead_id": id,
                        "message": "Hi, I'm looking to buy",
                        "sender": "lead",
                        "created_at": "2026-08-20T12:00:00Z"
                    },
                    {
                        "id": Uuid::new_v4(),
                        "lead_id": id,
                        "message": "What is your budget?",
                        "sender": "ai",
                        "created_at": "2026-08-20T12:05:00Z"
                    }
                ]))
            }),
        )
        .route(
            "/api/leads/:id/notes",
            get(move |Path(id): Path<Uuid>| async move {
                Json(json!([
                    {
                        "id": Uuid::new_v4(),
                        "lead_id": id,
                        "note": "Existing note",
                        "created_at": "2026-08-20T12:10:00Z"
                    }
                ]))
            })
            .post(
                move |Path(id): Path<Uuid>, Json(body): Json<Value>| async move {
                    Json(json!({
                        "id": Uuid::new_v4(),
                        "lead_id": id,
                        "note": body["note"],
                        "created_at": "2026-08-20T12:15:00Z"
                    }))
                },
            ),
        )
        .with_state(counters)
}

fn stub_webhook(counters: StubCounters, fail: bool) -> Router {
    Router::new()
        .route(
            "/webhook/create-lead",
            post(
                move |State(c): State<StubCounters>, Json(body): Json<Value>| async move {
                    c.webhook_hits.fetch_add(1, Ordering::SeqCst);
                    if fail {
                        return (StatusCode::BAD_GATEWAY, Json(json!({"error": "boom"})));
                    }
                    (StatusCode::OK, Json(json!({"received": body})))
                },
            ),
        )
        .with_state(counters)
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn test_dashboard(fail_webhook: bool) -> (Arc<Dashboard>, Uuid, StubCounters) {
    let counters = StubCounters::default();
    let lead_id = Uuid::new_v4();
    let api_addr = serve(stub_api(lead_id, counters.clone())).await;
    let webhook_addr = serve(stub_webhook(counters.clone(), fail_webhook)).await;

    let dashboard = Dashboard::new(
        ApiClient::new(format!("http://{api_addr}")),
        AutomationClient::new(format!("http://{webhook_addr}/webhook/create-lead")),
    );
    (dashboard, lead_id, counters)
}

#[tokio::test]
async fn test_load_populates_leads_and_clears_loading() {
    let (dashboard, _, _) = test_dashboard(false).await;
    assert!(dashboard.snapshot().await.loading);

    dashboard.load().await;

    let state = dashboard.snapshot().await;
    assert!(!state.loading);
    assert_eq!(state.leads.len(), 1);
    assert_eq!(state.leads[0].name, "John Smith");
    assert_eq!(state.leads[0].status, LeadStatus::Qualified);
}

#[tokio::test]
async fn test_select_lead_fetches_detail_and_clear_empties_it() {
    let (dashboard, lead_id, _) = test_dashboard(false).await;
    dashboard.load().await;

    dashboard.select_lead(lead_id).await.unwrap();
    let state = dashboard.snapshot().await;
    assert_eq!(state.selected.as_ref().map(|l| l.id), Some(lead_id));
    assert_eq!(state.conversations.len(), 2);
    assert_eq!(state.conversations[0].message, "Hi, I'm looking to buy");
    assert_eq!(state.notes.len(), 1);

    dashboard.clear_selection().await;
    let state = dashboard.snapshot().await;
    assert!(state.selected.is_none());
    assert!(state.conversations.is_empty());
    assert!(state.notes.is_empty());
}

#[tokio::test]
async fn test_select_unknown_lead_fails() {
    let (dashboard, _, _) = test_dashboard(false).await;
    dashboard.load().await;

    let err = dashboard.select_lead(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DashboardError::UnknownLead(_)));
}

#[tokio::test]
async fn test_add_note_posts_and_clears_draft() {
    let (dashboard, lead_id, _) = test_dashboard(false).await;
    dashboard.load().await;
    dashboard.select_lead(lead_id).await.unwrap();

    dashboard
        .update_state(|s| s.note_draft = "  Called client  ".to_string())
        .await;
    dashboard.add_note().await.unwrap();

    let state = dashboard.snapshot().await;
    assert!(state.note_draft.is_empty());
    assert_eq!(state.notes.len(), 1);
}

#[tokio::test]
async fn test_add_note_rejects_blank_draft() {
    let (dashboard, lead_id, _) = test_dashboard(false).await;
    dashboard.load().await;
    dashboard.select_lead(lead_id).await.unwrap();

    dashboard.update_state(|s| s.note_draft = "   ".to_string()).await;
    let err = dashboard.add_note().await.unwrap_err();
    assert!(matches!(err, DashboardError::EmptyNote));
}

#[tokio::test]
async fn test_create_lead_requires_name_and_phone_before_any_network_call() {
    let (dashboard, _, counters) = test_dashboard(false).await;
    dashboard.load().await;

    dashboard
        .update_state(|s| {
            s.lead_form.name = String::new();
            s.lead_form.phone = "+15551112222".to_string();
        })
        .await;

    let err = dashboard.create_lead().await.unwrap_err();
    assert!(matches!(err, DashboardError::MissingRequiredFields));
    assert_eq!(counters.webhook_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_create_lead_success_resets_and_closes_form() {
    let (dashboard, _, counters) = test_dashboard(false).await;
    dashboard.load().await;

    dashboard
        .update_state(|s| {
            s.show_lead_form = true;
            s.lead_form.name = "Sarah Johnson".to_string();
            s.lead_form.phone = "+15559876543".to_string();
            s.lead_form.budget = "750000".to_string();
        })
        .await;

    dashboard.create_lead().await.unwrap();

    let state = dashboard.snapshot().await;
    assert!(!state.show_lead_form);
    assert!(!state.creating_lead);
    assert!(state.lead_form.name.is_empty());
    assert_eq!(counters.webhook_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_create_lead_failure_leaves_form_open() {
    let (dashboard, _, counters) = test_dashboard(true).await;
    dashboard.load().await;

    dashboard
        .update_state(|s| {
            s.show_lead_form = true;
            s.lead_form.name = "Sarah Johnson".to_string();
            s.lead_form.phone = "+15559876543".to_string();
        })
        .await;

    let err = dashboard.create_lead().await.unwrap_err();
    assert!(matches!(err, DashboardError::Automation(_)));
    assert_eq!(counters.webhook_hits.load(Ordering::SeqCst), 1);

    let state = dashboard.snapshot().await;
    assert!(state.show_lead_form);
    assert!(!state.creating_lead);
    assert_eq!(state.lead_form.name, "Sarah Johnson");
}

#[tokio::test]
async fn test_status_filter_applies_to_fetched_leads() {
    let (dashboard, _, _) = test_dashboard(false).await;
    dashboard.load().await;

    dashboard
        .update_state(|s| s.status_filter = StatusFilter::Only(LeadStatus::New))
        .await;
    assert!(dashboard.snapshot().await.filtered_leads().is_empty());

    dashboard
        .update_state(|s| s.status_filter = StatusFilter::Only(LeadStatus::Qualified))
        .await;
    assert_eq!(dashboard.snapshot().await.filtered_leads().len(), 1);
}

#[tokio::test]
async fn test_mount_loads_and_polls_at_configured_interval() {
    let (dashboard, _, counters) = test_dashboard(false).await;

    dashboard.mount(&DashboardConfig { poll_secs: 1 }).await;

    let state = dashboard.snapshot().await;
    assert!(!state.loading);
    assert_eq!(state.leads.len(), 1);
    let after_mount = counters.leads_fetches.load(Ordering::SeqCst);

    tokio::time::sleep(Duration::from_millis(1300)).await;
    assert!(
        counters.leads_fetches.load(Ordering::SeqCst) > after_mount,
        "configured poller never refetched"
    );

    dashboard.shutdown().await;
}

#[tokio::test]
async fn test_poller_refetches_until_shutdown() {
    let (dashboard, _, counters) = test_dashboard(false).await;
    dashboard.load().await;
    let after_load = counters.leads_fetches.load(Ordering::SeqCst);

    dashboard.spawn_poller(Duration::from_millis(25)).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    let polled = counters.leads_fetches.load(Ordering::SeqCst);
    assert!(polled > after_load, "poller never refetched");

    dashboard.shutdown().await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    let after_shutdown = counters.leads_fetches.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        counters.leads_fetches.load(Ordering::SeqCst),
        after_shutdown,
        "poller kept running after shutdown"
    );
}
