//! Axum route handlers for the contact form API.

use crate::auth::AdminGate;
use crate::error::LedgerError;
use crate::ledger::Ledger;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use contact_form_types::*;
use std::sync::Arc;
use std::time::Instant;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
    pub ledger: Ledger,
    pub admin: AdminGate,
    pub start_time: Instant,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = tower_http::cors::CorsLayer::permissive();

    Router::new()
        .route("/", get(root))
        .route("/submit-form", post(submit_form))
        .route("/update-query/:visitor_id", post(update_query))
        .route("/dashboard", get(dashboard))
        .route("/api/visitors", get(admin_visitors))
        .route("/status", get(status))
        .with_state(state)
        .layer(cors)
}

// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "API is live. Use /submit-form and /dashboard.",
    ))
}

// POST /submit-form
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitFormRequest>, JsonRejection>,
) -> Result<Json<SubmitFormResponse>, LedgerError> {
    let Json(req) = payload?;
    let record = state.ledger.submit(&req)?;
    Ok(Json(SubmitFormResponse {
        message: "Form submitted successfully".to_string(),
        id: record.id,
    }))
}

// POST /update-query/{visitor_id}
pub async fn update_query(
    State(state): State<Arc<AppState>>,
    Path(visitor_id): Path<String>,
    payload: Result<Json<QueryUpdateRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, LedgerError> {
    let Json(req) = payload?;
    state
        .ledger
        .update_query(&visitor_id, &req.message, &req.method)
        .await?;
    Ok(Json(MessageResponse::new("Query updated successfully")))
}

// GET /dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VisitorRecord>>, LedgerError> {
    Ok(Json(state.ledger.list()?))
}

// GET /api/visitors
pub async fn admin_visitors(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Err(rejection) = state.admin.check(&headers) {
        return rejection;
    }
    match state.ledger.list_newest_first() {
        Ok(records) => Json(records).into_response(),
        Err(e) => e.into_response(),
    }
}

// GET /status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ServiceStatus> {
    let total_records = state.ledger.list().map(|r| r.len()).unwrap_or(0);
    Json(ServiceStatus {
        running: true,
        uptime_secs: state.start_time.elapsed().as_secs(),
        total_records,
        version: VERSION.to_string(),
    })
}
