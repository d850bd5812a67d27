//! HTTP route handlers for the webhook gateway.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::conversation::RouteOutcome;
use crate::transport::InboundEvent;

use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/messages", post(inbound_message))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.router.stats().await;
    Json(serde_json::json!({
        "status": "ok",
        "service": "triage-bot",
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": state.uptime_secs(),
        "tracked_conversations": stats.tracked_conversations,
        "pending_conversations": stats.pending_conversations,
        "in_flight_flushes": stats.in_flight_flushes,
    }))
}

/// Accept one inbound event from the transport bridge.
async fn inbound_message(
    State(state): State<Arc<AppState>>,
    Json(event): Json<InboundEvent>,
) -> (StatusCode, Json<RouteOutcome>) {
    let outcome = state.router.on_inbound_message(event).await;
    (StatusCode::ACCEPTED, Json(outcome))
}
