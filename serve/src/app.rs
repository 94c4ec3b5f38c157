//! Axum app: state, router and handlers.
//!
//! - `POST /api/enhance`: body `{"originalPrompt": ...}`, answers an enhancement record.
//! - `POST /api/modify`: body `{"originalPrompt", "enhancedPrompt", "modificationRequest"}`,
//!   answers `{"modifiedPrompt": ...}`.
//! - `GET /health`: `{"status":"ok"}`.
//!
//! Flow endpoints always answer `200` with a record; failures are carried inside it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use prompthancer::{EnhancementResult, ModificationResult, PromptService};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::identity::client_key;

/// Shared state for the HTTP server.
pub(crate) struct AppState {
    pub(crate) service: Arc<PromptService>,
}

pub(crate) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/enhance", post(enhance_handler))
        .route("/api/modify", post(modify_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Request body as JSON; anything unparseable becomes `null`, which the flows
/// report as an input error after the rate check.
fn body_json(body: &Bytes) -> Value {
    match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            debug!("request body is not JSON: {}", e);
            Value::Null
        }
    }
}

async fn enhance_handler(
    State(state): State<Arc<AppState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<EnhancementResult> {
    let client = client_key(&headers, peer.map(|ConnectInfo(addr)| addr));
    let result = state.service.enhance_json(&client, body_json(&body)).await;
    info!(
        client = %client,
        error = result.is_error(),
        category = %result.prompt_analysis.primary_category,
        "enhance"
    );
    Json(result)
}

async fn modify_handler(
    State(state): State<Arc<AppState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<ModificationResult> {
    let client = client_key(&headers, peer.map(|ConnectInfo(addr)| addr));
    let result = state.service.modify_json(&client, body_json(&body)).await;
    info!(client = %client, error = result.is_error(), "modify");
    Json(result)
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
