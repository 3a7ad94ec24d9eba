//! Plain HTTP proxy pass-through
//!
//! Simple reads and writes that never touch the relay's own state machine
//! are forwarded verbatim to the backend: method and body preserved,
//! response status preserved, body re-emitted as JSON when it parses and as
//! raw text otherwise. A transport-level failure to reach the backend is
//! surfaced as the fixed 502 envelope `{code: 502, message, data: null}`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Method;
use tracing::error;

use super::websocket::state::AppState;
use crate::gateway::GatewayError;
use crate::types::ApiEnvelope;

async fn pass(state: &AppState, method: Method, path: &str, body: Option<Vec<u8>>) -> Response {
    match state.gateway.forward(method, path, body).await {
        Ok(resp) => {
            let status =
                StatusCode::from_u16(resp.status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
            match resp.json() {
                Some(json) => (status, Json(json)).into_response(),
                None => (status, resp.body).into_response(),
            }
        }
        Err(GatewayError::Unreachable(err)) => {
            error!(path, error = %err, "proxy: backend unreachable");
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiEnvelope::bad_gateway("Bad gateway (relay -> backend)")),
            )
                .into_response()
        }
    }
}

fn blueprint_path(author: &str, name: &str) -> String {
    format!(
        "/api/v1/blueprints/{}/{}",
        urlencoding::encode(author),
        urlencoding::encode(name)
    )
}

/// GET /api/v1/blueprints
pub async fn list_blueprints(State(state): State<Arc<AppState>>) -> Response {
    pass(&state, Method::GET, "/api/v1/blueprints", None).await
}

/// GET /api/v1/blueprints/:author
pub async fn blueprints_by_author(
    State(state): State<Arc<AppState>>,
    Path(author): Path<String>,
) -> Response {
    let path = format!("/api/v1/blueprints/{}", urlencoding::encode(&author));
    pass(&state, Method::GET, &path, None).await
}

/// GET /api/v1/blueprints/:author/:name
pub async fn get_blueprint(
    State(state): State<Arc<AppState>>,
    Path((author, name)): Path<(String, String)>,
) -> Response {
    pass(&state, Method::GET, &blueprint_path(&author, &name), None).await
}

/// POST /api/v1/blueprints
pub async fn create_blueprint(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let body = (!body.is_empty()).then(|| body.to_vec());
    pass(&state, Method::POST, "/api/v1/blueprints", body).await
}

/// PUT /api/v1/blueprints/:author/:name/points
pub async fn append_point(
    State(state): State<Arc<AppState>>,
    Path((author, name)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let body = (!body.is_empty()).then(|| body.to_vec());
    let path = format!("{}/points", blueprint_path(&author, &name));
    pass(&state, Method::PUT, &path, body).await
}

/// GET /api/v1/tickets
pub async fn list_tickets(State(state): State<Arc<AppState>>) -> Response {
    pass(&state, Method::GET, "/api/v1/tickets", None).await
}

/// GET /api/v1/tickets/called
pub async fn called_ticket(State(state): State<Arc<AppState>>) -> Response {
    pass(&state, Method::GET, "/api/v1/tickets/called", None).await
}

/// GET /api/v1/tickets/:id
pub async fn ticket_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let path = format!("/api/v1/tickets/{}", urlencoding::encode(&id));
    pass(&state, Method::GET, &path, None).await
}

/// POST /api/v1/tickets/create
pub async fn create_ticket(State(state): State<Arc<AppState>>) -> Response {
    pass(&state, Method::POST, "/api/v1/tickets/create", None).await
}

/// PUT /api/v1/tickets/call
pub async fn call_next_ticket(State(state): State<Arc<AppState>>) -> Response {
    pass(&state, Method::PUT, "/api/v1/tickets/call", None).await
}
