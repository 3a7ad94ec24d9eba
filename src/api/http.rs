//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::proxy;
use super::websocket::{handler::ws_handler, state::AppState};

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins, like the original relay
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        // Proxy pass-through to the authoritative backend
        .route(
            "/api/v1/blueprints",
            get(proxy::list_blueprints).post(proxy::create_blueprint),
        )
        .route("/api/v1/blueprints/:author", get(proxy::blueprints_by_author))
        .route(
            "/api/v1/blueprints/:author/:name",
            get(proxy::get_blueprint),
        )
        .route(
            "/api/v1/blueprints/:author/:name/points",
            put(proxy::append_point),
        )
        .route("/api/v1/tickets", get(proxy::list_tickets))
        .route("/api/v1/tickets/called", get(proxy::called_ticket))
        .route("/api/v1/tickets/create", post(proxy::create_ticket))
        .route("/api/v1/tickets/call", put(proxy::call_next_ticket))
        .route("/api/v1/tickets/:id", get(proxy::ticket_by_id))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
