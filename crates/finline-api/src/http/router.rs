//! Axum router configuration with middleware.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the webhook router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/callback", post(handlers::webhook::callback))
        .route("/api/healthz", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/healthz - liveness probe.
async fn health_check() -> &'static str {
    "OK"
}
