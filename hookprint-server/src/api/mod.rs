//! HTTP routes
//!
//! - [`webhook`] - GitHub webhook receiver
//! - [`health`] - health check

pub mod health;
pub mod webhook;

use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit, http::StatusCode};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::core::ServerState;

/// Build the application router
pub fn router(state: ServerState) -> Router {
    let body_limit = state.config.max_body_bytes;
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    Router::new()
        .merge(webhook::router(&state.config.webhook_path))
        .merge(health::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
