//! Webhook route
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | `WEBHOOK_PATH` (default `/`) | POST | Print a receipt for a GitHub event |
//!
//! Any other method on the webhook path answers 405.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    routing::any,
};
use hookprint_printer::Printer;
use tower::limit::ConcurrencyLimitLayer;
use tracing::{info, instrument};

use crate::core::{Result, ServerError, ServerState};
use crate::receipt::{GithubEvent, WebhookEvent};

pub const PRINTED: &str = "Printed successfully";

/// One receipt on the device at a time
const MAX_IN_FLIGHT: usize = 1;

pub fn router(path: &str) -> Router<ServerState> {
    Router::new()
        .route(path, any(handle_webhook))
        .route_layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[instrument(
    name = "github.webhook",
    skip_all,
    fields(
        event = tracing::field::Empty,
        delivery = tracing::field::Empty,
    )
)]
pub async fn handle_webhook(
    State(state): State<ServerState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str> {
    if method != Method::POST {
        return Err(ServerError::MethodNotAllowed);
    }

    let event_name = header(&headers, "x-github-event").unwrap_or_default();
    let delivery = header(&headers, "x-github-delivery").unwrap_or("unknown");

    let span = tracing::Span::current();
    span.record("event", event_name);
    span.record("delivery", delivery);

    let event = WebhookEvent::parse(GithubEvent::from(event_name), &body)?;
    let receipt = state.renderer.render(&event)?;

    if receipt.is_empty() {
        info!("Nothing to print");
        return Ok(PRINTED);
    }

    let data = receipt.encode(state.renderer.settings().code_page);
    state.printer.print(&data).await?;

    info!(bytes = data.len(), "Receipt printed");
    Ok(PRINTED)
}
