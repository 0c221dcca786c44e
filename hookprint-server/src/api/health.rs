//! Health check route
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /health | GET | Service and printer status |
//!
//! # Response
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "printer": "file:/dev/usb/lp0",
//!   "printer_online": true
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use hookprint_printer::Printer;
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Configured print target
    printer: String,
    printer_online: bool,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let printer_online = state.printer.is_online().await;

    Json(HealthResponse {
        status: if printer_online { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        printer: state.printer.to_string(),
        printer_online,
    })
}
