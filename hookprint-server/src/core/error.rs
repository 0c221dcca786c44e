use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hookprint_printer::PrintError;
use thiserror::Error;

/// Server errors
///
/// Webhook failures answer with a plain-text body, matching what GitHub
/// shows in the delivery log.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Error: Expecting a POST request")]
    MethodNotAllowed,

    #[error("Error: Invalid JSON payload")]
    InvalidJson,

    /// Payload parsed as JSON but a field had an unexpected type
    #[error("Printing failed: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Printing failed: {0}")]
    Print(#[from] PrintError),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::InvalidJson => StatusCode::BAD_REQUEST,
            ServerError::Payload(_)
            | ServerError::Print(_)
            | ServerError::Config(_)
            | ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Webhook failed");
        } else {
            tracing::warn!(error = %self, "Webhook rejected");
        }

        (status, self.to_string()).into_response()
    }
}

/// Result type alias for handlers and startup
pub type Result<T> = std::result::Result<T, ServerError>;
