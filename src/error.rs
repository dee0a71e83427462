// src/error.rs - Failure taxonomy shared by the upstream client and the web layer
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Transport failure, non-success status, or an undecodable upstream body.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Local file not found: {0}")]
    FileNotFound(String),
    /// The select-and-print command came back with something other than 204.
    #[error("Failed to print (upstream status {0})")]
    PrintCommandFailed(u16),
    #[error("{0}")]
    ValidationFailed(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(e: reqwest::Error) -> Self {
        BridgeError::UpstreamUnavailable(e.to_string())
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}
