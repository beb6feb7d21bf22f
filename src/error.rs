use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::generator::GeneratorError;
use crate::models::StatusResponse;
use crate::store::StoreError;

/// Failure of a diagnostic route, rendered as `{"status": "error", "message": ...}`.
#[derive(Debug)]
pub enum DiagnosticError {
    /// Collaborator not configured (503).
    NotConfigured(String),
    /// Collaborator call failed (500).
    Failed(String),
}

impl IntoResponse for DiagnosticError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotConfigured(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::Failed(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        tracing::warn!(%status, %message, "diagnostic route failed");
        let body = StatusResponse {
            status: "error",
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for DiagnosticError {
    fn from(err: StoreError) -> Self {
        Self::Failed(err.to_string())
    }
}

impl From<GeneratorError> for DiagnosticError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::MissingApiKey => Self::NotConfigured(err.to_string()),
            _ => Self::Failed(err.to_string()),
        }
    }
}
