//! Unified error handling for the server.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] stow_engine::Error),

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, String, Option<String>) {
        use stow_engine::Error;

        match self {
            AppError::Engine(e) => match e {
                Error::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string(), None),
                Error::Transport { .. } => {
                    tracing::warn!("Upstream error: {}", e);
                    (StatusCode::BAD_GATEWAY, "Upstream error".to_string(), Some(e.to_string()))
                }
                _ if e.is_rejection() => {
                    tracing::debug!("Rejected request: {}", e);
                    (StatusCode::BAD_REQUEST, e.to_string(), None)
                }
                _ => {
                    tracing::error!("Storage error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Storage error".to_string(),
                        Some(e.to_string()),
                    )
                }
            },
            AppError::Body(rejection) => (
                StatusCode::BAD_REQUEST,
                "Invalid request body".to_string(),
                Some(rejection.body_text()),
            ),
            AppError::NotFound(id) => (StatusCode::NOT_FOUND, format!("entity not found: {id}"), None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.parts();
        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
