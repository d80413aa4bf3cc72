//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the error type for every endpoint. It renders a JSON
//! body with `timestamp`, `status`, `error` and `message` fields.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gitrat_core::CoreError;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    timestamp: String,
    status: u16,
    error: &'static str,
    message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unknown name, id or selector, or a subgraph that is not a tree (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// A required path parameter is missing (422).
    #[error("unprocessable: {0}")]
    Unprocessable(String),

    /// The dataset has not been loaded yet (503).
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The containment edges loop back on themselves (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::NotFound(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::Unavailable(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        let body = ErrorBody {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error"),
            message: self.message().to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::NodeNotFound { .. }
            | CoreError::AmbiguousName { .. }
            | CoreError::UnknownCategory { .. }
            | CoreError::MalformedSubgraph { .. } => ApiError::NotFound(err.to_string()),
            CoreError::Unavailable { .. } => ApiError::Unavailable(err.to_string()),
            CoreError::CycleDetected { .. } => ApiError::Conflict(err.to_string()),
            CoreError::DuplicateNode { .. }
            | CoreError::UnknownKind { .. }
            | CoreError::Io { .. }
            | CoreError::Json(_) => ApiError::Internal(err.to_string()),
        }
    }
}
