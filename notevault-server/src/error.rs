//! Server error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Server error types mapped to HTTP status codes.
#[derive(Debug)]
pub enum ServerError {
    BadRequest(String),
    /// Ownership fingerprint mismatch.
    Forbidden(String),
    NotFound(String),
    /// Persistence-layer failure; carries diagnostic detail for the body.
    Storage(String),
    Internal(String),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(e) => write!(f, "Bad request: {}", e),
            Self::Forbidden(e) => write!(f, "Forbidden: {}", e),
            Self::NotFound(e) => write!(f, "Not found: {}", e),
            Self::Storage(e) => write!(f, "Storage failure: {}", e),
            Self::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::BadRequest(e) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": e }),
            ),
            Self::Forbidden(e) => (StatusCode::FORBIDDEN, serde_json::json!({ "error": e })),
            Self::NotFound(e) => (StatusCode::NOT_FOUND, serde_json::json!({ "error": e })),
            Self::Storage(details) => (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({ "error": "Storage failure", "details": details }),
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": "Internal server error" }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.to_string())
    }
}
