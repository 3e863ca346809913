use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::storage::StoreError;

pub type ForumResult<T> = Result<T, ForumError>;

/// Failure categories surfaced to callers of the forum engine
#[derive(Debug, Error)]
pub enum ForumError {
    /// Missing or malformed input; raised before any storage access
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected by the reply permission gate
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Storage failure, passed through unchanged
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ForumError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ForumError::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ForumError::NotFound(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ForumError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ForumError::NotFound(_) => StatusCode::NOT_FOUND,
            ForumError::Forbidden(_) => StatusCode::FORBIDDEN,
            ForumError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ForumError {
    fn from(err: ValidationErrors) -> Self {
        ForumError::InvalidArgument(err.to_string())
    }
}

/// Convert ForumError to HTTP response
impl IntoResponse for ForumError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Storage details stay in the logs
        let message = match &self {
            ForumError::Storage(e) => {
                tracing::error!("Storage failure: {}", e);
                "Internal storage error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "code": status.as_u16()
            }
        }));

        (status, body).into_response()
    }
}
