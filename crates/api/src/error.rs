//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use storage::StorageError;
use thiserror::Error;
use tracing::warn;

/// Errors returned by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed validation
    #[error("{0}")]
    BadRequest(String),

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// History store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Blocking task failed to complete
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Request failed ({}): {}", status, self);
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Storage(StorageError::Lock("poisoned".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::NotFound("session".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("join".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
