//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use crate::entries::{EntryError, SourceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Entry failed field or series validation
    #[error("Invalid entry: {0}")]
    Entry(#[from] EntryError),

    /// Entry source failure
    #[error("Entry source error: {0}")]
    Source(#[from] SourceError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Entry(_) | ApiError::Source(SourceError::InvalidEntry(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_ENTRY")
            }
            ApiError::Source(SourceError::Backend(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SOURCE_ERROR")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_status_mapping() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let err = ApiError::from(EntryError::MoodOutOfRange { date, value: 8 });
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "INVALID_ENTRY"));

        let err = ApiError::from(SourceError::InvalidEntry(EntryError::DuplicateDate(date)));
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);

        let err = ApiError::from(SourceError::Backend("down".to_string()));
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::NotFound("entry".to_string());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
