//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("document contains no rows")]
    EmptyDocument,

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("storage error: {0}")]
    Storage(#[from] chartdeck_storage::StorageError),

    #[error("metadata error: {0}")]
    Metadata(#[from] chartdeck_metadata::MetadataError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::InvalidCredentials => "invalid_credentials",
            Self::EmptyDocument => "empty_document",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::InvalidOperation(_) => "invalid_operation",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal_error",
            Self::Storage(_) => "storage_error",
            Self::Metadata(_) => "metadata_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidCredentials
            | Self::EmptyDocument
            | Self::UnsupportedFormat(_)
            | Self::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(e) => match e {
                chartdeck_storage::StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Metadata(e) => match e {
                chartdeck_metadata::MetadataError::NotFound(_) => StatusCode::NOT_FOUND,
                chartdeck_metadata::MetadataError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<chartdeck_core::Error> for ApiError {
    fn from(e: chartdeck_core::Error) -> Self {
        match e {
            chartdeck_core::Error::EmptyDocument => Self::EmptyDocument,
            chartdeck_core::Error::UnsupportedFormat(name) => Self::UnsupportedFormat(name),
            chartdeck_core::Error::Parse(msg) => {
                Self::Validation(format!("failed to parse workbook: {msg}"))
            }
            chartdeck_core::Error::InvalidValue(msg) => Self::Validation(msg),
        }
    }
}

impl From<chartdeck_auth::AuthError> for ApiError {
    fn from(e: chartdeck_auth::AuthError) -> Self {
        use chartdeck_auth::AuthError;
        match e {
            AuthError::TokenExpired => Self::Unauthenticated("token expired".to_string()),
            AuthError::InvalidToken(_) => Self::Unauthenticated("invalid token".to_string()),
            AuthError::HashingFailed(msg)
            | AuthError::InvalidHashFormat(msg)
            | AuthError::VerificationFailed(msg) => Self::Internal(msg),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(format!("serialization failed: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::EmptyDocument.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_core_error_conversion() {
        assert!(matches!(
            ApiError::from(chartdeck_core::Error::EmptyDocument),
            ApiError::EmptyDocument
        ));
        assert!(matches!(
            ApiError::from(chartdeck_core::Error::UnsupportedFormat("a.txt".into())),
            ApiError::UnsupportedFormat(_)
        ));
    }
}
