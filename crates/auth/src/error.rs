//! Authentication error types.

use thiserror::Error;

/// Errors from token and password operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("failed to hash password: {0}")]
    HashingFailed(String),

    #[error("invalid password hash format: {0}")]
    InvalidHashFormat(String),

    #[error("failed to verify password: {0}")]
    VerificationFailed(String),
}
