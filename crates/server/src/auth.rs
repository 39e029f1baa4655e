//! Authentication and authorization middleware.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use chartdeck_auth::AuthError;
use chartdeck_core::Role;
use chartdeck_metadata::models::UserRow;

/// Authenticated request extension: the resolved user record.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: UserRow,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin.as_str()
    }
}

/// Extract bearer token from Authorization header.
/// Per RFC 6750, the "Bearer" scheme is case-insensitive.
fn extract_bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            if v.len() >= 7 && v[..7].eq_ignore_ascii_case("bearer ") {
                Some(&v[7..])
            } else {
                None
            }
        })
}

/// Authentication middleware.
///
/// When a bearer token is present it must verify and resolve to a persisted
/// user record; the record is attached to request extensions. Requests
/// without a token pass through unauthenticated and are rejected by
/// [`require_user`] in handlers that need an identity.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = extract_bearer_token(&req) {
        let claims = state.token_keys.verify(token).map_err(|e| match e {
            AuthError::TokenExpired => ApiError::Unauthenticated("token expired".to_string()),
            _ => ApiError::Unauthenticated("invalid token".to_string()),
        })?;

        // The token may outlive its account; a deleted user is treated the
        // same as no credential at all.
        let user = state
            .metadata
            .get_user(claims.sub)
            .await?
            .ok_or_else(|| ApiError::Unauthenticated("account no longer exists".to_string()))?;

        req.extensions_mut().insert(CurrentUser { user });
    }

    Ok(next.run(req).await)
}

/// Require an authenticated user.
pub fn require_user(req: &Request) -> ApiResult<&CurrentUser> {
    req.extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::Unauthenticated("authentication required".to_string()))
}

/// Require an authenticated user with the admin role.
pub fn require_admin(req: &Request) -> ApiResult<&CurrentUser> {
    let current = require_user(req)?;
    if current.is_admin() {
        Ok(current)
    } else {
        Err(ApiError::Forbidden("admin access required".to_string()))
    }
}
