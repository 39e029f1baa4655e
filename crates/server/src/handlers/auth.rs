//! Authentication endpoints: registration, login, identity.

use crate::auth::require_user;
use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{read_json_body, MAX_JSON_BODY_SIZE};
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::Json;
use chartdeck_core::Role;
use chartdeck_metadata::models::UserRow;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use uuid::Uuid;

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub handle: String,
    pub email: String,
    pub password: String,
    /// Optional admin-grant key; a matching value yields the admin role.
    pub admin_key: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public-safe projection of a user record.
#[derive(Debug, Serialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub handle: String,
    pub email: String,
    pub role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&UserRow> for UserPublic {
    fn from(row: &UserRow) -> Self {
        Self {
            id: row.user_id,
            handle: row.handle.clone(),
            email: row.email.clone(),
            role: row.role.clone(),
            created_at: row.created_at,
        }
    }
}

/// Response for register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPublic,
}

/// Response for the resolved identity.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserPublic,
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Decide the role for a new registration.
///
/// The admin role is granted only when the supplied key's SHA-256 digest
/// matches the configured grant hash; no hash configured means admin
/// self-registration is disabled entirely.
fn resolve_role(state: &AppState, admin_key: Option<&str>) -> Role {
    match (admin_key, &state.config.auth.admin_grant_key_hash) {
        (Some(key), Some(expected)) if sha256_hex(key.as_bytes()) == *expected => Role::Admin,
        _ => Role::User,
    }
}

fn validate_registration(body: &RegisterRequest) -> ApiResult<()> {
    if body.handle.trim().is_empty() {
        return Err(ApiError::Validation("handle is required".to_string()));
    }
    if body.email.trim().is_empty() || !body.email.contains('@') {
        return Err(ApiError::Validation(
            "a valid email address is required".to_string(),
        ));
    }
    if body.password.is_empty() {
        return Err(ApiError::Validation("password is required".to_string()));
    }
    Ok(())
}

/// POST /auth/register - Create a user and issue a token.
pub async fn register(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let body: RegisterRequest = read_json_body(req, MAX_JSON_BODY_SIZE).await?;
    validate_registration(&body)?;

    if state
        .metadata
        .identity_exists(&body.email, &body.handle)
        .await?
    {
        return Err(ApiError::Validation(
            "user with this email or handle already exists".to_string(),
        ));
    }

    let role = resolve_role(&state, body.admin_key.as_deref());
    let password_hash = chartdeck_auth::hash_password(&body.password)?;

    let user = UserRow {
        user_id: Uuid::new_v4(),
        handle: body.handle.trim().to_string(),
        email: body.email.trim().to_string(),
        password_hash,
        role: role.as_str().to_string(),
        created_at: OffsetDateTime::now_utc(),
    };

    // The unique indexes still guard the race between the existence check
    // and this insert.
    state.metadata.create_user(&user).await.map_err(|e| match e {
        chartdeck_metadata::MetadataError::AlreadyExists(_) => ApiError::Validation(
            "user with this email or handle already exists".to_string(),
        ),
        other => other.into(),
    })?;

    if role.is_admin() {
        tracing::info!(user_id = %user.user_id, handle = %user.handle, "admin role granted at registration");
    }

    let token = state
        .token_keys
        .issue(user.user_id, state.config.auth.token_ttl())?;

    tracing::info!(user_id = %user.user_id, handle = %user.handle, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserPublic::from(&user),
        }),
    ))
}

/// POST /auth/login - Verify credentials and issue a token.
pub async fn login(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<AuthResponse>> {
    let body: LoginRequest = read_json_body(req, MAX_JSON_BODY_SIZE).await?;

    // Unknown email and wrong password are indistinguishable to the caller.
    let user = state
        .metadata
        .get_user_by_email(body.email.trim())
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !chartdeck_auth::verify_password(&body.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state
        .token_keys
        .issue(user.user_id, state.config.auth.token_ttl())?;

    tracing::debug!(user_id = %user.user_id, "login succeeded");

    Ok(Json(AuthResponse {
        token,
        user: UserPublic::from(&user),
    }))
}

/// GET /auth/me - Return the resolved identity.
pub async fn me(req: Request) -> ApiResult<Json<MeResponse>> {
    let current = require_user(&req)?;
    Ok(Json(MeResponse {
        user: UserPublic::from(&current.user),
    }))
}
