//! Administrative aggregation endpoints.
//!
//! All handlers here are gated on the admin role via [`require_admin`].

use crate::auth::require_admin;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::Json;
use chartdeck_core::Role;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// Number of recent ingests included in the stats view.
const RECENT_INGEST_LIMIT: u32 = 10;

/// Lightweight ingest projection shown per user in the admin listing.
#[derive(Debug, Serialize)]
pub struct AdminIngestEntry {
    pub id: Uuid,
    pub original_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// User entry in the admin listing; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct AdminUserEntry {
    pub id: Uuid,
    pub handle: String,
    pub email: String,
    pub role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub uploads: Vec<AdminIngestEntry>,
}

/// Response for the user listing.
#[derive(Debug, Serialize)]
pub struct AdminUserListResponse {
    pub users: Vec<AdminUserEntry>,
}

/// Platform-wide counts.
#[derive(Debug, Serialize)]
pub struct PlatformStats {
    pub total_users: u64,
    pub total_ingests: u64,
    pub total_charts: u64,
}

/// Recently created ingest annotated with its owner.
#[derive(Debug, Serialize)]
pub struct RecentIngestEntry {
    pub id: Uuid,
    pub original_name: String,
    pub row_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub owner_handle: String,
    pub owner_email: String,
}

/// Response for the stats view.
#[derive(Debug, Serialize)]
pub struct AdminStatsResponse {
    pub stats: PlatformStats,
    pub recent_ingests: Vec<RecentIngestEntry>,
}

/// GET /admin/users - List all users with their owned ingests.
pub async fn list_users(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<AdminUserListResponse>> {
    require_admin(&req)?;

    let mut users = Vec::new();
    for user in state.metadata.list_users().await? {
        let uploads = state
            .metadata
            .list_summaries_for_user(user.user_id)
            .await?
            .into_iter()
            .map(|row| AdminIngestEntry {
                id: row.ingest_id,
                original_name: row.original_name,
                created_at: row.created_at,
            })
            .collect();

        users.push(AdminUserEntry {
            id: user.user_id,
            handle: user.handle,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            uploads,
        });
    }

    Ok(Json(AdminUserListResponse { users }))
}

/// GET /admin/stats - Platform counts plus the most recent ingests.
pub async fn get_stats(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<AdminStatsResponse>> {
    require_admin(&req)?;

    let stats = PlatformStats {
        total_users: state.metadata.count_users().await?,
        total_ingests: state.metadata.count_ingests().await?,
        total_charts: state.metadata.count_charts().await?,
    };

    let recent_ingests = state
        .metadata
        .recent_ingests(RECENT_INGEST_LIMIT)
        .await?
        .into_iter()
        .map(|row| RecentIngestEntry {
            id: row.ingest_id,
            original_name: row.original_name,
            row_count: row.row_count,
            created_at: row.created_at,
            owner_handle: row.owner_handle,
            owner_email: row.owner_email,
        })
        .collect();

    Ok(Json(AdminStatsResponse {
        stats,
        recent_ingests,
    }))
}

/// DELETE /admin/users/{id} - Delete a non-admin user and everything they own.
///
/// The row cascade (charts, ingests, user) runs in one transaction; the
/// user's stored files are removed afterwards best-effort.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    req: Request,
) -> ApiResult<StatusCode> {
    require_admin(&req)?;

    let target = state
        .metadata
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    if target.role == Role::Admin.as_str() {
        return Err(ApiError::InvalidOperation(
            "cannot delete an admin user".to_string(),
        ));
    }

    let file_paths = state.metadata.list_file_paths_for_user(user_id).await?;

    state.metadata.delete_user_cascade(user_id).await?;

    for path in &file_paths {
        if let Err(e) = state.storage.delete(path).await {
            tracing::warn!(user_id = %user_id, key = %path, error = %e, "failed to remove file during user cascade");
        }
    }

    tracing::info!(
        user_id = %user_id,
        handle = %target.handle,
        files = file_paths.len(),
        "user deleted with cascade"
    );

    Ok(StatusCode::NO_CONTENT)
}
