//! Spreadsheet ingest handlers.

use crate::auth::require_user;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::StatusCode;
use axum::Json;
use chartdeck_core::sheet::{self, SheetData};
use chartdeck_metadata::models::{IngestRow, IngestSummaryRow};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// Multipart field carrying the spreadsheet.
const UPLOAD_FIELD: &str = "excelFile";

/// Summary projection of an ingest returned after upload and in history.
#[derive(Debug, Serialize)]
pub struct IngestSummary {
    pub id: Uuid,
    pub filename: String,
    pub file_size: i64,
    pub headers: Vec<String>,
    pub row_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl IngestSummary {
    fn from_row(row: &IngestSummaryRow) -> ApiResult<Self> {
        Ok(Self {
            id: row.ingest_id,
            filename: row.original_name.clone(),
            file_size: row.file_size,
            headers: serde_json::from_str(&row.headers)?,
            row_count: row.row_count,
            created_at: row.created_at,
        })
    }
}

/// Response after a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub upload: IngestSummary,
}

/// Response for the ingest history listing.
#[derive(Debug, Serialize)]
pub struct UploadHistoryResponse {
    pub uploads: Vec<IngestSummary>,
}

/// Full ingest payload including row data.
#[derive(Debug, Serialize)]
pub struct IngestDetail {
    pub id: Uuid,
    pub filename: String,
    pub stored_name: String,
    pub file_size: i64,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<chartdeck_core::CellValue>>,
    pub row_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Pull the spreadsheet file out of the multipart body.
async fn extract_upload_file(mut multipart: Multipart) -> ApiResult<(String, bytes::Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Validation("uploaded file has no filename".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("failed to read upload: {e}")))?;

        return Ok((filename, data));
    }

    Err(ApiError::Validation(format!(
        "no file uploaded (expected multipart field '{UPLOAD_FIELD}')"
    )))
}

/// Remove a stored file after a failed ingest so no orphan is left behind.
async fn remove_stored_file(state: &AppState, key: &str) {
    if let Err(e) = state.storage.delete(key).await {
        tracing::warn!(key = %key, error = %e, "failed to remove stored file after ingest failure");
    }
}

/// POST /upload - Ingest one spreadsheet.
///
/// The extension is checked before anything touches storage; after the file
/// is written, any parse or persistence failure removes it again.
#[tracing::instrument(skip(state, req))]
pub async fn upload_spreadsheet(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let user_id = require_user(&req)?.user.user_id;

    let multipart = Multipart::from_request(req, &())
        .await
        .map_err(|e| ApiError::Validation(format!("expected multipart request: {e}")))?;
    let (filename, data) = extract_upload_file(multipart).await?;

    let ext = sheet::checked_extension(&filename)?;
    if data.is_empty() {
        return Err(ApiError::Validation("uploaded file is empty".to_string()));
    }

    let ingest_id = Uuid::new_v4();
    let stored_name = format!("{ingest_id}{ext}");

    state.storage.put(&stored_name, data.clone()).await?;

    let parsed: SheetData = match sheet::parse_workbook(&data) {
        Ok(parsed) => parsed,
        Err(e) => {
            remove_stored_file(&state, &stored_name).await;
            return Err(e.into());
        }
    };

    let ingest = IngestRow {
        ingest_id,
        user_id,
        original_name: filename,
        stored_name: stored_name.clone(),
        file_path: stored_name.clone(),
        file_size: data.len() as i64,
        headers: serde_json::to_string(&parsed.headers)?,
        rows_json: serde_json::to_string(&parsed.rows)?,
        row_count: parsed.row_count() as i64,
        created_at: OffsetDateTime::now_utc(),
    };

    if let Err(e) = state.metadata.create_ingest(&ingest).await {
        remove_stored_file(&state, &stored_name).await;
        return Err(e.into());
    }

    tracing::info!(
        ingest_id = %ingest_id,
        user_id = %user_id,
        rows = parsed.row_count(),
        "spreadsheet ingested"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "file uploaded successfully".to_string(),
            upload: IngestSummary {
                id: ingest_id,
                filename: ingest.original_name.clone(),
                file_size: ingest.file_size,
                headers: parsed.headers,
                row_count: ingest.row_count,
                created_at: ingest.created_at,
            },
        }),
    ))
}

/// GET /upload/history - List the caller's ingests, newest first.
pub async fn upload_history(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<UploadHistoryResponse>> {
    let user_id = require_user(&req)?.user.user_id;

    let rows = state.metadata.list_summaries_for_user(user_id).await?;
    let uploads = rows
        .iter()
        .map(IngestSummary::from_row)
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(Json(UploadHistoryResponse { uploads }))
}

/// GET /upload/{id} - Fetch one owned ingest with full row data.
pub async fn get_upload(
    State(state): State<AppState>,
    Path(ingest_id): Path<Uuid>,
    req: Request,
) -> ApiResult<Json<IngestDetail>> {
    let user_id = require_user(&req)?.user.user_id;

    let row = state
        .metadata
        .get_ingest_for_user(ingest_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("upload not found".to_string()))?;

    Ok(Json(IngestDetail {
        id: row.ingest_id,
        filename: row.original_name,
        stored_name: row.stored_name,
        file_size: row.file_size,
        headers: serde_json::from_str(&row.headers)?,
        rows: serde_json::from_str(&row.rows_json)?,
        row_count: row.row_count,
        created_at: row.created_at,
    }))
}

/// DELETE /upload/{id} - Delete one owned ingest.
///
/// Charts referencing the ingest are removed by the foreign-key cascade;
/// the backing file is removed from storage before the record goes away.
pub async fn delete_upload(
    State(state): State<AppState>,
    Path(ingest_id): Path<Uuid>,
    req: Request,
) -> ApiResult<StatusCode> {
    let user_id = require_user(&req)?.user.user_id;

    let row = state
        .metadata
        .get_ingest_for_user(ingest_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("upload not found".to_string()))?;

    match state.storage.delete(&row.file_path).await {
        Ok(()) => {}
        Err(chartdeck_storage::StorageError::NotFound(_)) => {
            tracing::warn!(ingest_id = %ingest_id, "backing file already missing on delete");
        }
        Err(e) => return Err(e.into()),
    }

    let deleted = state
        .metadata
        .delete_ingest_for_user(ingest_id, user_id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("upload not found".to_string()));
    }

    tracing::info!(ingest_id = %ingest_id, user_id = %user_id, "ingest deleted");

    Ok(StatusCode::NO_CONTENT)
}
