//! Chart definition handlers.

use crate::auth::require_user;
use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{read_json_body, MAX_JSON_BODY_SIZE};
use crate::state::AppState;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::Json;
use chartdeck_core::ChartKind;
use chartdeck_metadata::models::{ChartRow, ChartWithIngestRow};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Chart creation request.
#[derive(Debug, Deserialize)]
pub struct CreateChartRequest {
    pub title: String,
    pub kind: String,
    pub x_field: String,
    pub y_field: String,
    pub ingest_id: Uuid,
    /// Free-form rendering configuration; stored opaquely.
    pub config: Option<serde_json::Value>,
}

/// Chart as returned to its owner.
#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub id: Uuid,
    pub title: String,
    pub kind: String,
    pub x_field: String,
    pub y_field: String,
    pub ingest_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingest_name: Option<String>,
    pub config: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ChartResponse {
    fn from_row(row: &ChartRow) -> ApiResult<Self> {
        Ok(Self {
            id: row.chart_id,
            title: row.title.clone(),
            kind: row.kind.clone(),
            x_field: row.x_field.clone(),
            y_field: row.y_field.clone(),
            ingest_id: row.ingest_id,
            ingest_name: None,
            config: parse_config(row.config_json.as_deref())?,
            created_at: row.created_at,
        })
    }

    fn from_annotated_row(row: &ChartWithIngestRow) -> ApiResult<Self> {
        Ok(Self {
            id: row.chart_id,
            title: row.title.clone(),
            kind: row.kind.clone(),
            x_field: row.x_field.clone(),
            y_field: row.y_field.clone(),
            ingest_id: row.ingest_id,
            ingest_name: Some(row.ingest_name.clone()),
            config: parse_config(row.config_json.as_deref())?,
            created_at: row.created_at,
        })
    }
}

fn parse_config(config_json: Option<&str>) -> ApiResult<Option<serde_json::Value>> {
    match config_json {
        Some(json) => Ok(Some(serde_json::from_str(json)?)),
        None => Ok(None),
    }
}

/// Response after creating a chart.
#[derive(Debug, Serialize)]
pub struct CreateChartResponse {
    pub message: String,
    pub chart: ChartResponse,
}

/// Response for the chart listing.
#[derive(Debug, Serialize)]
pub struct ChartListResponse {
    pub charts: Vec<ChartResponse>,
}

/// POST /charts - Create a chart over an owned ingest.
pub async fn create_chart(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<CreateChartResponse>)> {
    let user_id = require_user(&req)?.user.user_id;
    let body: CreateChartRequest = read_json_body(req, MAX_JSON_BODY_SIZE).await?;

    if body.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }
    if body.x_field.trim().is_empty() || body.y_field.trim().is_empty() {
        return Err(ApiError::Validation(
            "x_field and y_field are required".to_string(),
        ));
    }
    let kind = ChartKind::parse(&body.kind)
        .map_err(|_| ApiError::Validation(format!("unknown chart kind: {}", body.kind)))?;

    // The parent ingest must exist and belong to the caller.
    state
        .metadata
        .get_ingest_for_user(body.ingest_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("upload not found".to_string()))?;

    let chart = ChartRow {
        chart_id: Uuid::new_v4(),
        user_id,
        ingest_id: body.ingest_id,
        title: body.title.trim().to_string(),
        kind: kind.as_str().to_string(),
        x_field: body.x_field,
        y_field: body.y_field,
        config_json: body.config.as_ref().map(|v| v.to_string()),
        created_at: OffsetDateTime::now_utc(),
    };

    state.metadata.create_chart(&chart).await?;

    tracing::info!(chart_id = %chart.chart_id, ingest_id = %chart.ingest_id, "chart created");

    Ok((
        StatusCode::CREATED,
        Json(CreateChartResponse {
            message: "chart created successfully".to_string(),
            chart: ChartResponse::from_row(&chart)?,
        }),
    ))
}

/// GET /charts - List the caller's charts, newest first.
pub async fn list_charts(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<ChartListResponse>> {
    let user_id = require_user(&req)?.user.user_id;

    let rows = state.metadata.list_charts_for_user(user_id).await?;
    let charts = rows
        .iter()
        .map(ChartResponse::from_annotated_row)
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(Json(ChartListResponse { charts }))
}

/// GET /charts/{id} - Fetch one owned chart.
pub async fn get_chart(
    State(state): State<AppState>,
    Path(chart_id): Path<Uuid>,
    req: Request,
) -> ApiResult<Json<ChartResponse>> {
    let user_id = require_user(&req)?.user.user_id;

    let row = state
        .metadata
        .get_chart_for_user(chart_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("chart not found".to_string()))?;

    Ok(Json(ChartResponse::from_row(&row)?))
}

/// DELETE /charts/{id} - Delete one owned chart.
pub async fn delete_chart(
    State(state): State<AppState>,
    Path(chart_id): Path<Uuid>,
    req: Request,
) -> ApiResult<StatusCode> {
    let user_id = require_user(&req)?.user.user_id;

    let deleted = state
        .metadata
        .delete_chart_for_user(chart_id, user_id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("chart not found".to_string()));
    }

    tracing::info!(chart_id = %chart_id, user_id = %user_id, "chart deleted");

    Ok(StatusCode::NO_CONTENT)
}
