//! Database models mapping to the metadata schema.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User account record.
///
/// `password_hash` is an Argon2id PHC string and must never be serialized
/// into a response body.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub handle: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: OffsetDateTime,
}

/// Ingested spreadsheet record.
///
/// `headers` and `rows_json` hold the parsed tabular payload as JSON text
/// (an array of strings and an array of arrays of scalars, respectively).
/// `row_count` is denormalized so summary projections never touch the
/// row payload.
#[derive(Debug, Clone, FromRow)]
pub struct IngestRow {
    pub ingest_id: Uuid,
    pub user_id: Uuid,
    pub original_name: String,
    pub stored_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub headers: String,
    pub rows_json: String,
    pub row_count: i64,
    pub created_at: OffsetDateTime,
}

/// Chart definition record.
///
/// `config_json` is an opaque consumer-defined JSON object; the server
/// stores and returns it without validating its shape.
#[derive(Debug, Clone, FromRow)]
pub struct ChartRow {
    pub chart_id: Uuid,
    pub user_id: Uuid,
    pub ingest_id: Uuid,
    pub title: String,
    pub kind: String,
    pub x_field: String,
    pub y_field: String,
    pub config_json: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Summary projection of an ingest (no row payload).
#[derive(Debug, Clone, FromRow)]
pub struct IngestSummaryRow {
    pub ingest_id: Uuid,
    pub original_name: String,
    pub file_size: i64,
    pub headers: String,
    pub row_count: i64,
    pub created_at: OffsetDateTime,
}

/// Chart annotated with its parent ingest's display name.
#[derive(Debug, Clone, FromRow)]
pub struct ChartWithIngestRow {
    pub chart_id: Uuid,
    pub user_id: Uuid,
    pub ingest_id: Uuid,
    pub title: String,
    pub kind: String,
    pub x_field: String,
    pub y_field: String,
    pub config_json: Option<String>,
    pub created_at: OffsetDateTime,
    pub ingest_name: String,
}

/// Recently created ingest annotated with its owner's identity.
#[derive(Debug, Clone, FromRow)]
pub struct RecentIngestRow {
    pub ingest_id: Uuid,
    pub original_name: String,
    pub row_count: i64,
    pub created_at: OffsetDateTime,
    pub owner_handle: String,
    pub owner_email: String,
}

/// Platform-wide entity counts for the admin stats view.
#[derive(Debug, Clone, Default)]
pub struct PlatformCounts {
    pub users: u64,
    pub ingests: u64,
    pub charts: u64,
}
