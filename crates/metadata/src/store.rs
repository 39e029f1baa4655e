//! Metadata store trait and SQLite implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{ChartRepo, IngestRepo, UserRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: UserRepo + IngestRepo + ChartRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id BLOB PRIMARY KEY,
    handle TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'user',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ingests (
    ingest_id BLOB PRIMARY KEY,
    user_id BLOB NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    original_name TEXT NOT NULL,
    stored_name TEXT NOT NULL,
    file_path TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    headers TEXT NOT NULL,
    rows_json TEXT NOT NULL,
    row_count INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ingests_user ON ingests(user_id, created_at);

CREATE TABLE IF NOT EXISTS charts (
    chart_id BLOB PRIMARY KEY,
    user_id BLOB NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    ingest_id BLOB NOT NULL REFERENCES ingests(ingest_id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    kind TEXT NOT NULL,
    x_field TEXT NOT NULL,
    y_field TEXT NOT NULL,
    config_json TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_charts_user ON charts(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_charts_ingest ON charts(ingest_id);
"#;

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MetadataError::Config(format!("cannot create db directory: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))
            .map_err(MetadataError::Database)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            // Cascades from user and ingest deletion rely on this.
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection avoids
            // persistent "database is locked" failures under axum concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Classify unique-index violations so callers can surface them as
/// duplicate-identity errors rather than opaque database failures.
fn map_unique_violation(e: sqlx::Error, what: &str) -> MetadataError {
    match &e {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            MetadataError::AlreadyExists(what.to_string())
        }
        _ => MetadataError::Database(e),
    }
}

// Implement the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::models::*;
    use uuid::Uuid;

    #[async_trait]
    impl UserRepo for SqliteStore {
        async fn create_user(&self, user: &UserRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO users (user_id, handle, email, password_hash, role, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(user.user_id)
            .bind(&user.handle)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.role)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(
                    e,
                    &format!("user with email '{}' or handle '{}'", user.email, user.handle),
                )
            })?;
            Ok(())
        }

        async fn get_user(&self, user_id: Uuid) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn get_user_by_email(&self, email: &str) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn identity_exists(&self, email: &str, handle: &str) -> MetadataResult<bool> {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? OR handle = ?)",
            )
            .bind(email)
            .bind(handle)
            .fetch_one(&self.pool)
            .await?;
            Ok(exists)
        }

        async fn list_users(&self) -> MetadataResult<Vec<UserRow>> {
            let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }

        async fn delete_user_cascade(&self, user_id: Uuid) -> MetadataResult<()> {
            // The foreign keys alone would handle the dependents; deleting
            // explicitly keeps the cascade visible and inside one transaction.
            let mut tx = self.pool.begin().await?;

            sqlx::query("DELETE FROM charts WHERE user_id = ?")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM ingests WHERE user_id = ?")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            let result = sqlx::query("DELETE FROM users WHERE user_id = ?")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(MetadataError::NotFound(format!(
                    "user {user_id} not found"
                )));
            }

            tx.commit().await?;
            Ok(())
        }

        async fn count_users(&self) -> MetadataResult<u64> {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }
    }

    #[async_trait]
    impl IngestRepo for SqliteStore {
        async fn create_ingest(&self, ingest: &IngestRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO ingests (
                    ingest_id, user_id, original_name, stored_name, file_path,
                    file_size, headers, rows_json, row_count, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(ingest.ingest_id)
            .bind(ingest.user_id)
            .bind(&ingest.original_name)
            .bind(&ingest.stored_name)
            .bind(&ingest.file_path)
            .bind(ingest.file_size)
            .bind(&ingest.headers)
            .bind(&ingest.rows_json)
            .bind(ingest.row_count)
            .bind(ingest.created_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_ingest_for_user(
            &self,
            ingest_id: Uuid,
            user_id: Uuid,
        ) -> MetadataResult<Option<IngestRow>> {
            let row = sqlx::query_as::<_, IngestRow>(
                "SELECT * FROM ingests WHERE ingest_id = ? AND user_id = ?",
            )
            .bind(ingest_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn list_summaries_for_user(
            &self,
            user_id: Uuid,
        ) -> MetadataResult<Vec<IngestSummaryRow>> {
            let rows = sqlx::query_as::<_, IngestSummaryRow>(
                r#"
                SELECT ingest_id, original_name, file_size, headers, row_count, created_at
                FROM ingests WHERE user_id = ? ORDER BY created_at DESC
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn delete_ingest_for_user(
            &self,
            ingest_id: Uuid,
            user_id: Uuid,
        ) -> MetadataResult<bool> {
            let result = sqlx::query("DELETE FROM ingests WHERE ingest_id = ? AND user_id = ?")
                .bind(ingest_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        }

        async fn list_file_paths_for_user(&self, user_id: Uuid) -> MetadataResult<Vec<String>> {
            let paths: Vec<String> =
                sqlx::query_scalar("SELECT file_path FROM ingests WHERE user_id = ?")
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?;
            Ok(paths)
        }

        async fn recent_ingests(&self, limit: u32) -> MetadataResult<Vec<RecentIngestRow>> {
            let rows = sqlx::query_as::<_, RecentIngestRow>(
                r#"
                SELECT i.ingest_id, i.original_name, i.row_count, i.created_at,
                       u.handle AS owner_handle, u.email AS owner_email
                FROM ingests i
                JOIN users u ON u.user_id = i.user_id
                ORDER BY i.created_at DESC
                LIMIT ?
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn count_ingests(&self) -> MetadataResult<u64> {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ingests")
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }
    }

    #[async_trait]
    impl ChartRepo for SqliteStore {
        async fn create_chart(&self, chart: &ChartRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO charts (
                    chart_id, user_id, ingest_id, title, kind,
                    x_field, y_field, config_json, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(chart.chart_id)
            .bind(chart.user_id)
            .bind(chart.ingest_id)
            .bind(&chart.title)
            .bind(&chart.kind)
            .bind(&chart.x_field)
            .bind(&chart.y_field)
            .bind(&chart.config_json)
            .bind(chart.created_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_chart_for_user(
            &self,
            chart_id: Uuid,
            user_id: Uuid,
        ) -> MetadataResult<Option<ChartRow>> {
            let row = sqlx::query_as::<_, ChartRow>(
                "SELECT * FROM charts WHERE chart_id = ? AND user_id = ?",
            )
            .bind(chart_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn list_charts_for_user(
            &self,
            user_id: Uuid,
        ) -> MetadataResult<Vec<ChartWithIngestRow>> {
            let rows = sqlx::query_as::<_, ChartWithIngestRow>(
                r#"
                SELECT c.*, i.original_name AS ingest_name
                FROM charts c
                JOIN ingests i ON i.ingest_id = c.ingest_id
                WHERE c.user_id = ?
                ORDER BY c.created_at DESC
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn list_chart_ids_for_ingest(&self, ingest_id: Uuid) -> MetadataResult<Vec<Uuid>> {
            let ids: Vec<Uuid> =
                sqlx::query_scalar("SELECT chart_id FROM charts WHERE ingest_id = ?")
                    .bind(ingest_id)
                    .fetch_all(&self.pool)
                    .await?;
            Ok(ids)
        }

        async fn delete_chart_for_user(
            &self,
            chart_id: Uuid,
            user_id: Uuid,
        ) -> MetadataResult<bool> {
            let result = sqlx::query("DELETE FROM charts WHERE chart_id = ? AND user_id = ?")
                .bind(chart_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        }

        async fn count_charts(&self) -> MetadataResult<u64> {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM charts")
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }
    }
}
