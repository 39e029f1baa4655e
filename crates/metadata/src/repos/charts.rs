//! Chart repository.

use crate::error::MetadataResult;
use crate::models::{ChartRow, ChartWithIngestRow};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for chart definition operations.
#[async_trait]
pub trait ChartRepo: Send + Sync {
    /// Create a chart. The referenced ingest must exist; the foreign key
    /// makes the chart a member of the ingest's chart set atomically.
    async fn create_chart(&self, chart: &ChartRow) -> MetadataResult<()>;

    /// Get one chart by ID, scoped to its owner.
    async fn get_chart_for_user(
        &self,
        chart_id: Uuid,
        user_id: Uuid,
    ) -> MetadataResult<Option<ChartRow>>;

    /// List all charts owned by a user, newest first, annotated with the
    /// parent ingest's display name.
    async fn list_charts_for_user(&self, user_id: Uuid)
        -> MetadataResult<Vec<ChartWithIngestRow>>;

    /// Chart IDs referencing an ingest.
    async fn list_chart_ids_for_ingest(&self, ingest_id: Uuid) -> MetadataResult<Vec<Uuid>>;

    /// Delete one chart by ID, scoped to its owner. Returns `false` when no
    /// matching chart exists.
    async fn delete_chart_for_user(&self, chart_id: Uuid, user_id: Uuid) -> MetadataResult<bool>;

    /// Count all charts.
    async fn count_charts(&self) -> MetadataResult<u64>;
}
