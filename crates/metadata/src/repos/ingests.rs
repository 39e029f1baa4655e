//! Ingest repository.

use crate::error::MetadataResult;
use crate::models::{IngestRow, IngestSummaryRow, RecentIngestRow};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for ingested spreadsheet operations.
///
/// Every per-user operation is ownership-scoped: an ingest owned by another
/// user is indistinguishable from one that does not exist.
#[async_trait]
pub trait IngestRepo: Send + Sync {
    /// Create an ingest record.
    async fn create_ingest(&self, ingest: &IngestRow) -> MetadataResult<()>;

    /// Get one ingest by ID, scoped to its owner.
    async fn get_ingest_for_user(
        &self,
        ingest_id: Uuid,
        user_id: Uuid,
    ) -> MetadataResult<Option<IngestRow>>;

    /// List summaries of all ingests owned by a user, newest first.
    async fn list_summaries_for_user(
        &self,
        user_id: Uuid,
    ) -> MetadataResult<Vec<IngestSummaryRow>>;

    /// Delete one ingest by ID, scoped to its owner. Charts referencing it
    /// are removed by the foreign-key cascade. Returns `false` when no
    /// matching ingest exists.
    async fn delete_ingest_for_user(&self, ingest_id: Uuid, user_id: Uuid)
        -> MetadataResult<bool>;

    /// Storage keys of every file belonging to a user's ingests.
    /// Used for blob cleanup after a user cascade delete.
    async fn list_file_paths_for_user(&self, user_id: Uuid) -> MetadataResult<Vec<String>>;

    /// The most recently created ingests across all users, annotated with
    /// their owners' identity.
    async fn recent_ingests(&self, limit: u32) -> MetadataResult<Vec<RecentIngestRow>>;

    /// Count all ingests.
    async fn count_ingests(&self) -> MetadataResult<u64>;
}
