//! Blob storage trait.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Abstraction over durable blob storage.
///
/// Keys are relative, `/`-separated paths. Implementations must reject keys
/// that would escape the storage root.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write an object, replacing any existing object at the key.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Read an entire object.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Delete an object. Fails with `NotFound` if it does not exist.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check that the backend is reachable and writable.
    async fn health_check(&self) -> StorageResult<()>;
}
