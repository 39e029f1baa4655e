//! Local filesystem storage backend.

use crate::error::{StorageError, StorageResult};
use crate::traits::BlobStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem blob store.
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend, creating the root directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Root directory files are stored under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a full path, rejecting anything that would escape
    /// the storage root.
    fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(StorageError::InvalidKey(format!(
                "path traversal not allowed: {key}"
            )));
        }

        // Every component must be a plain name (no roots, prefixes, or `.`/`..`)
        for component in Path::new(key).components() {
            match component {
                std::path::Component::Normal(_) => {}
                _ => {
                    return Err(StorageError::InvalidKey(format!(
                        "contains unsafe path component: {key}"
                    )));
                }
            }
        }

        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobStore for FilesystemBackend {
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        let path = self.key_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to a temp name then rename so a crashed write never leaves
        // a half-written object at the final key.
        let tmp = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let path = self.key_path(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn health_check(&self) -> StorageResult<()> {
        let probe = self.root.join(".health");
        fs::write(&probe, b"ok").await?;
        fs::remove_file(&probe).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_backend() -> (tempfile::TempDir, FilesystemBackend) {
        let temp = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(temp.path()).await.unwrap();
        (temp, backend)
    }

    #[tokio::test]
    async fn test_put_get_delete_round_trip() {
        let (_temp, backend) = test_backend().await;

        backend
            .put("uploads/a.xlsx", Bytes::from_static(b"spreadsheet bytes"))
            .await
            .unwrap();
        assert!(backend.exists("uploads/a.xlsx").await.unwrap());

        let data = backend.get("uploads/a.xlsx").await.unwrap();
        assert_eq!(&data[..], b"spreadsheet bytes");

        backend.delete("uploads/a.xlsx").await.unwrap();
        assert!(!backend.exists("uploads/a.xlsx").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let (_temp, backend) = test_backend().await;

        assert!(matches!(
            backend.get("uploads/missing.xlsx").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            backend.delete("uploads/missing.xlsx").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_traversal_keys_rejected() {
        let (_temp, backend) = test_backend().await;

        for key in ["../escape", "uploads/../../etc/passwd", "/absolute", "", "./a"] {
            assert!(
                matches!(
                    backend.get(key).await,
                    Err(StorageError::InvalidKey(_))
                ),
                "key {key:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let (_temp, backend) = test_backend().await;

        backend
            .put("uploads/a.xlsx", Bytes::from_static(b"v1"))
            .await
            .unwrap();
        backend
            .put("uploads/a.xlsx", Bytes::from_static(b"v2"))
            .await
            .unwrap();

        assert_eq!(&backend.get("uploads/a.xlsx").await.unwrap()[..], b"v2");
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_temp, backend) = test_backend().await;
        backend.health_check().await.unwrap();
    }
}
