//! User repository.

use crate::error::MetadataResult;
use crate::models::UserRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for user account operations.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Create a user.
    ///
    /// Fails with `AlreadyExists` when the email or handle is taken.
    async fn create_user(&self, user: &UserRow) -> MetadataResult<()>;

    /// Get a user by ID.
    async fn get_user(&self, user_id: Uuid) -> MetadataResult<Option<UserRow>>;

    /// Get a user by email.
    async fn get_user_by_email(&self, email: &str) -> MetadataResult<Option<UserRow>>;

    /// Check whether a user with this email or handle already exists.
    async fn identity_exists(&self, email: &str, handle: &str) -> MetadataResult<bool>;

    /// List all users, oldest first.
    async fn list_users(&self) -> MetadataResult<Vec<UserRow>>;

    /// Delete a user together with all owned ingests and charts,
    /// in one transaction. Fails with `NotFound` if the user is absent.
    async fn delete_user_cascade(&self, user_id: Uuid) -> MetadataResult<()>;

    /// Count all users.
    async fn count_users(&self) -> MetadataResult<u64>;
}
