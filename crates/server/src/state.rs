//! Application state shared across handlers.

use chartdeck_auth::TokenKeys;
use chartdeck_core::config::AppConfig;
use chartdeck_metadata::MetadataStore;
use chartdeck_storage::BlobStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Blob storage for uploaded spreadsheet files.
    pub storage: Arc<dyn BlobStore>,
    /// Metadata store.
    pub metadata: Arc<dyn MetadataStore>,
    /// Bearer token signing/verification keys.
    pub token_keys: Arc<TokenKeys>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn BlobStore>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        let token_keys = TokenKeys::new(config.auth.signing_secret.as_bytes());
        Self {
            config: Arc::new(config),
            storage,
            metadata,
            token_keys: Arc::new(token_keys),
        }
    }
}
