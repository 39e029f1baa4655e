//! Metadata store abstraction and implementation for Chartdeck.
//!
//! This crate provides the control-plane data model:
//! - User accounts, credentials, and roles
//! - Ingested spreadsheets and their parsed tabular payloads
//! - Chart definitions bound to ingests
//! - Ownership scoping and cascade deletion

pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use store::{MetadataStore, SqliteStore};

use chartdeck_core::config::MetadataConfig;
use std::sync::Arc;

/// Create a metadata store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    match config {
        MetadataConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn MetadataStore>)
        }
    }
}
