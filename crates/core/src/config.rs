//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use time::Duration;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Origins allowed for cross-origin requests.
    /// An empty list allows any origin (development default).
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Blob storage configuration for uploaded spreadsheets.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Root directory for stored files.
        path: PathBuf,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("./data/uploads"),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database.
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/chartdeck.db"),
        }
    }
}

/// Authentication configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for bearer tokens.
    pub signing_secret: String,
    /// Token lifetime in seconds (default: 7 days).
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    /// SHA-256 hex digest of the registration admin-grant key.
    /// Generate with: `echo -n "your-grant-key" | sha256sum`
    /// When unset, admin self-registration is disabled.
    #[serde(default)]
    pub admin_grant_key_hash: Option<String>,
}

fn default_token_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

impl AuthConfig {
    /// Get the token lifetime as a Duration.
    pub fn token_ttl(&self) -> Duration {
        let secs = i64::try_from(self.token_ttl_secs).unwrap_or(i64::MAX);
        Duration::seconds(secs)
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Create a test configuration with deterministic secrets.
    ///
    /// **For testing only.** Storage and metadata paths still need to be
    /// pointed at scratch directories by the caller.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            metadata: MetadataConfig::default(),
            auth: AuthConfig {
                signing_secret: "test-signing-secret".to_string(),
                token_ttl_secs: default_token_ttl_secs(),
                // SHA256 of "test-admin-key"
                admin_grant_key_hash: Some(
                    "944650a7cd0f9e14d5c4fb15edbffb7fa45fb9ed36a4fa9be3d7e5476ae51bd9"
                        .to_string(),
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::for_testing();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.auth.token_ttl(), Duration::days(7));
        assert!(config.server.allowed_origins.is_empty());
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: AppConfig = serde_json::from_str(
            r#"{"auth": {"signing_secret": "s3cret"}}"#,
        )
        .unwrap();
        assert_eq!(config.auth.signing_secret, "s3cret");
        assert_eq!(config.auth.token_ttl_secs, 604800);
        assert!(config.auth.admin_grant_key_hash.is_none());
        assert!(matches!(
            config.storage,
            StorageConfig::Filesystem { ref path } if path.ends_with("uploads")
        ));
    }
}
