//! Core domain types and shared logic for Chartdeck.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Application configuration
//! - Parsed spreadsheet content (headers + scalar cell rows)
//! - Chart kinds and user roles
//! - Shared constants and the core error type

pub mod chart;
pub mod config;
pub mod error;
pub mod role;
pub mod sheet;

pub use chart::ChartKind;
pub use config::{AppConfig, AuthConfig, MetadataConfig, ServerConfig, StorageConfig};
pub use error::{Error, Result};
pub use role::Role;
pub use sheet::{CellValue, SheetData};

/// Maximum accepted spreadsheet size: 10 MiB.
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// File extensions accepted for ingest, lowercase, including the dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".xlsx", ".xls"];
