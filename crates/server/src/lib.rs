//! HTTP API server for Chartdeck.
//!
//! This crate provides the HTTP control plane:
//! - Registration, login, and identity resolution
//! - Spreadsheet ingest (multipart upload, parse, persist)
//! - Chart definition CRUD bound to owned ingests
//! - Admin aggregation endpoints (users, stats, cascade delete)

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
