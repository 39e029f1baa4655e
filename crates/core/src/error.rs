//! Core error types.

use thiserror::Error;

/// Errors from core domain logic.
#[derive(Debug, Error)]
pub enum Error {
    /// The spreadsheet's first worksheet contains no rows at all.
    #[error("document contains no rows")]
    EmptyDocument,

    /// The file extension is outside the ingest allow-list.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The workbook could not be read or decoded.
    #[error("failed to parse workbook: {0}")]
    Parse(String),

    /// A value failed domain validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
