//! Error types for the report module.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur while building, rendering or caching reports.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Unknown report format '{0}' (expected text, json or github)")]
    UnknownFormat(String),

    #[error("Failed to persist cache at {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
