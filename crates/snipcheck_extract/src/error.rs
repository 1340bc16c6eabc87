//! Error types for the extract module.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors that can occur during document reading and snippet extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    #[error("Code block opened at {path}:{line} is never closed")]
    MalformedBlock { path: PathBuf, line: usize },

    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No documents matched the given inputs")]
    NoDocuments,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Whether the error is recoverable at the run level (the pipeline
    /// continues with the next document).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedBlock { .. })
    }
}
