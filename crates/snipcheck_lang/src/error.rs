//! Error types for the language registry.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for language registry operations.
pub type LangResult<T> = Result<T, LangError>;

/// Errors that can occur while loading or using language definitions.
#[derive(Error, Debug)]
pub enum LangError {
    #[error("No language definition for tag '{0}'")]
    UnknownLanguage(String),

    #[error("Invalid pattern '{pattern}' in language '{language}': {message}")]
    InvalidPattern {
        language: String,
        pattern: String,
        message: String,
    },

    #[error("Language override file not found: {0}")]
    OverridesNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
