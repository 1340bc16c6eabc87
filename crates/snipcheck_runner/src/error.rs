//! Error types for the runner module.

use thiserror::Error;

use snipcheck_lang::LangError;

/// Result type alias for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Errors that can occur while executing analyzers.
///
/// Per-snippet analyzer failures (crash, timeout, non-zero exit without
/// diagnostics) are not errors here; they surface as tool-failure
/// diagnostics on the unit's outcome. Only conditions that make the whole
/// run impossible are represented.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("No toolchain registered for language '{language}'")]
    ToolchainNotFound { language: String },

    #[error("Toolchain '{command}' for language '{language}' is not available on this system")]
    ToolchainUnavailable { language: String, command: String },

    #[error("Analyzer task panicked: {0}")]
    TaskPanicked(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Language(#[from] LangError),
}
