//! Error types for the normalize module.

use thiserror::Error;

use snipcheck_lang::LangError;

/// Result type alias for normalization operations.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Errors that can occur while turning a snippet into a compilable unit.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// The snippet declares an identifier the wrapper would also introduce,
    /// so wrapping would change its meaning. The snippet is reported as
    /// unverifiable instead.
    #[error("Snippet {snippet} declares wrapper identifier '{identifier}' and cannot be wrapped")]
    AmbiguousFragment { snippet: String, identifier: String },

    #[error(transparent)]
    Language(#[from] LangError),
}

impl NormalizeError {
    /// Whether the snippet should be reported as unverifiable rather than
    /// aborting the run.
    pub fn is_unverifiable(&self) -> bool {
        matches!(self, Self::AmbiguousFragment { .. })
    }
}
