//! Failure classification.
//!
//! The analyzer alone cannot tell a stale guide from a transcription
//! mistake, so classification is a policy layered on top: per-language
//! pattern allow-lists decide whether a message points at a missing API,
//! a deprecated one, or a plain syntax error.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use snipcheck_lang::LanguageRegistry;
use snipcheck_runner::{Diagnostic, DiagnosticKind};

/// What a failing diagnostic means for the guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// Likely a transcription mistake in the guide itself.
    SyntaxError,
    /// Symbol missing from the current framework version; the guide is
    /// probably stale.
    UnresolvedApi,
    /// Usage still compiles but the API is deprecated; the guide should be
    /// updated.
    DeprecatedApi,
    /// The analyzer itself failed; says nothing about the snippet.
    ToolFailure,
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SyntaxError => "syntax error",
            Self::UnresolvedApi => "unresolved API",
            Self::DeprecatedApi => "deprecated API",
            Self::ToolFailure => "tool failure",
        };
        f.write_str(s)
    }
}

/// Pattern-driven classifier over the language registry.
pub struct Classifier<'a> {
    registry: &'a LanguageRegistry,
}

impl<'a> Classifier<'a> {
    pub fn new(registry: &'a LanguageRegistry) -> Self {
        Self { registry }
    }

    pub fn classify(&self, language: &str, diagnostic: &Diagnostic) -> FailureClass {
        if diagnostic.kind == DiagnosticKind::ToolFailure {
            return FailureClass::ToolFailure;
        }

        let Some(spec) = self.registry.get(language) else {
            return FailureClass::SyntaxError;
        };

        if matches_any(&spec.classify.unresolved, &diagnostic.message) {
            FailureClass::UnresolvedApi
        } else if matches_any(&spec.classify.deprecated, &diagnostic.message) {
            FailureClass::DeprecatedApi
        } else {
            FailureClass::SyntaxError
        }
    }
}

fn matches_any(patterns: &[String], message: &str) -> bool {
    patterns.iter().any(|pattern| {
        if let Ok(re) = Regex::new(pattern) {
            re.is_match(message)
        } else {
            false
        }
    })
}
