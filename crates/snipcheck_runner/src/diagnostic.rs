//! Analyzer diagnostics and per-unit outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use snipcheck_normalize::NormalizedUnit;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// What produced the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A genuine analyzer message about the snippet.
    Compile,
    /// The analyzer itself crashed, timed out, or produced no usable
    /// output. Never conflated with a compile error.
    ToolFailure,
}

/// One analyzer message, with its line already remapped from the wrapped
/// unit back to the original snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// 1-based line within the original snippet, when the analyzer gave one.
    pub snippet_line: Option<usize>,
    /// Corresponding 1-based line within the document.
    pub document_line: Option<usize>,
}

impl Diagnostic {
    pub fn compile(
        severity: Severity,
        message: impl Into<String>,
        snippet_line: Option<usize>,
        document_line: Option<usize>,
    ) -> Self {
        Self {
            severity,
            kind: DiagnosticKind::Compile,
            message: message.into(),
            snippet_line,
            document_line,
        }
    }

    pub fn tool_failure(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind: DiagnosticKind::ToolFailure,
            message: message.into(),
            snippet_line: None,
            document_line: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Result of analyzing one normalized unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitOutcome {
    pub unit: NormalizedUnit,
    pub diagnostics: Vec<Diagnostic>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Set by the cache layer when a previous passing run was reused.
    pub cached: bool,
}

impl UnitOutcome {
    pub fn passed(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_is_error_severity() {
        let d = Diagnostic::tool_failure("analyzer timed out after 60s");
        assert!(d.is_error());
        assert_eq!(d.kind, DiagnosticKind::ToolFailure);
        assert!(d.snippet_line.is_none());
    }

    #[test]
    fn test_warning_only_outcome_passes() {
        let d = Diagnostic::compile(Severity::Warning, "unused variable", Some(1), Some(10));
        assert!(!d.is_error());
    }
}
