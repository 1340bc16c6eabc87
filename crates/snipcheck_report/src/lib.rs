//! # snipcheck_report
//!
//! Turns raw analysis outcomes into the final validation report.
//!
//! Classification is a policy, not something the compiler hands over: a
//! per-language pattern allow-list decides whether a failing diagnostic
//! means the guide is stale ("unresolved API"), merely behind
//! ("deprecated API"), or simply mistranscribed ("syntax error"). Tool
//! failures stay a class of their own.
//!
//! Rendering is pure and deterministic; the same report always produces the
//! same bytes, in text, JSON or GitHub-annotation form.

pub mod cache;
pub mod classify;
pub mod error;
pub mod render;
pub mod report;

pub use cache::SnippetCache;
pub use classify::{Classifier, FailureClass};
pub use error::{ReportError, ReportResult};
pub use render::{Renderer, ReportFormat};
pub use report::{
    ClassifiedDiagnostic, DocumentReport, ReportBuilder, ReportTotals, SnippetOutcome,
    SnippetStatus, ValidationReport,
};
