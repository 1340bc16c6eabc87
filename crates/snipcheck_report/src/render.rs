//! Report rendering.
//!
//! Pure formatting over a [`ValidationReport`]; the same report always
//! renders to the same bytes.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::error::{ReportError, ReportResult};
use crate::report::{SnippetOutcome, SnippetStatus, ValidationReport};

/// Output format for the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    /// GitHub Actions workflow annotations.
    Github,
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "github" => Ok(Self::Github),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Renders validation reports. No side effects beyond the returned string.
pub struct Renderer;

impl Renderer {
    pub fn render(report: &ValidationReport, format: ReportFormat) -> ReportResult<String> {
        match format {
            ReportFormat::Text => Ok(Self::render_text(report)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportFormat::Github => Ok(Self::render_github(report)),
        }
    }

    fn render_text(report: &ValidationReport) -> String {
        let mut out = String::new();

        for document in &report.documents {
            let _ = writeln!(out, "{}", document.path.display());

            if let Some(malformed) = &document.malformed {
                let _ = writeln!(out, "  malformed: {}", malformed);
            }

            let mut last_heading: Option<&[String]> = None;
            for snippet in &document.snippets {
                if last_heading != Some(snippet.heading_path.as_slice()) {
                    let heading = if snippet.heading_path.is_empty() {
                        "(no heading)".to_string()
                    } else {
                        snippet.heading_path.join(" > ")
                    };
                    let _ = writeln!(out, "  {}", heading);
                    last_heading = Some(snippet.heading_path.as_slice());
                }
                Self::render_snippet(&mut out, snippet);
            }
            out.push('\n');
        }

        let t = &report.totals;
        let _ = writeln!(out, "Summary:");
        let _ = writeln!(out, "  Checked:      {}", t.checked);
        let _ = writeln!(out, "  Passed:       {}", t.passed);
        let _ = writeln!(out, "  Failed:       {}", t.failed);
        let _ = writeln!(out, "  Skipped:      {}", t.skipped);
        let _ = writeln!(out, "  Unverifiable: {}", t.unverifiable);
        let _ = writeln!(out, "  Unrecognized: {}", t.unrecognized);
        if t.malformed_documents > 0 {
            let _ = writeln!(out, "  Malformed documents: {}", t.malformed_documents);
        }

        out
    }

    fn render_snippet(out: &mut String, snippet: &SnippetOutcome) {
        let status = match snippet.status {
            SnippetStatus::Passed if snippet.cached => "PASSED (cached)",
            SnippetStatus::Passed => "PASSED",
            SnippetStatus::Failed => "FAILED",
            SnippetStatus::Skipped => "SKIPPED",
            SnippetStatus::Unverifiable => "UNVERIFIABLE",
            SnippetStatus::Unrecognized => "UNRECOGNIZED",
        };
        let language = if snippet.language.is_empty() {
            "(untagged)"
        } else {
            &snippet.language
        };
        let _ = writeln!(
            out,
            "    #{} {} (line {}) {}",
            snippet.ordinal, language, snippet.start_line, status
        );

        if let Some(note) = &snippet.note {
            let _ = writeln!(out, "        note: {}", note);
        }
        for diag in &snippet.diagnostics {
            let location = match diag.diagnostic.snippet_line {
                Some(line) => format!("line {}", line),
                None => "snippet".to_string(),
            };
            let severity = if diag.diagnostic.is_error() {
                "error"
            } else {
                "warning"
            };
            let _ = writeln!(
                out,
                "        {}[{}] {}: {}",
                severity, diag.class, location, diag.diagnostic.message
            );
        }
    }

    fn render_github(report: &ValidationReport) -> String {
        let mut out = String::new();

        for document in &report.documents {
            let file = document.path.display();

            if document.malformed.is_some() {
                let _ = writeln!(
                    out,
                    "::error file={}::unterminated code block in document",
                    file
                );
            }

            for snippet in &document.snippets {
                for diag in &snippet.diagnostics {
                    let level = if diag.diagnostic.is_error() {
                        "error"
                    } else {
                        "warning"
                    };
                    match diag.diagnostic.document_line {
                        Some(line) => {
                            let _ = writeln!(
                                out,
                                "::{} file={},line={}::{}: {}",
                                level, file, line, diag.class, diag.diagnostic.message
                            );
                        }
                        None => {
                            let _ = writeln!(
                                out,
                                "::{} file={}::snippet #{}: {}: {}",
                                level, file, snippet.ordinal, diag.class, diag.diagnostic.message
                            );
                        }
                    }
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::classify::FailureClass;
    use crate::report::{ClassifiedDiagnostic, DocumentReport, ReportTotals};
    use snipcheck_runner::{Diagnostic, Severity};

    fn sample_report() -> ValidationReport {
        ValidationReport {
            totals: ReportTotals {
                checked: 2,
                passed: 1,
                failed: 1,
                skipped: 1,
                unverifiable: 0,
                unrecognized: 0,
                malformed_documents: 0,
            },
            documents: vec![DocumentReport {
                path: PathBuf::from("android-devs.md"),
                malformed: None,
                snippets: vec![
                    SnippetOutcome {
                        ordinal: 1,
                        language: "dart".to_string(),
                        heading_path: vec!["Views".to_string()],
                        start_line: 10,
                        status: SnippetStatus::Passed,
                        cached: false,
                        diagnostics: Vec::new(),
                        note: None,
                    },
                    SnippetOutcome {
                        ordinal: 2,
                        language: "dart".to_string(),
                        heading_path: vec!["Views".to_string()],
                        start_line: 30,
                        status: SnippetStatus::Failed,
                        cached: false,
                        diagnostics: vec![ClassifiedDiagnostic {
                            diagnostic: Diagnostic::compile(
                                Severity::Error,
                                "Undefined name 'FlatButton'.",
                                Some(2),
                                Some(31),
                            ),
                            class: FailureClass::UnresolvedApi,
                        }],
                        note: None,
                    },
                    SnippetOutcome {
                        ordinal: 3,
                        language: "dart".to_string(),
                        heading_path: vec!["Intents".to_string()],
                        start_line: 50,
                        status: SnippetStatus::Skipped,
                        cached: false,
                        diagnostics: Vec::new(),
                        note: None,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_text_render_is_deterministic() {
        let report = sample_report();
        let a = Renderer::render(&report, ReportFormat::Text).unwrap();
        let b = Renderer::render(&report, ReportFormat::Text).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_text_render_groups_by_heading() {
        let report = sample_report();
        let text = Renderer::render(&report, ReportFormat::Text).unwrap();

        let views_pos = text.find("  Views").unwrap();
        let intents_pos = text.find("  Intents").unwrap();
        assert!(views_pos < intents_pos);
        // Views heading printed once for two snippets
        assert_eq!(text.matches("  Views").count(), 1);
        assert!(text.contains("error[unresolved API] line 2"));
        assert!(text.contains("Skipped:      1"));
    }

    #[test]
    fn test_github_render_emits_annotations() {
        let report = sample_report();
        let out = Renderer::render(&report, ReportFormat::Github).unwrap();
        assert!(out.contains("::error file=android-devs.md,line=31::unresolved API:"));
        // passing and skipped snippets produce no annotations
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_json_render_round_trips() {
        let report = sample_report();
        let json = Renderer::render(&report, ReportFormat::Json).unwrap();
        let parsed: ValidationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.totals.failed, 1);
        assert_eq!(parsed.documents.len(), 1);
    }

    #[test]
    fn test_unknown_format_errors() {
        assert!("yaml".parse::<ReportFormat>().is_err());
        assert_eq!("TEXT".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
    }
}
