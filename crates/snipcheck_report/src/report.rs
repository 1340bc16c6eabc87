//! Validation report assembly.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use snipcheck_extract::{CodeSnippet, DocumentExtraction};
use snipcheck_lang::LanguageRegistry;
use snipcheck_runner::{Diagnostic, UnitOutcome};

use crate::classify::{Classifier, FailureClass};

/// Final status of one snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnippetStatus {
    Passed,
    Failed,
    /// Explicit author opt-out; never compiled, always counted.
    Skipped,
    /// Wrapping was ambiguous; never compiled, always counted.
    Unverifiable,
    /// Language tag unknown to the registry (or untagged block); never
    /// compiled, always counted so nothing is silently dropped.
    Unrecognized,
}

/// A diagnostic with its staleness classification attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedDiagnostic {
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
    pub class: FailureClass,
}

/// Per-snippet report entry, ordered by ordinal within its document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetOutcome {
    pub ordinal: usize,
    pub language: String,
    pub heading_path: Vec<String>,
    pub start_line: usize,
    pub status: SnippetStatus,
    /// True when a last-known-good cache hit replaced compilation.
    pub cached: bool,
    pub diagnostics: Vec<ClassifiedDiagnostic>,
    /// Reason for unverifiable/unrecognized statuses.
    pub note: Option<String>,
}

/// All outcomes for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    /// Extraction error message when the document ended inside a block.
    pub malformed: Option<String>,
    pub snippets: Vec<SnippetOutcome>,
}

/// Aggregate counts across the run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReportTotals {
    /// Snippets actually analyzed (passed + failed).
    pub checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub unverifiable: usize,
    pub unrecognized: usize,
    pub malformed_documents: usize,
}

impl ReportTotals {
    /// Every snippet found in the raw text, whatever its fate.
    pub fn total_snippets(&self) -> usize {
        self.checked + self.skipped + self.unverifiable + self.unrecognized
    }
}

/// The full validation report. Read-only once produced; the renderer only
/// formats it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub totals: ReportTotals,
    pub documents: Vec<DocumentReport>,
}

impl ValidationReport {
    /// Whether any unskipped snippet produced an error-severity diagnostic.
    pub fn has_failures(&self) -> bool {
        self.totals.failed > 0
    }
}

/// Assembles outcomes, unverifiable snippets and skipped snippets into one
/// report.
pub struct ReportBuilder<'a> {
    registry: &'a LanguageRegistry,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(registry: &'a LanguageRegistry) -> Self {
        Self { registry }
    }

    /// Build the report. `unverifiable` pairs a snippet with the reason its
    /// normalization failed; `outcomes` covers every unit that reached the
    /// runner (including cache hits).
    pub fn build(
        &self,
        extractions: &[DocumentExtraction],
        unverifiable: &[(CodeSnippet, String)],
        outcomes: &[UnitOutcome],
    ) -> ValidationReport {
        let classifier = Classifier::new(self.registry);

        let mut outcome_index: HashMap<(PathBuf, usize), &UnitOutcome> = HashMap::new();
        for outcome in outcomes {
            outcome_index.insert(
                (
                    outcome.unit.snippet.doc_path.clone(),
                    outcome.unit.snippet.ordinal,
                ),
                outcome,
            );
        }

        let mut unverifiable_index: HashMap<(PathBuf, usize), &str> = HashMap::new();
        for (snippet, reason) in unverifiable {
            unverifiable_index.insert(
                (snippet.doc_path.clone(), snippet.ordinal),
                reason.as_str(),
            );
        }

        let mut totals = ReportTotals::default();
        let mut documents = Vec::with_capacity(extractions.len());

        for extraction in extractions {
            let mut snippets = Vec::with_capacity(extraction.snippets.len());
            for snippet in &extraction.snippets {
                let entry = self.resolve(
                    &classifier,
                    snippet,
                    &outcome_index,
                    &unverifiable_index,
                    &mut totals,
                );
                snippets.push(entry);
            }

            if extraction.error.is_some() {
                totals.malformed_documents += 1;
            }

            documents.push(DocumentReport {
                path: extraction.doc_path.clone(),
                malformed: extraction.error.as_ref().map(|e| e.to_string()),
                snippets,
            });
        }

        documents.sort_by(|a, b| a.path.cmp(&b.path));

        debug!(
            "Report built: {} checked, {} failed, {} skipped",
            totals.checked, totals.failed, totals.skipped
        );
        ValidationReport { totals, documents }
    }

    fn resolve(
        &self,
        classifier: &Classifier<'_>,
        snippet: &CodeSnippet,
        outcomes: &HashMap<(PathBuf, usize), &UnitOutcome>,
        unverifiable: &HashMap<(PathBuf, usize), &str>,
        totals: &mut ReportTotals,
    ) -> SnippetOutcome {
        let key = (snippet.doc_path.clone(), snippet.ordinal);
        let base = SnippetOutcome {
            ordinal: snippet.ordinal,
            language: snippet.language.clone(),
            heading_path: snippet.heading_path.clone(),
            start_line: snippet.start_line,
            status: SnippetStatus::Passed,
            cached: false,
            diagnostics: Vec::new(),
            note: None,
        };

        if snippet.skip {
            totals.skipped += 1;
            return SnippetOutcome {
                status: SnippetStatus::Skipped,
                ..base
            };
        }

        if self.registry.get(&snippet.language).is_none() {
            totals.unrecognized += 1;
            let note = if snippet.language.is_empty() {
                "untagged code block".to_string()
            } else {
                format!("no language definition for tag '{}'", snippet.language)
            };
            return SnippetOutcome {
                status: SnippetStatus::Unrecognized,
                note: Some(note),
                ..base
            };
        }

        if let Some(reason) = unverifiable.get(&key) {
            totals.unverifiable += 1;
            return SnippetOutcome {
                status: SnippetStatus::Unverifiable,
                note: Some(reason.to_string()),
                ..base
            };
        }

        match outcomes.get(&key) {
            Some(outcome) => {
                totals.checked += 1;
                let diagnostics: Vec<ClassifiedDiagnostic> = outcome
                    .diagnostics
                    .iter()
                    .map(|d| ClassifiedDiagnostic {
                        diagnostic: d.clone(),
                        class: classifier.classify(&outcome.unit.language, d),
                    })
                    .collect();

                let status = if outcome.passed() {
                    totals.passed += 1;
                    SnippetStatus::Passed
                } else {
                    totals.failed += 1;
                    SnippetStatus::Failed
                };

                SnippetOutcome {
                    status,
                    cached: outcome.cached,
                    diagnostics,
                    ..base
                }
            }
            None => {
                // Extracted but never dispatched; treat as a tool failure so
                // the gap is visible rather than silently passing.
                totals.checked += 1;
                totals.failed += 1;
                SnippetOutcome {
                    status: SnippetStatus::Failed,
                    diagnostics: vec![ClassifiedDiagnostic {
                        diagnostic: Diagnostic::tool_failure("no analysis outcome recorded"),
                        class: FailureClass::ToolFailure,
                    }],
                    ..base
                }
            }
        }
    }
}
