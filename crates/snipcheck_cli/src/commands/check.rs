//! Check command - run the full validation pipeline.
//!
//! Extract → normalize → analyze → classify → render, in that order. The
//! only parallel stage is analysis; everything else is fast, single-threaded
//! work over in-memory documents.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use tracing::{info, warn};

use snipcheck_extract::{discover, CodeSnippet, DocumentExtraction, DocumentSource, SnippetExtractor};
use snipcheck_lang::LanguageRegistry;
use snipcheck_normalize::{NormalizedUnit, Normalizer};
use snipcheck_report::{Renderer, ReportBuilder, ReportFormat, SnippetCache, ValidationReport};
use snipcheck_runner::{RunConfig, Runner, UnitOutcome};

use crate::config::Config;
use crate::ExitCodes;

#[derive(Args)]
pub struct CheckArgs {
    /// Documentation files, directories or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Path to snipcheck.toml (defaults to ./snipcheck.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// YAML file with language definition overrides
    #[arg(long)]
    languages: Option<PathBuf>,

    /// Worker pool size (defaults to available CPU cores)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Per-snippet analyzer timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output format (text, json, github)
    #[arg(long, default_value = "text")]
    format: String,

    /// Reuse last-known-good results for unchanged snippets
    #[arg(long)]
    cache: bool,

    /// Treat unverifiable snippets and warnings as failures
    #[arg(long)]
    fail_on_warnings: bool,
}

pub async fn execute(args: CheckArgs) -> Result<u8> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(jobs) = args.jobs {
        config.jobs = Some(jobs);
    }
    if let Some(timeout) = args.timeout {
        config.timeout_seconds = timeout;
    }
    if args.cache {
        config.cache = true;
    }
    let languages_file = args.languages.clone().or(config.languages_file.clone());

    let registry = match &languages_file {
        Some(path) => LanguageRegistry::load(path)
            .with_context(|| format!("Failed to load language overrides from {:?}", path))?,
        None => LanguageRegistry::builtin(),
    };

    let format: ReportFormat = args
        .format
        .parse()
        .context("Invalid --format value")?;

    let mut run_config = RunConfig::default().timeout(config.timeout_seconds);
    if let Some(jobs) = config.jobs {
        run_config = run_config.jobs(jobs);
    }
    let runner = Runner::from_registry(&registry, run_config);

    let report = run_check(&args.inputs, &config, &registry, &runner).await?;

    let rendered = Renderer::render(&report, format)?;
    print!("{}", rendered);

    Ok(exit_code(&report, args.fail_on_warnings))
}

/// The pipeline proper, separated from argument handling so tests can
/// inject a mock toolchain through the runner.
pub(crate) async fn run_check(
    inputs: &[String],
    config: &Config,
    registry: &LanguageRegistry,
    runner: &Runner,
) -> Result<ValidationReport> {
    let paths = discover(inputs, &config.extensions)?;
    info!("Checking {} document(s)", paths.len());

    let mut extractions: Vec<DocumentExtraction> = Vec::with_capacity(paths.len());
    for path in &paths {
        let doc = DocumentSource::read(path)
            .with_context(|| format!("Failed to read document {:?}", path))?;
        extractions.push(SnippetExtractor::extract(&doc));
    }

    // Normalize every non-skipped snippet in a recognized language.
    let normalizer = Normalizer::new(registry);
    let mut units: Vec<NormalizedUnit> = Vec::new();
    let mut unverifiable: Vec<(CodeSnippet, String)> = Vec::new();

    for extraction in &extractions {
        for snippet in &extraction.snippets {
            if snippet.skip || registry.get(&snippet.language).is_none() {
                continue;
            }
            match normalizer.normalize(snippet) {
                Ok(unit) => units.push(unit),
                Err(e) if e.is_unverifiable() => {
                    warn!("{}", e);
                    unverifiable.push((snippet.clone(), e.to_string()));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    // Every needed toolchain must respond before anything is dispatched.
    let languages: BTreeSet<&str> = units.iter().map(|u| u.language.as_str()).collect();
    runner
        .ensure_available(languages.iter().copied())
        .await
        .context("Toolchain check failed")?;

    // Cache hits skip compilation entirely.
    let mut cache = config.cache.then(|| SnippetCache::load("."));
    let mut cached_outcomes: Vec<UnitOutcome> = Vec::new();
    let to_run: Vec<NormalizedUnit> = match &cache {
        Some(cache) => {
            let mut to_run = Vec::new();
            for unit in units {
                if cache.is_known_good(&unit) {
                    let now = Utc::now();
                    cached_outcomes.push(UnitOutcome {
                        unit,
                        diagnostics: Vec::new(),
                        started_at: now,
                        finished_at: now,
                        duration_ms: 0,
                        cached: true,
                    });
                } else {
                    to_run.push(unit);
                }
            }
            info!(
                "{} cache hit(s), {} unit(s) to analyze",
                cached_outcomes.len(),
                to_run.len()
            );
            to_run
        }
        None => units,
    };

    // An interrupt stops dispatching new units; whatever is in flight
    // finishes (or hits its timeout) and still lands in the report.
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => warn!("Interrupt received, finishing in-flight snippets"),
            Err(_) => std::future::pending().await,
        }
    };
    let mut outcomes = runner.run_all_until(to_run, interrupt).await?;

    if let Some(cache) = &mut cache {
        for outcome in &outcomes {
            if outcome.passed() {
                cache.record_pass(&outcome.unit);
            }
        }
        if let Err(e) = cache.save() {
            warn!("Failed to persist snippet cache: {}", e);
        }
    }
    outcomes.extend(cached_outcomes);

    Ok(ReportBuilder::new(registry).build(&extractions, &unverifiable, &outcomes))
}

fn exit_code(report: &ValidationReport, fail_on_warnings: bool) -> u8 {
    if report.has_failures() {
        return ExitCodes::SNIPPET_FAILURES;
    }
    if fail_on_warnings {
        let has_warnings = report.totals.unverifiable > 0
            || report.documents.iter().any(|d| {
                d.malformed.is_some()
                    || d.snippets
                        .iter()
                        .any(|s| s.diagnostics.iter().any(|diag| !diag.diagnostic.is_error()))
            });
        if has_warnings {
            return ExitCodes::SNIPPET_FAILURES;
        }
    }
    ExitCodes::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    use snipcheck_report::SnippetStatus;
    use snipcheck_runner::{Diagnostic, MockToolchain, Severity};

    fn write_doc(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    fn test_runner(mock: MockToolchain) -> Runner {
        let mut runner = Runner::new(RunConfig::default().jobs(2));
        runner.register(Arc::new(mock));
        runner
    }

    #[tokio::test]
    async fn test_skip_plus_clean_yields_exit_zero() {
        let temp = TempDir::new().unwrap();
        let input = write_doc(
            &temp,
            "guide.md",
            "# Guide\n\n<!-- skip -->\n```dart\npseudo code\n```\n\n```dart\nvoid main() {}\n```\n",
        );

        let runner = test_runner(MockToolchain::new("dart"));
        let report = run_check(&[input], &Config::default(), &LanguageRegistry::builtin(), &runner)
            .await
            .unwrap();

        assert_eq!(report.totals.skipped, 1);
        assert_eq!(report.totals.passed, 1);
        assert_eq!(report.totals.failed, 0);
        assert_eq!(exit_code(&report, false), ExitCodes::SUCCESS);
    }

    #[tokio::test]
    async fn test_stale_snippet_yields_unresolved_api_and_exit_one() {
        let temp = TempDir::new().unwrap();
        let input = write_doc(
            &temp,
            "guide.md",
            "# Guide\n\n```dart\nvoid main() { removedApi(); }\n```\n",
        );

        let mock = MockToolchain::new("dart").respond_with(
            "removedApi",
            vec![Diagnostic::compile(
                Severity::Error,
                "Undefined name 'removedApi'.",
                Some(1),
                Some(3),
            )],
        );
        let runner = test_runner(mock);
        let report = run_check(&[input], &Config::default(), &LanguageRegistry::builtin(), &runner)
            .await
            .unwrap();

        assert_eq!(report.totals.failed, 1);
        let entry = &report.documents[0].snippets[0];
        assert_eq!(entry.diagnostics.len(), 1);
        assert_eq!(
            entry.diagnostics[0].class,
            snipcheck_report::FailureClass::UnresolvedApi
        );
        assert_eq!(exit_code(&report, false), ExitCodes::SNIPPET_FAILURES);
    }

    #[tokio::test]
    async fn test_malformed_document_does_not_block_others() {
        let temp = TempDir::new().unwrap();
        let bad = write_doc(&temp, "a_bad.md", "```dart\nnever closed\n");
        let good = write_doc(&temp, "b_good.md", "```dart\nvoid main() {}\n```\n");

        let runner = test_runner(MockToolchain::new("dart"));
        let report = run_check(
            &[bad, good],
            &Config::default(),
            &LanguageRegistry::builtin(),
            &runner,
        )
        .await
        .unwrap();

        assert_eq!(report.totals.malformed_documents, 1);
        assert_eq!(report.totals.passed, 1);
        assert!(report.documents[0].malformed.is_some());
        assert!(report.documents[1].malformed.is_none());
    }

    #[tokio::test]
    async fn test_skipped_snippets_never_reach_the_runner() {
        let temp = TempDir::new().unwrap();
        let input = write_doc(
            &temp,
            "guide.md",
            "<!-- skip -->\n```dart\nskipped\n```\n\n```dart\nvoid main() {}\n```\n",
        );

        let mock = MockToolchain::new("dart");
        let calls = mock.clone();
        let runner = test_runner(mock);
        run_check(&[input], &Config::default(), &LanguageRegistry::builtin(), &runner)
            .await
            .unwrap();

        assert_eq!(calls.captured_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_language_is_reported_not_dropped() {
        let temp = TempDir::new().unwrap();
        let input = write_doc(&temp, "guide.md", "```xml\n<LinearLayout/>\n```\n");

        let runner = test_runner(MockToolchain::new("dart"));
        let report = run_check(&[input], &Config::default(), &LanguageRegistry::builtin(), &runner)
            .await
            .unwrap();

        assert_eq!(report.totals.unrecognized, 1);
        assert_eq!(
            report.documents[0].snippets[0].status,
            SnippetStatus::Unrecognized
        );
        assert_eq!(exit_code(&report, false), ExitCodes::SUCCESS);
    }

    #[tokio::test]
    async fn test_ambiguous_fragment_reported_unverifiable() {
        let temp = TempDir::new().unwrap();
        let input = write_doc(&temp, "guide.md", "```dart\nvar main = 1;\n```\n");

        let runner = test_runner(MockToolchain::new("dart"));
        let report = run_check(&[input], &Config::default(), &LanguageRegistry::builtin(), &runner)
            .await
            .unwrap();

        assert_eq!(report.totals.unverifiable, 1);
        assert_eq!(exit_code(&report, false), ExitCodes::SUCCESS);
        assert_eq!(exit_code(&report, true), ExitCodes::SNIPPET_FAILURES);
    }

    #[tokio::test]
    async fn test_missing_toolchain_is_fatal() {
        let temp = TempDir::new().unwrap();
        let input = write_doc(&temp, "guide.md", "```dart\nvoid main() {}\n```\n");

        let mock = MockToolchain::new("dart").set_available(false);
        let runner = test_runner(mock);
        let result = run_check(
            &[input],
            &Config::default(),
            &LanguageRegistry::builtin(),
            &runner,
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_report_is_deterministic_across_runs() {
        let temp = TempDir::new().unwrap();
        let input = write_doc(
            &temp,
            "guide.md",
            "# A\n```dart\nvoid main() {}\n```\n# B\n```dart\nvar x = 1;\n```\n",
        );

        let runner = test_runner(MockToolchain::new("dart"));
        let config = Config::default();
        let registry = LanguageRegistry::builtin();

        let first = run_check(&[input.clone()], &config, &registry, &runner)
            .await
            .unwrap();
        let second = run_check(&[input], &config, &registry, &runner).await.unwrap();

        let a = Renderer::render(&first, ReportFormat::Text).unwrap();
        let b = Renderer::render(&second, ReportFormat::Text).unwrap();
        assert_eq!(a, b);
    }
}
