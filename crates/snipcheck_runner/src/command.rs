//! Subprocess-backed toolchain.
//!
//! Each unit is written to its own scratch directory and analyzed by the
//! language's external tool with a bounded timeout. The child process is
//! spawned with `kill_on_drop` so a timed-out or abandoned invocation never
//! outlives the run.

use std::fs;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use snipcheck_lang::LanguageSpec;
use snipcheck_normalize::NormalizedUnit;

use crate::diagnostic::{Diagnostic, Severity};
use crate::error::{RunnerError, RunnerResult};
use crate::toolchain::{RunConfig, Toolchain};

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Toolchain that shells out to the analyzer named in the language spec.
pub struct CommandToolchain {
    spec: LanguageSpec,
}

impl CommandToolchain {
    pub fn new(spec: LanguageSpec) -> Self {
        Self { spec }
    }

    /// Parse analyzer output into diagnostics, remapping lines through the
    /// unit's wrapper offset.
    fn parse_diagnostics(
        &self,
        unit: &NormalizedUnit,
        output: &str,
    ) -> RunnerResult<Vec<Diagnostic>> {
        let re = self.spec.diagnostic_regex()?;
        let mut diagnostics = Vec::new();

        for line in output.lines() {
            let Some(caps) = re.captures(line) else {
                continue;
            };

            let severity = match caps.name("severity").map(|m| m.as_str()) {
                Some(s) if s.eq_ignore_ascii_case("error") => Severity::Error,
                Some(_) => Severity::Warning,
                None => Severity::Error,
            };
            let unit_line = caps
                .name("line")
                .and_then(|m| m.as_str().parse::<usize>().ok());
            let message = caps
                .name("message")
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(|| line.trim().to_string());

            let snippet_line = unit_line.map(|l| unit.map_line(l));
            let document_line = unit_line.map(|l| unit.document_line(l));

            diagnostics.push(Diagnostic::compile(
                severity,
                message,
                snippet_line,
                document_line,
            ));
        }

        Ok(diagnostics)
    }

    async fn probe(&self) -> Option<String> {
        let result = timeout(
            PROBE_TIMEOUT,
            Command::new(&self.spec.tool.command)
                .arg("--version")
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match result {
            Ok(Ok(output)) if output.status.success() => {
                let text = String::from_utf8_lossy(&output.stdout);
                let line = text
                    .lines()
                    .next()
                    .unwrap_or("unknown version")
                    .trim()
                    .to_string();
                Some(line)
            }
            _ => None,
        }
    }
}

#[async_trait]
impl Toolchain for CommandToolchain {
    fn language(&self) -> &str {
        &self.spec.name
    }

    fn command(&self) -> &str {
        &self.spec.tool.command
    }

    async fn is_available(&self) -> bool {
        self.probe().await.is_some()
    }

    async fn version(&self) -> RunnerResult<String> {
        self.probe()
            .await
            .ok_or_else(|| RunnerError::ToolchainUnavailable {
                language: self.spec.name.clone(),
                command: self.spec.tool.command.clone(),
            })
    }

    async fn analyze(
        &self,
        unit: &NormalizedUnit,
        config: &RunConfig,
    ) -> RunnerResult<Vec<Diagnostic>> {
        let scratch = tempfile::TempDir::new()?;
        let file_path = scratch.path().join(unit.file_name());
        fs::write(&file_path, &unit.source)?;

        let file = file_path.to_string_lossy().to_string();
        let args = self.spec.tool.args_for(&file);
        debug!(
            "Analyzing {} with {} {:?}",
            unit.snippet.id(),
            self.spec.tool.command,
            args
        );

        let result = timeout(
            Duration::from_secs(config.timeout_seconds),
            Command::new(&self.spec.tool.command)
                .args(&args)
                .current_dir(scratch.path())
                .kill_on_drop(true)
                .output(),
        )
        .await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("Analyzer '{}' failed to start: {}", self.spec.tool.command, e);
                return Ok(vec![Diagnostic::tool_failure(format!(
                    "analyzer '{}' failed to start: {}",
                    self.spec.tool.command, e
                ))]);
            }
            Err(_) => {
                warn!(
                    "Analyzer '{}' timed out on {} after {}s",
                    self.spec.tool.command,
                    unit.snippet.id(),
                    config.timeout_seconds
                );
                return Ok(vec![Diagnostic::tool_failure(format!(
                    "analyzer '{}' timed out after {}s",
                    self.spec.tool.command, config.timeout_seconds
                ))]);
            }
        };

        let combined = format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let diagnostics = self.parse_diagnostics(unit, &combined)?;

        // Non-zero exit with nothing parseable means the tool itself broke.
        if !output.status.success() && diagnostics.is_empty() {
            let detail: String = combined.trim().chars().take(400).collect();
            return Ok(vec![Diagnostic::tool_failure(format!(
                "analyzer exited with {} and no parseable diagnostics: {}",
                output.status, detail
            ))]);
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use snipcheck_extract::CodeSnippet;
    use snipcheck_lang::LanguageRegistry;

    fn dart_unit(offset: usize, body: &str, source: &str) -> NormalizedUnit {
        NormalizedUnit {
            snippet: CodeSnippet {
                doc_path: PathBuf::from("guide.md"),
                language: "dart".to_string(),
                text: body.to_string(),
                heading_path: Vec::new(),
                skip: false,
                ordinal: 1,
                start_line: 20,
            },
            language: "dart".to_string(),
            extension: "dart".to_string(),
            source: source.to_string(),
            line_offset: offset,
        }
    }

    #[test]
    fn test_parse_diagnostics_remaps_lines() {
        let registry = LanguageRegistry::builtin();
        let tc = CommandToolchain::new(registry.get("dart").unwrap().clone());
        // body starts on wrapped line 4 (offset 3)
        let unit = dart_unit(3, "var a;\nvar b = boom;", "…");

        let output =
            "ERROR|COMPILE_TIME_ERROR|UNDEFINED_IDENTIFIER|/tmp/u.dart|5|9|4|Undefined name 'boom'.";
        let diags = tc.parse_diagnostics(&unit, output).unwrap();

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].snippet_line, Some(2));
        assert_eq!(diags[0].document_line, Some(21));
    }

    #[test]
    fn test_parse_diagnostics_ignores_noise_lines() {
        let registry = LanguageRegistry::builtin();
        let tc = CommandToolchain::new(registry.get("dart").unwrap().clone());
        let unit = dart_unit(0, "void main() {}", "void main() {}");

        let output = "Analyzing u.dart...\nNo issues found!";
        let diags = tc.parse_diagnostics(&unit, output).unwrap();
        assert!(diags.is_empty());
    }

    #[test]
    fn test_info_severity_maps_to_warning() {
        let registry = LanguageRegistry::builtin();
        let tc = CommandToolchain::new(registry.get("dart").unwrap().clone());
        let unit = dart_unit(0, "void main() {}", "void main() {}");

        let output = "INFO|HINT|UNUSED_LOCAL_VARIABLE|/tmp/u.dart|1|1|1|Unused variable.";
        let diags = tc.parse_diagnostics(&unit, output).unwrap();
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_missing_analyzer_is_tool_failure_not_error() {
        let registry = LanguageRegistry::builtin();
        let mut spec = registry.get("dart").unwrap().clone();
        spec.tool.command = "definitely-not-a-real-analyzer".to_string();
        let tc = CommandToolchain::new(spec);
        let unit = dart_unit(0, "void main() {}", "void main() {}");

        let diags = tc.analyze(&unit, &RunConfig::default()).await.unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, crate::diagnostic::DiagnosticKind::ToolFailure);
    }

    #[tokio::test]
    async fn test_missing_analyzer_is_unavailable() {
        let registry = LanguageRegistry::builtin();
        let mut spec = registry.get("dart").unwrap().clone();
        spec.tool.command = "definitely-not-a-real-analyzer".to_string();
        let tc = CommandToolchain::new(spec);

        assert!(!tc.is_available().await);
        assert!(tc.version().await.is_err());
    }
}
