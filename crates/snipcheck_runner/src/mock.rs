//! Mock toolchain for testing.
//!
//! Returns scripted diagnostics keyed by substrings of the unit source and
//! captures every call, so pipeline tests run without any real analyzer
//! installed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use snipcheck_normalize::NormalizedUnit;

use crate::diagnostic::Diagnostic;
use crate::error::{RunnerError, RunnerResult};
use crate::toolchain::{RunConfig, Toolchain};

/// Configurable mock implementation of [`Toolchain`].
#[derive(Clone)]
pub struct MockToolchain {
    language: String,
    available: bool,
    /// (source substring, scripted diagnostics); first match wins.
    responses: Arc<RwLock<Vec<(String, Vec<Diagnostic>)>>>,
    /// Per-ordinal delays in milliseconds, for exercising completion order.
    ordinal_delays: Arc<RwLock<Vec<u64>>>,
    /// Error message to return from every analyze call.
    failure: Option<String>,
    /// Unit ids captured for verification.
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockToolchain {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            available: true,
            responses: Arc::new(RwLock::new(Vec::new())),
            ordinal_delays: Arc::new(RwLock::new(Vec::new())),
            failure: None,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn set_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Script diagnostics for any unit whose source contains `needle`.
    /// Units matching no script analyze cleanly.
    pub fn respond_with(self, needle: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        self.responses.write().push((needle.into(), diagnostics));
        self
    }

    /// Delay the analysis of unit ordinal N by `delays[N-1]` milliseconds.
    pub fn with_ordinal_delays(self, delays: &[u64]) -> Self {
        *self.ordinal_delays.write() = delays.to_vec();
        self
    }

    /// Make every analyze call return an infrastructure error.
    pub fn fail_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Unit ids analyzed so far, in call order.
    pub fn captured_calls(&self) -> Vec<String> {
        self.calls.read().clone()
    }
}

#[async_trait]
impl Toolchain for MockToolchain {
    fn language(&self) -> &str {
        &self.language
    }

    fn command(&self) -> &str {
        "mock-analyzer"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn version(&self) -> RunnerResult<String> {
        if self.available {
            Ok("mock-analyzer 1.0.0".to_string())
        } else {
            Err(RunnerError::ToolchainUnavailable {
                language: self.language.clone(),
                command: "mock-analyzer".to_string(),
            })
        }
    }

    async fn analyze(
        &self,
        unit: &NormalizedUnit,
        _config: &RunConfig,
    ) -> RunnerResult<Vec<Diagnostic>> {
        self.calls.write().push(unit.snippet.id());

        if let Some(message) = &self.failure {
            return Err(RunnerError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                message.clone(),
            )));
        }

        let delay = self
            .ordinal_delays
            .read()
            .get(unit.snippet.ordinal.saturating_sub(1))
            .copied();
        if let Some(ms) = delay {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        let responses = self.responses.read();
        let diagnostics = responses
            .iter()
            .find(|(needle, _)| unit.source.contains(needle))
            .map(|(_, diags)| diags.clone())
            .unwrap_or_default();
        Ok(diagnostics)
    }
}
