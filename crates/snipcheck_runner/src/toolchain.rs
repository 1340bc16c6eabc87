//! Toolchain trait and run configuration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use snipcheck_normalize::NormalizedUnit;

use crate::diagnostic::Diagnostic;
use crate::error::RunnerResult;

/// Run configuration with timeouts and concurrency limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Per-unit analyzer timeout in seconds.
    pub timeout_seconds: u64,
    /// Worker pool size; `None` uses available parallelism.
    pub jobs: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            jobs: None,
        }
    }
}

impl RunConfig {
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Effective worker count.
    pub fn worker_count(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// An external compiler/analyzer for one language.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Canonical language name this toolchain analyzes.
    fn language(&self) -> &str;

    /// Executable name, for error messages and doctor output.
    fn command(&self) -> &str;

    /// Whether the underlying tool can be invoked on this system.
    async fn is_available(&self) -> bool;

    /// Tool version string, for `doctor` output.
    async fn version(&self) -> RunnerResult<String>;

    /// Analyze one unit in isolation. Analyzer crashes and timeouts are
    /// returned as tool-failure diagnostics, not as `Err`.
    async fn analyze(
        &self,
        unit: &NormalizedUnit,
        config: &RunConfig,
    ) -> RunnerResult<Vec<Diagnostic>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_count_prefers_explicit_jobs() {
        let config = RunConfig::default().jobs(3);
        assert_eq!(config.worker_count(), 3);
    }

    #[test]
    fn test_worker_count_default_is_positive() {
        assert!(RunConfig::default().worker_count() >= 1);
    }
}
