//! Parallel unit dispatch.
//!
//! Units are independent, so they are fanned out over a worker pool bounded
//! by a semaphore. The only shared mutable state is the results collector;
//! outcomes are re-sorted by (document path, ordinal) before being returned
//! so completion order never leaks into the report.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use snipcheck_lang::LanguageRegistry;
use snipcheck_normalize::NormalizedUnit;

use crate::command::CommandToolchain;
use crate::diagnostic::{Diagnostic, UnitOutcome};
use crate::error::{RunnerError, RunnerResult};
use crate::toolchain::{RunConfig, Toolchain};

/// Dispatches normalized units across per-language toolchains.
pub struct Runner {
    toolchains: HashMap<String, Arc<dyn Toolchain>>,
    config: RunConfig,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self {
            toolchains: HashMap::new(),
            config,
        }
    }

    /// Runner with a command toolchain for every registry language.
    pub fn from_registry(registry: &LanguageRegistry, config: RunConfig) -> Self {
        let mut runner = Self::new(config);
        for spec in registry.languages() {
            runner.register(Arc::new(CommandToolchain::new(spec.clone())));
        }
        runner
    }

    pub fn register(&mut self, toolchain: Arc<dyn Toolchain>) {
        self.toolchains
            .insert(toolchain.language().to_string(), toolchain);
    }

    /// Verify every needed toolchain exists and responds, before any unit
    /// is dispatched. A missing toolchain is fatal to the run: no snippet
    /// in that language could ever be validated.
    pub async fn ensure_available<'a>(
        &self,
        languages: impl IntoIterator<Item = &'a str>,
    ) -> RunnerResult<()> {
        for language in languages {
            let toolchain =
                self.toolchains
                    .get(language)
                    .ok_or_else(|| RunnerError::ToolchainNotFound {
                        language: language.to_string(),
                    })?;
            if !toolchain.is_available().await {
                return Err(RunnerError::ToolchainUnavailable {
                    language: language.to_string(),
                    command: toolchain.command().to_string(),
                });
            }
            debug!("Toolchain for '{}' is available", language);
        }
        Ok(())
    }

    /// Analyze all units, bounded by the configured worker count. Outcomes
    /// come back in deterministic (document, ordinal) order.
    pub async fn run_all(&self, units: Vec<NormalizedUnit>) -> RunnerResult<Vec<UnitOutcome>> {
        self.run_all_until(units, std::future::pending()).await
    }

    /// Like `run_all`, but stops dispatching new units once `shutdown`
    /// completes. In-flight analyses finish (or hit their timeout) and
    /// their outcomes are kept; units that never started produce none.
    pub async fn run_all_until<F>(
        &self,
        units: Vec<NormalizedUnit>,
        shutdown: F,
    ) -> RunnerResult<Vec<UnitOutcome>>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Dispatching {} unit(s) across {} worker(s)",
            units.len(),
            self.config.worker_count()
        );

        // Resolve toolchains up front so a missing one fails before any
        // subprocess is spawned.
        let mut work = Vec::with_capacity(units.len());
        for unit in units {
            let toolchain = self
                .toolchains
                .get(&unit.language)
                .cloned()
                .ok_or_else(|| RunnerError::ToolchainNotFound {
                    language: unit.language.clone(),
                })?;
            work.push((unit, toolchain));
        }

        let semaphore = Arc::new(Semaphore::new(self.config.worker_count()));
        let collector: Arc<Mutex<Vec<UnitOutcome>>> = Arc::new(Mutex::new(Vec::new()));
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut tasks = JoinSet::new();

        for (unit, toolchain) in work {
            let semaphore = Arc::clone(&semaphore);
            let collector = Arc::clone(&collector);
            let cancelled = Arc::clone(&cancelled);
            let config = self.config.clone();

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                if cancelled.load(Ordering::Relaxed) {
                    debug!("Skipping {} after cancellation", unit.snippet.id());
                    return;
                }

                let started_at = Utc::now();
                let diagnostics = match toolchain.analyze(&unit, &config).await {
                    Ok(diagnostics) => diagnostics,
                    Err(e) => {
                        warn!("Analysis of {} failed: {}", unit.snippet.id(), e);
                        vec![Diagnostic::tool_failure(e.to_string())]
                    }
                };
                let finished_at = Utc::now();
                let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;

                collector.lock().push(UnitOutcome {
                    unit,
                    diagnostics,
                    started_at,
                    finished_at,
                    duration_ms,
                    cached: false,
                });
            });
        }

        tokio::pin!(shutdown);
        let mut armed = true;
        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    Some(joined) => {
                        joined.map_err(|e| RunnerError::TaskPanicked(e.to_string()))?;
                    }
                    None => break,
                },
                _ = &mut shutdown, if armed => {
                    warn!("Cancellation requested, draining in-flight units");
                    cancelled.store(true, Ordering::Relaxed);
                    armed = false;
                }
            }
        }

        let mut outcomes = std::mem::take(&mut *collector.lock());
        outcomes.sort_by(|a, b| {
            (&a.unit.snippet.doc_path, a.unit.snippet.ordinal)
                .cmp(&(&b.unit.snippet.doc_path, b.unit.snippet.ordinal))
        });
        Ok(outcomes)
    }
}
