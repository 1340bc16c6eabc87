//! # snipcheck_runner
//!
//! Executes external compilers/analyzers against normalized units.
//!
//! Each unit is analyzed in isolation: its own scratch directory, its own
//! subprocess, its own bounded timeout. Units are embarrassingly parallel,
//! so the [`Runner`] fans them out over a semaphore-bounded worker pool and
//! re-sorts the collected outcomes into (document, ordinal) order.
//!
//! Analyzer crashes and timeouts surface as tool-failure [`Diagnostic`]s on
//! the affected unit; only a missing toolchain for a declared language is
//! fatal to the run.

pub mod command;
pub mod diagnostic;
pub mod dispatch;
pub mod error;
pub mod mock;
pub mod toolchain;

pub use command::CommandToolchain;
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity, UnitOutcome};
pub use dispatch::Runner;
pub use error::{RunnerError, RunnerResult};
pub use mock::MockToolchain;
pub use toolchain::{RunConfig, Toolchain};
