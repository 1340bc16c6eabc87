//! CLI command definitions.
//!
//! Each subcommand maps to one stage of the validation pipeline: `extract`
//! stops after extraction, `doctor` probes toolchains, and `check` runs the
//! whole thing.

use clap::{Parser, Subcommand};

pub mod check;
pub mod doctor;
pub mod extract;

/// snipcheck - documentation example validator
#[derive(Parser)]
#[command(name = "snipcheck")]
#[command(version, about = "snipcheck - validates code examples embedded in documentation")]
#[command(long_about = r#"
snipcheck extracts every embedded code sample from a documentation guide,
compiles each one in isolation against the current framework toolchain, and
reports which examples have gone stale.

COMMANDS:
  check    → Extract, normalize, analyze and report on every snippet
  extract  → List extracted snippets without compiling anything
  doctor   → Probe the configured analyzer toolchains

EXIT CODES:
  0 - No unskipped snippet produced an error
  1 - At least one snippet failed validation
  2 - Internal failure (missing toolchain, bad configuration)
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate every snippet in the given documents
    Check(check::CheckArgs),

    /// List extracted snippets without compiling
    Extract(extract::ExtractArgs),

    /// Probe analyzer toolchains for availability
    Doctor(doctor::DoctorArgs),
}
