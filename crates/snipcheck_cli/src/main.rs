//! snipcheck CLI - Main entry point.
//!
//! Exit codes:
//! - 0: No unskipped snippet produced an error-severity diagnostic
//! - 1: At least one snippet failed validation
//! - 2: Internal failure unrelated to any snippet (missing toolchain,
//!      bad configuration, no inputs)

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const SNIPPET_FAILURES: u8 = 1;
    pub const INTERNAL_ERROR: u8 = 2;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "snipcheck=debug"
    } else if cli.quiet {
        "snipcheck=error"
    } else {
        "snipcheck=info"
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive(default_directive.parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .try_init();

    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args).await,
        Commands::Extract(args) => commands::extract::execute(args).await,
        Commands::Doctor(args) => commands::doctor::execute(args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(ExitCodes::INTERNAL_ERROR)
        }
    }
}
