//! Doctor command - probe analyzer toolchains.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use snipcheck_lang::LanguageRegistry;
use snipcheck_runner::{CommandToolchain, Toolchain};

use crate::ExitCodes;

#[derive(Args)]
pub struct DoctorArgs {
    /// YAML file with language definition overrides
    #[arg(long)]
    languages: Option<PathBuf>,
}

pub async fn execute(args: DoctorArgs) -> Result<u8> {
    let registry = match &args.languages {
        Some(path) => LanguageRegistry::load(path)
            .with_context(|| format!("Failed to load language overrides from {:?}", path))?,
        None => LanguageRegistry::builtin(),
    };

    let mut missing = 0usize;
    for spec in registry.languages() {
        let toolchain = CommandToolchain::new(spec.clone());
        match toolchain.version().await {
            Ok(version) => {
                println!("{}: {} available ({})", spec.name, spec.tool.command, version);
            }
            Err(_) => {
                missing += 1;
                println!("{}: {} NOT AVAILABLE", spec.name, spec.tool.command);
            }
        }
    }

    if missing > 0 {
        println!();
        println!(
            "{} toolchain(s) unavailable; snippets in those languages cannot be validated",
            missing
        );
        Ok(ExitCodes::INTERNAL_ERROR)
    } else {
        Ok(ExitCodes::SUCCESS)
    }
}
