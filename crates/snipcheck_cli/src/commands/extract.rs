//! Extract command - list snippets without compiling anything.
//!
//! Useful for auditing which blocks the extractor sees, and for checking
//! that skip directives and language tags land where the author intended.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use snipcheck_extract::{discover, DocumentSource, SnippetExtractor};

use crate::config::Config;
use crate::ExitCodes;

#[derive(Args)]
pub struct ExtractArgs {
    /// Documentation files, directories or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Path to snipcheck.toml (defaults to ./snipcheck.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit one JSON object per snippet instead of the table
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: ExtractArgs) -> Result<u8> {
    let config = Config::load(args.config.as_deref())?;
    let paths = discover(&args.inputs, &config.extensions)?;

    for path in &paths {
        let doc = DocumentSource::read(path)
            .with_context(|| format!("Failed to read document {:?}", path))?;
        let extraction = SnippetExtractor::extract(&doc);

        if !args.json {
            println!("{}", extraction.doc_path.display());
        }

        for snippet in &extraction.snippets {
            if args.json {
                let line = json!({
                    "doc": &snippet.doc_path,
                    "ordinal": snippet.ordinal,
                    "language": &snippet.language,
                    "heading": &snippet.heading_path,
                    "line": snippet.start_line,
                    "skip": snippet.skip,
                    "lines": snippet.line_count(),
                });
                println!("{}", line);
            } else {
                let language = if snippet.language.is_empty() {
                    "(untagged)"
                } else {
                    &snippet.language
                };
                let skip = if snippet.skip { " [skip]" } else { "" };
                println!(
                    "  #{} {} (line {}, {} lines) {}{}",
                    snippet.ordinal,
                    language,
                    snippet.start_line,
                    snippet.line_count(),
                    snippet.heading_display(),
                    skip
                );
            }
        }

        if let Some(error) = &extraction.error {
            eprintln!("  malformed: {}", error);
        }
    }

    Ok(ExitCodes::SUCCESS)
}
