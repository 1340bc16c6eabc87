//! # snipcheck_extract
//!
//! Document discovery and code snippet extraction for snipcheck.
//!
//! A documentation guide embeds example code in delimited blocks. This crate
//! finds documentation files, reads them once into immutable
//! [`DocumentSource`] values, and extracts every delimited block as a
//! [`CodeSnippet`] tagged with its language, enclosing heading path, ordinal
//! position and skip flag.
//!
//! Extraction recovers from malformed documents: an unterminated block
//! produces a [`ExtractError::MalformedBlock`] for that document while other
//! documents extract normally.

pub mod document;
pub mod error;
pub mod extractor;
pub mod snippet;

pub use document::{discover, DocumentSource, DEFAULT_EXTENSIONS};
pub use error::{ExtractError, ExtractResult};
pub use extractor::{DocumentExtraction, SnippetExtractor, Snippets};
pub use snippet::CodeSnippet;
