//! # snipcheck_lang
//!
//! Per-language definitions for snipcheck: fence tag aliases, wrapper
//! templates for bare fragments, external analyzer invocations, diagnostic
//! parsing patterns, and the staleness classification allow-lists.
//!
//! Built-in definitions cover dart, java and kotlin; a YAML file passed to
//! [`LanguageRegistry::load`] replaces or extends them.

pub mod error;
pub mod registry;
pub mod spec;

pub use error::{LangError, LangResult};
pub use registry::LanguageRegistry;
pub use spec::{ClassifyPatterns, LanguageSpec, ToolSpec, WrapperTemplate, FILE_PLACEHOLDER};
