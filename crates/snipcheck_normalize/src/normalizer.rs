//! Snippet normalization.
//!
//! A snippet is either a complete compilable unit (it carries its own entry
//! point) or a bare fragment. Fragments are wrapped with the language's
//! template; a pre-scan of the snippet's declared identifiers guards
//! against the wrapper shadowing a name the snippet defines itself.

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use snipcheck_extract::CodeSnippet;
use snipcheck_lang::{LanguageRegistry, LanguageSpec};

use crate::error::{NormalizeError, NormalizeResult};
use crate::unit::NormalizedUnit;

/// Declaration forms across the guide languages: type/class declarations,
/// `var`/`final` bindings, and `ReturnType name(` function signatures.
const DECLARATION_PATTERNS: &[&str] = &[
    r"(?m)^\s*(?:(?:public|private|protected|static|final|abstract|const|sealed)\s+)*(?:class|enum|interface|mixin|object)\s+([A-Za-z_][A-Za-z0-9_]*)",
    r"(?m)^\s*(?:var|final|const|val|let)\s+([A-Za-z_][A-Za-z0-9_]*)",
    r"(?m)^\s*(?:fun|void)\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(",
    r"(?m)^\s*[A-Z][A-Za-z0-9_<>, ]*\s+([a-z][A-Za-z0-9_]*)\s*\(",
];

/// Normalizer over a language registry.
pub struct Normalizer<'a> {
    registry: &'a LanguageRegistry,
}

impl<'a> Normalizer<'a> {
    pub fn new(registry: &'a LanguageRegistry) -> Self {
        Self { registry }
    }

    /// Produce the compilable unit for a non-skipped snippet.
    pub fn normalize(&self, snippet: &CodeSnippet) -> NormalizeResult<NormalizedUnit> {
        let spec = self.registry.require(&snippet.language)?;

        if spec.entry_point_regex()?.is_match(&snippet.text) {
            debug!("Snippet {} is a complete unit", snippet.id());
            return Ok(self.pass_through(snippet, spec));
        }

        self.check_collisions(snippet, spec)?;

        let mut source = String::new();
        for line in &spec.template.prelude {
            source.push_str(line);
            source.push('\n');
        }
        source.push_str(&spec.template.entry_open);
        source.push('\n');
        source.push_str(&snippet.text);
        if !snippet.text.ends_with('\n') {
            source.push('\n');
        }
        source.push_str(&spec.template.entry_close);
        source.push('\n');

        debug!("Wrapped fragment {}", snippet.id());
        Ok(NormalizedUnit {
            snippet: snippet.clone(),
            language: spec.name.clone(),
            extension: spec.extension.clone(),
            source,
            line_offset: spec.template.leading_lines(),
        })
    }

    fn pass_through(&self, snippet: &CodeSnippet, spec: &LanguageSpec) -> NormalizedUnit {
        NormalizedUnit {
            snippet: snippet.clone(),
            language: spec.name.clone(),
            extension: spec.extension.clone(),
            source: snippet.text.clone(),
            line_offset: 0,
        }
    }

    /// Fail when the snippet declares an identifier the wrapper introduces.
    fn check_collisions(
        &self,
        snippet: &CodeSnippet,
        spec: &LanguageSpec,
    ) -> NormalizeResult<()> {
        if spec.reserved_identifiers.is_empty() {
            return Ok(());
        }

        let declared = declared_identifiers(&snippet.text);
        for reserved in &spec.reserved_identifiers {
            if declared.contains(reserved.as_str()) {
                return Err(NormalizeError::AmbiguousFragment {
                    snippet: snippet.id(),
                    identifier: reserved.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Identifiers the snippet itself declares at the top level of its text.
fn declared_identifiers(text: &str) -> HashSet<String> {
    let mut names = HashSet::new();
    for pattern in DECLARATION_PATTERNS {
        if let Ok(re) = Regex::new(pattern) {
            for caps in re.captures_iter(text) {
                if let Some(name) = caps.get(1) {
                    names.insert(name.as_str().to_string());
                }
            }
        }
    }
    names
}
