//! Language definition model.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LangError, LangResult};

/// Placeholder in analyzer arguments replaced with the unit's file path.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Wrapper template used to turn a bare fragment into a compilable unit.
///
/// The wrapper is inert: it only prepends prelude imports and an entry-point
/// opening line, and appends a closing line. The snippet body is inserted
/// verbatim so diagnostics map back by a fixed line offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrapperTemplate {
    /// Import lines prepended before the entry point.
    #[serde(default)]
    pub prelude: Vec<String>,
    /// Line opening the synthesized entry point.
    pub entry_open: String,
    /// Line closing the synthesized entry point.
    pub entry_close: String,
}

impl WrapperTemplate {
    /// Number of lines inserted before the snippet body.
    pub fn leading_lines(&self) -> usize {
        self.prelude.len() + 1
    }
}

/// External analyzer invocation for a language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Executable name, resolved via PATH.
    pub command: String,
    /// Arguments; `{file}` is replaced with the unit's file path.
    pub args: Vec<String>,
    /// Regex with named captures `severity`, `line`, `message` applied to
    /// each output line.
    pub diagnostic_pattern: String,
}

impl ToolSpec {
    /// Build the concrete argument list for a unit file.
    pub fn args_for(&self, file: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.replace(FILE_PLACEHOLDER, file))
            .collect()
    }
}

/// Patterns used to tell API staleness apart from transcription errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifyPatterns {
    /// Diagnostic messages indicating a symbol missing from the current
    /// framework version.
    #[serde(default)]
    pub unresolved: Vec<String>,
    /// Diagnostic messages indicating deprecated-but-present usage.
    #[serde(default)]
    pub deprecated: Vec<String>,
}

/// Complete definition of one validated language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSpec {
    /// Canonical name, also the primary fence tag.
    pub name: String,
    /// Additional fence tags mapping to this language.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// File extension for normalized units.
    pub extension: String,
    /// Regex detecting a complete compilable unit (has its own entry point).
    pub entry_point_pattern: String,
    /// Identifiers introduced by the wrapper; a snippet declaring one of
    /// these cannot be wrapped unambiguously.
    #[serde(default)]
    pub reserved_identifiers: Vec<String>,
    pub template: WrapperTemplate,
    pub tool: ToolSpec,
    #[serde(default)]
    pub classify: ClassifyPatterns,
}

impl LanguageSpec {
    /// Whether a fence tag refers to this language.
    pub fn matches_tag(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(tag))
    }

    pub fn entry_point_regex(&self) -> LangResult<Regex> {
        self.compile(&self.entry_point_pattern)
    }

    pub fn diagnostic_regex(&self) -> LangResult<Regex> {
        self.compile(&self.tool.diagnostic_pattern)
    }

    fn compile(&self, pattern: &str) -> LangResult<Regex> {
        Regex::new(pattern).map_err(|e| LangError::InvalidPattern {
            language: self.name.clone(),
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LanguageRegistry;

    #[test]
    fn test_matches_tag_is_case_insensitive() {
        let registry = LanguageRegistry::builtin();
        let dart = registry.get("dart").unwrap();
        assert!(dart.matches_tag("Dart"));
        assert!(dart.matches_tag("dartpad"));
        assert!(!dart.matches_tag("kotlin"));
    }

    #[test]
    fn test_args_for_substitutes_placeholder() {
        let registry = LanguageRegistry::builtin();
        let dart = registry.get("dart").unwrap();
        let args = dart.tool.args_for("/tmp/unit.dart");
        assert!(args.iter().any(|a| a == "/tmp/unit.dart"));
        assert!(args.iter().all(|a| !a.contains(FILE_PLACEHOLDER)));
    }

    #[test]
    fn test_invalid_pattern_reports_language() {
        let registry = LanguageRegistry::builtin();
        let mut dart = registry.get("dart").unwrap().clone();
        dart.entry_point_pattern = "(".to_string();
        let err = dart.entry_point_regex().unwrap_err();
        assert!(err.to_string().contains("dart"));
    }
}
