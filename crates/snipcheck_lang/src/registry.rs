//! Built-in language definitions and YAML overrides.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{LangError, LangResult};
use crate::spec::{ClassifyPatterns, LanguageSpec, ToolSpec, WrapperTemplate};

/// Registry of known languages. Built-ins cover the languages the guides
/// actually use; a YAML file can replace or extend them.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    specs: Vec<LanguageSpec>,
}

impl LanguageRegistry {
    /// Registry with the built-in dart, java and kotlin definitions.
    pub fn builtin() -> Self {
        Self {
            specs: vec![dart(), java(), kotlin()],
        }
    }

    /// Built-ins merged with overrides from a YAML file. An override with
    /// the same name replaces the built-in; a new name is appended.
    pub fn load(path: impl AsRef<Path>) -> LangResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LangError::OverridesNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let overrides: Vec<LanguageSpec> = serde_yaml::from_str(&content)?;

        let mut registry = Self::builtin();
        for spec in overrides {
            debug!("Applying language override for '{}'", spec.name);
            registry.insert(spec);
        }
        info!(
            "Language registry loaded with {} definition(s)",
            registry.specs.len()
        );
        Ok(registry)
    }

    /// Replace or append a definition.
    pub fn insert(&mut self, spec: LanguageSpec) {
        match self.specs.iter_mut().find(|s| s.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.specs.push(spec),
        }
    }

    /// Look up a language by fence tag (name or alias).
    pub fn get(&self, tag: &str) -> Option<&LanguageSpec> {
        self.specs.iter().find(|s| s.matches_tag(tag))
    }

    /// Look up a language, failing with `UnknownLanguage`.
    pub fn require(&self, tag: &str) -> LangResult<&LanguageSpec> {
        self.get(tag)
            .ok_or_else(|| LangError::UnknownLanguage(tag.to_string()))
    }

    pub fn languages(&self) -> impl Iterator<Item = &LanguageSpec> {
        self.specs.iter()
    }
}

fn dart() -> LanguageSpec {
    LanguageSpec {
        name: "dart".to_string(),
        aliases: vec!["dartpad".to_string(), "flutter".to_string()],
        extension: "dart".to_string(),
        entry_point_pattern: r"(?m)^\s*(?:void\s+|Future<void>\s+)?main\s*\([^)]*\)\s*(?:async\s*)?\{"
            .to_string(),
        reserved_identifiers: vec!["main".to_string()],
        template: WrapperTemplate {
            prelude: vec![
                "// ignore_for_file: unused_local_variable, unused_element".to_string(),
                "import 'package:flutter/material.dart';".to_string(),
            ],
            entry_open: "void main() {".to_string(),
            entry_close: "}".to_string(),
        },
        tool: ToolSpec {
            command: "dart".to_string(),
            args: vec![
                "analyze".to_string(),
                "--format=machine".to_string(),
                "{file}".to_string(),
            ],
            // machine format: SEVERITY|TYPE|CODE|PATH|LINE|COL|LENGTH|MESSAGE
            diagnostic_pattern:
                r"^(?P<severity>ERROR|WARNING|INFO)\|[^|]*\|[^|]*\|[^|]*\|(?P<line>\d+)\|\d+\|\d+\|(?P<message>.*)$"
                    .to_string(),
        },
        classify: ClassifyPatterns {
            unresolved: vec![
                r"isn't defined".to_string(),
                r"Undefined name".to_string(),
                r"Undefined class".to_string(),
                r"undefined_(?:method|getter|setter|class|identifier|function)".to_string(),
            ],
            deprecated: vec![r"(?i)deprecated".to_string()],
        },
    }
}

fn java() -> LanguageSpec {
    LanguageSpec {
        name: "java".to_string(),
        aliases: Vec::new(),
        extension: "java".to_string(),
        entry_point_pattern: r"(?m)^\s*(?:public\s+|final\s+|abstract\s+)*class\s+\w+".to_string(),
        reserved_identifiers: vec!["Scratch".to_string()],
        template: WrapperTemplate {
            prelude: Vec::new(),
            entry_open: "class Scratch {".to_string(),
            entry_close: "}".to_string(),
        },
        tool: ToolSpec {
            command: "javac".to_string(),
            args: vec![
                "-Xlint:deprecation".to_string(),
                "-proc:none".to_string(),
                "{file}".to_string(),
            ],
            diagnostic_pattern:
                r"^[^:]+:(?P<line>\d+):\s*(?P<severity>error|warning):\s*(?P<message>.*)$"
                    .to_string(),
        },
        classify: ClassifyPatterns {
            unresolved: vec![
                r"cannot find symbol".to_string(),
                r"package [\w.]+ does not exist".to_string(),
            ],
            deprecated: vec![r"(?i)deprecat".to_string()],
        },
    }
}

fn kotlin() -> LanguageSpec {
    LanguageSpec {
        name: "kotlin".to_string(),
        aliases: vec!["kt".to_string()],
        extension: "kt".to_string(),
        entry_point_pattern: r"(?m)^\s*fun\s+main\s*\(".to_string(),
        reserved_identifiers: vec!["main".to_string()],
        template: WrapperTemplate {
            prelude: Vec::new(),
            entry_open: "fun main() {".to_string(),
            entry_close: "}".to_string(),
        },
        tool: ToolSpec {
            command: "kotlinc".to_string(),
            args: vec!["-nowarn".to_string(), "{file}".to_string()],
            diagnostic_pattern:
                r"^.*?:(?P<line>\d+):\d+:\s*(?P<severity>error|warning):\s*(?P<message>.*)$"
                    .to_string(),
        },
        classify: ClassifyPatterns {
            unresolved: vec![r"unresolved reference".to_string()],
            deprecated: vec![r"(?i)deprecated".to_string()],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_registry_has_guide_languages() {
        let registry = LanguageRegistry::builtin();
        assert!(registry.get("dart").is_some());
        assert!(registry.get("java").is_some());
        assert!(registry.get("kotlin").is_some());
        assert!(registry.get("cobol").is_none());
    }

    #[test]
    fn test_require_unknown_language() {
        let registry = LanguageRegistry::builtin();
        let err = registry.require("cobol").unwrap_err();
        assert!(matches!(err, LangError::UnknownLanguage(_)));
    }

    #[test]
    fn test_builtin_patterns_compile() {
        for spec in LanguageRegistry::builtin().languages() {
            spec.entry_point_regex().unwrap();
            spec.diagnostic_regex().unwrap();
        }
    }

    #[test]
    fn test_dart_entry_point_requires_declaration_body() {
        let registry = LanguageRegistry::builtin();
        let re = registry.get("dart").unwrap().entry_point_regex().unwrap();
        assert!(re.is_match("void main() {\n  runApp(MyApp());\n}"));
        assert!(re.is_match("Future<void> main() async {\n}"));
        assert!(re.is_match("main(List<String> args) {\n}"));
        // a bare call to main is a fragment, not an entry point
        assert!(!re.is_match("main();"));
    }

    #[test]
    fn test_overrides_replace_builtin() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("languages.yaml");
        fs::write(
            &path,
            r#"
- name: dart
  extension: dart
  entry_point_pattern: "main"
  template:
    entry_open: "void main() {"
    entry_close: "}"
  tool:
    command: custom-analyzer
    args: ["{file}"]
    diagnostic_pattern: "^(?P<severity>error):(?P<line>\\d+):(?P<message>.*)$"
"#,
        )
        .unwrap();

        let registry = LanguageRegistry::load(&path).unwrap();
        assert_eq!(registry.get("dart").unwrap().tool.command, "custom-analyzer");
        // untouched built-ins survive
        assert!(registry.get("kotlin").is_some());
    }

    #[test]
    fn test_missing_override_file() {
        let err = LanguageRegistry::load("/nonexistent/languages.yaml").unwrap_err();
        assert!(matches!(err, LangError::OverridesNotFound(_)));
    }

    #[test]
    fn test_dart_machine_diagnostic_parses() {
        let registry = LanguageRegistry::builtin();
        let re = registry.get("dart").unwrap().diagnostic_regex().unwrap();
        let line = "ERROR|COMPILE_TIME_ERROR|UNDEFINED_GETTER|/tmp/u.dart|4|12|6|The getter 'title' isn't defined for the class 'Widget'.";
        let caps = re.captures(line).unwrap();
        assert_eq!(&caps["severity"], "ERROR");
        assert_eq!(&caps["line"], "4");
        assert!(caps["message"].contains("isn't defined"));
    }
}
