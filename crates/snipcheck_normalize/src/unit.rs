//! Normalized compilable units.

use serde::{Deserialize, Serialize};

use snipcheck_extract::CodeSnippet;

/// A snippet plus the scaffolding that makes it independently compilable.
/// Owned by one pipeline run; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedUnit {
    pub snippet: CodeSnippet,
    /// Canonical language name (fence aliases resolved).
    pub language: String,
    /// File extension for the scratch file.
    pub extension: String,
    /// Full source text handed to the analyzer.
    pub source: String,
    /// Lines inserted before the snippet body; zero for complete units.
    pub line_offset: usize,
}

impl NormalizedUnit {
    /// Whether the unit was wrapped (vs. passed through as-is).
    pub fn is_wrapped(&self) -> bool {
        self.line_offset > 0
    }

    /// File name for the scratch file, unique within a run.
    pub fn file_name(&self) -> String {
        format!("snippet_{:04}.{}", self.snippet.ordinal, self.extension)
    }

    /// Remap a 1-based line in the unit source back to a 1-based line in
    /// the original snippet, clamped into the snippet's own range so a
    /// wrapper-only line is never reported.
    pub fn map_line(&self, unit_line: usize) -> usize {
        let max = self.snippet.line_count().max(1);
        if unit_line <= self.line_offset {
            1
        } else {
            (unit_line - self.line_offset).min(max)
        }
    }

    /// Line in the document where the remapped snippet line lives.
    pub fn document_line(&self, unit_line: usize) -> usize {
        self.snippet.start_line + self.map_line(unit_line) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn unit(offset: usize, body: &str) -> NormalizedUnit {
        NormalizedUnit {
            snippet: CodeSnippet {
                doc_path: PathBuf::from("guide.md"),
                language: "dart".to_string(),
                text: body.to_string(),
                heading_path: Vec::new(),
                skip: false,
                ordinal: 1,
                start_line: 10,
            },
            language: "dart".to_string(),
            extension: "dart".to_string(),
            source: body.to_string(),
            line_offset: offset,
        }
    }

    #[test]
    fn test_map_line_offsets_into_snippet() {
        let u = unit(3, "a\nb\nc");
        assert_eq!(u.map_line(4), 1);
        assert_eq!(u.map_line(6), 3);
    }

    #[test]
    fn test_map_line_clamps_wrapper_lines() {
        let u = unit(3, "a\nb");
        // prelude line
        assert_eq!(u.map_line(2), 1);
        // closing brace after the body
        assert_eq!(u.map_line(6), 2);
    }

    #[test]
    fn test_document_line() {
        let u = unit(2, "a\nb\nc");
        assert_eq!(u.document_line(3), 10);
        assert_eq!(u.document_line(5), 12);
    }
}
