//! Extracted code snippet model.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One code block extracted from a document. Created by the extractor and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSnippet {
    /// Path of the document the snippet came from.
    pub doc_path: PathBuf,
    /// Declared language tag, lowercased (e.g. "dart").
    pub language: String,
    /// Raw snippet text, without the fence/directive lines.
    pub text: String,
    /// Enclosing heading chain, outermost first.
    pub heading_path: Vec<String>,
    /// Explicit author opt-out of validation.
    pub skip: bool,
    /// 1-based position of the block within its document.
    pub ordinal: usize,
    /// 1-based line of the first snippet line in the document.
    pub start_line: usize,
}

impl CodeSnippet {
    /// Stable identifier used for logging and deterministic ordering.
    pub fn id(&self) -> String {
        format!("{}#{}", self.doc_path.display(), self.ordinal)
    }

    /// Number of lines in the snippet body.
    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.text.lines().count()
        }
    }

    /// Heading chain joined for display, or a placeholder for snippets
    /// above the first heading.
    pub fn heading_display(&self) -> String {
        if self.heading_path.is_empty() {
            "(no heading)".to_string()
        } else {
            self.heading_path.join(" > ")
        }
    }
}
