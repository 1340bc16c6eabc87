//! Snippet extraction from documentation sources.
//!
//! Two block conventions coexist in the guides and are treated identically
//! once extracted:
//!
//! - triple-backtick fences with a language tag in the info string
//! - the legacy templating directive `{% prettify lang %} ... {% endprettify %}`
//!
//! A skip directive excludes a block from compilation while keeping it in
//! the report totals. Recognized forms: an HTML comment `<!-- skip -->` on
//! the line immediately before the block, or a `skip`/`nocheck` attribute
//! in the fence info string.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::document::DocumentSource;
use crate::error::{ExtractError, ExtractResult};
use crate::snippet::CodeSnippet;

const SKIP_COMMENT: &str = "<!-- skip -->";
const PRETTIFY_END: &str = "endprettify";

/// Extractor over a single document.
pub struct SnippetExtractor;

impl SnippetExtractor {
    /// Lazy, restartable sequence of snippets. Calling this again starts a
    /// fresh pass over the same immutable document.
    pub fn snippets(doc: &DocumentSource) -> Snippets<'_> {
        Snippets::new(doc)
    }

    /// Extract every snippet from a document, stopping at the first
    /// malformed block. The error is carried alongside the snippets found
    /// before it so a broken document still contributes to totals.
    pub fn extract(doc: &DocumentSource) -> DocumentExtraction {
        let mut snippets = Vec::new();
        let mut error = None;

        for item in Self::snippets(doc) {
            match item {
                Ok(snippet) => snippets.push(snippet),
                Err(e) => {
                    warn!("{}", e);
                    error = Some(e);
                    break;
                }
            }
        }

        debug!(
            "Extracted {} snippet(s) from {:?}",
            snippets.len(),
            doc.path()
        );

        DocumentExtraction {
            doc_path: doc.path().to_path_buf(),
            snippets,
            error,
        }
    }
}

/// Result of extracting one document.
#[derive(Debug)]
pub struct DocumentExtraction {
    pub doc_path: PathBuf,
    pub snippets: Vec<CodeSnippet>,
    /// Present when the document ended inside an unterminated block.
    pub error: Option<ExtractError>,
}

/// Iterator yielding snippets from a document in order of appearance.
pub struct Snippets<'a> {
    doc: &'a DocumentSource,
    lines: Vec<&'a str>,
    index: usize,
    ordinal: usize,
    headings: Vec<(usize, String)>,
    done: bool,
}

enum BlockKind {
    Fence,
    Prettify,
}

impl<'a> Snippets<'a> {
    fn new(doc: &'a DocumentSource) -> Self {
        Self {
            doc,
            lines: doc.text().lines().collect(),
            index: 0,
            ordinal: 0,
            headings: Vec::new(),
            done: false,
        }
    }

    /// Record an ATX heading, replacing any deeper or equal levels.
    fn push_heading(&mut self, line: &str) {
        let level = line.chars().take_while(|c| *c == '#').count();
        if level == 0 || level > 6 {
            return;
        }
        let title = line[level..].trim();
        if title.is_empty() {
            return;
        }
        while self
            .headings
            .last()
            .map_or(false, |(l, _)| *l >= level)
        {
            self.headings.pop();
        }
        self.headings.push((level, title.to_string()));
    }

    fn heading_path(&self) -> Vec<String> {
        self.headings.iter().map(|(_, t)| t.clone()).collect()
    }

    /// Whether the line immediately before `open_index` is a skip comment.
    fn preceded_by_skip(&self, open_index: usize) -> bool {
        open_index > 0 && self.lines[open_index - 1].trim() == SKIP_COMMENT
    }

    /// Collect block body lines until the closing marker, or fail with
    /// MalformedBlock when the document ends first.
    fn collect_body(
        &mut self,
        open_index: usize,
        kind: &BlockKind,
    ) -> ExtractResult<Vec<&'a str>> {
        let mut body = Vec::new();
        let mut i = open_index + 1;

        while i < self.lines.len() {
            let line = self.lines[i];
            let closed = match kind {
                BlockKind::Fence => line.trim() == "```",
                BlockKind::Prettify => {
                    is_template_directive(line) && line.contains(PRETTIFY_END)
                }
            };
            if closed {
                self.index = i + 1;
                return Ok(body);
            }
            body.push(line);
            i += 1;
        }

        self.done = true;
        Err(ExtractError::MalformedBlock {
            path: self.doc.path().to_path_buf(),
            line: open_index + 1,
        })
    }

    fn emit(
        &mut self,
        open_index: usize,
        start_line: usize,
        language: String,
        attr_skip: bool,
        body: Vec<&str>,
    ) -> CodeSnippet {
        self.ordinal += 1;
        CodeSnippet {
            doc_path: self.doc.path().to_path_buf(),
            language,
            text: body.join("\n"),
            heading_path: self.heading_path(),
            skip: attr_skip || self.preceded_by_skip(open_index),
            ordinal: self.ordinal,
            start_line,
        }
    }
}

impl<'a> Iterator for Snippets<'a> {
    type Item = ExtractResult<CodeSnippet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        while self.index < self.lines.len() {
            let i = self.index;
            let line = self.lines[i];
            let trimmed = line.trim_start();

            if let Some(info) = trimmed.strip_prefix("```") {
                let (language, attr_skip) = parse_info_string(info);
                let body = match self.collect_body(i, &BlockKind::Fence) {
                    Ok(body) => body,
                    Err(e) => return Some(Err(e)),
                };
                return Some(Ok(self.emit(i, i + 2, language, attr_skip, body)));
            }

            if let Some((language, attr_skip, inline)) = parse_prettify_open(trimmed) {
                // single-line form: body and closing directive share the
                // opening line
                if let Some(body) = inline {
                    self.index = i + 1;
                    return Some(Ok(self.emit(i, i + 1, language, attr_skip, vec![body.as_str()])));
                }
                let body = match self.collect_body(i, &BlockKind::Prettify) {
                    Ok(body) => body,
                    Err(e) => return Some(Err(e)),
                };
                return Some(Ok(self.emit(i, i + 2, language, attr_skip, body)));
            }

            if trimmed.starts_with('#') {
                self.push_heading(trimmed);
            }

            self.index += 1;
        }

        None
    }
}

/// Parse a fence info string into (language tag, skip attribute).
///
/// Handles both `dart skip` and `dart,skip` forms.
fn parse_info_string(info: &str) -> (String, bool) {
    let mut tokens = info
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty());

    let language = tokens
        .next()
        .map(|t| t.to_lowercase())
        .unwrap_or_default();
    let skip = tokens.any(|t| t.eq_ignore_ascii_case("skip") || t.eq_ignore_ascii_case("nocheck"));
    (language, skip)
}

fn is_template_directive(line: &str) -> bool {
    let t = line.trim();
    t.starts_with("{%") && t.ends_with("%}")
}

/// Parse a `{% prettify lang %}` opening directive. Returns the language,
/// the skip attribute, and the inline body when the closing directive sits
/// on the same line.
fn parse_prettify_open(line: &str) -> Option<(String, bool, Option<String>)> {
    let t = line.trim();
    let rest = t.strip_prefix("{%-").or_else(|| t.strip_prefix("{%"))?;
    let close = rest.find("%}")?;
    let inner = rest[..close].trim_end_matches('-').trim();

    let mut tokens = inner.split_whitespace();
    if tokens.next() != Some("prettify") {
        return None;
    }
    let language = tokens.next().map(|t| t.to_lowercase()).unwrap_or_default();
    let skip = tokens.any(|t| t.eq_ignore_ascii_case("skip") || t.eq_ignore_ascii_case("nocheck"));

    let after = &rest[close + 2..];
    if after.is_empty() {
        return Some((language, skip, None));
    }
    let end = after.find("{%").filter(|_| after.contains(PRETTIFY_END))?;
    Some((language, skip, Some(after[..end].to_string())))
}
