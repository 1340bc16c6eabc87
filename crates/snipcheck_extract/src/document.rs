//! Documentation source files and discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ExtractError, ExtractResult};

/// Default file extensions recognized as documentation sources.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// A single documentation file, read once and immutable thereafter.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    path: PathBuf,
    text: String,
}

impl DocumentSource {
    /// Read a document from disk.
    pub fn read(path: impl AsRef<Path>) -> ExtractResult<Self> {
        let path = path.as_ref();
        debug!("Reading document {:?}", path);

        if !path.exists() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    /// Build a document from in-memory text (used by tests and tools that
    /// already hold the content).
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Expand CLI inputs (files, directories, glob patterns) into an ordered,
/// deduplicated list of document paths.
pub fn discover(inputs: &[String], extensions: &[String]) -> ExtractResult<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        if input.contains('*') || input.contains('?') || input.contains('[') {
            let matches = glob::glob(input).map_err(|e| ExtractError::InvalidPattern {
                pattern: input.clone(),
                message: e.to_string(),
            })?;
            for entry in matches.filter_map(|e| e.ok()) {
                if entry.is_file() {
                    paths.push(entry);
                }
            }
            continue;
        }

        let path = PathBuf::from(input);
        if path.is_dir() {
            for entry in WalkDir::new(&path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
            {
                if has_extension(entry.path(), extensions) {
                    paths.push(entry.path().to_path_buf());
                }
            }
        } else if path.is_file() {
            paths.push(path);
        } else {
            return Err(ExtractError::NotFound(path));
        }
    }

    paths.sort();
    paths.dedup();

    if paths.is_empty() {
        return Err(ExtractError::NoDocuments);
    }

    debug!("Discovered {} document(s)", paths.len());
    Ok(paths)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |ext| extensions.iter().any(|e| e == ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn exts() -> Vec<String> {
        DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_discover_directory_filters_extensions() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("guide.md"), "# Guide").unwrap();
        fs::write(temp.path().join("notes.txt"), "notes").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub").join("more.markdown"), "# More").unwrap();

        let inputs = vec![temp.path().to_string_lossy().to_string()];
        let paths = discover(&inputs, &exts()).unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.extension().unwrap() != "txt"));
    }

    #[test]
    fn test_discover_explicit_file_ignores_extension_filter() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("readme.rst");
        fs::write(&file, "content").unwrap();

        let inputs = vec![file.to_string_lossy().to_string()];
        let paths = discover(&inputs, &exts()).unwrap();
        assert_eq!(paths, vec![file]);
    }

    #[test]
    fn test_discover_missing_path_errors() {
        let result = discover(&["/nonexistent/doc.md".to_string()], &exts());
        assert!(matches!(result, Err(ExtractError::NotFound(_))));
    }

    #[test]
    fn test_discover_is_sorted_and_deduplicated() {
        let temp = TempDir::new().unwrap();
        let b = temp.path().join("b.md");
        let a = temp.path().join("a.md");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();

        let inputs = vec![
            b.to_string_lossy().to_string(),
            a.to_string_lossy().to_string(),
            b.to_string_lossy().to_string(),
        ];
        let paths = discover(&inputs, &exts()).unwrap();
        assert_eq!(paths, vec![a, b]);
    }
}
