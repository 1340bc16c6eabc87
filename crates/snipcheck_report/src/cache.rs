//! Last-known-good snippet cache.
//!
//! Purely a performance optimization: a unit whose digest matches a
//! previously passing run skips compilation and reports as passed (cached).
//! Correctness never depends on the cache; it stores only passes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use snipcheck_normalize::NormalizedUnit;

use crate::error::{ReportError, ReportResult};

const CACHE_DIR: &str = ".snipcheck";
const CACHE_FILE: &str = "cache.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    language: String,
    checked_at: DateTime<Utc>,
}

/// Digest-keyed cache of snippets that passed on a previous run.
#[derive(Debug)]
pub struct SnippetCache {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl SnippetCache {
    /// Load the cache under `root/.snipcheck/cache.json`; a missing or
    /// unreadable file yields an empty cache.
    pub fn load(root: impl AsRef<Path>) -> Self {
        let path = root.as_ref().join(CACHE_DIR).join(CACHE_FILE);
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();

        let cache = Self { path, entries };
        debug!("Loaded snippet cache with {} entry(ies)", cache.entries.len());
        cache
    }

    /// Digest identifying a unit's analyzed content.
    pub fn digest(unit: &NormalizedUnit) -> String {
        let mut hasher = Sha256::new();
        hasher.update(unit.language.as_bytes());
        hasher.update(b"\0");
        hasher.update(unit.source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Whether this exact unit passed on a previous run.
    pub fn is_known_good(&self, unit: &NormalizedUnit) -> bool {
        self.entries.contains_key(&Self::digest(unit))
    }

    /// Record a passing unit.
    pub fn record_pass(&mut self, unit: &NormalizedUnit) {
        self.entries.insert(
            Self::digest(unit),
            CacheEntry {
                language: unit.language.clone(),
                checked_at: Utc::now(),
            },
        );
    }

    /// Persist the cache, creating the dot-directory if needed.
    pub fn save(&self) -> ReportResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ReportError::CacheWrite {
                path: self.path.clone(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).map_err(|e| ReportError::CacheWrite {
            path: self.path.clone(),
            source: e,
        })?;
        debug!("Saved snippet cache to {:?}", self.path);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    use snipcheck_extract::CodeSnippet;

    fn unit(source: &str) -> NormalizedUnit {
        NormalizedUnit {
            snippet: CodeSnippet {
                doc_path: PathBuf::from("guide.md"),
                language: "dart".to_string(),
                text: source.to_string(),
                heading_path: Vec::new(),
                skip: false,
                ordinal: 1,
                start_line: 1,
            },
            language: "dart".to_string(),
            extension: "dart".to_string(),
            source: source.to_string(),
            line_offset: 0,
        }
    }

    #[test]
    fn test_cache_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut cache = SnippetCache::load(temp.path());
        assert!(cache.is_empty());

        cache.record_pass(&unit("void main() {}"));
        cache.save().unwrap();

        let reloaded = SnippetCache::load(temp.path());
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.is_known_good(&unit("void main() {}")));
        assert!(!reloaded.is_known_good(&unit("void main() { changed(); }")));
    }

    #[test]
    fn test_digest_depends_on_language() {
        let mut java = unit("class A {}");
        java.language = "java".to_string();
        let dart = unit("class A {}");
        assert_ne!(SnippetCache::digest(&java), SnippetCache::digest(&dart));
    }

    #[test]
    fn test_missing_cache_is_empty_not_error() {
        let cache = SnippetCache::load("/nonexistent/workspace");
        assert!(cache.is_empty());
    }
}
