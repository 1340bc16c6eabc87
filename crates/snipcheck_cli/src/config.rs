//! Run configuration loaded from `snipcheck.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use snipcheck_extract::DEFAULT_EXTENSIONS;

const CONFIG_FILE: &str = "snipcheck.toml";

/// Tool configuration; CLI flags override individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker pool size; omitted means available parallelism.
    pub jobs: Option<usize>,
    /// Per-unit analyzer timeout in seconds.
    pub timeout_seconds: u64,
    /// Enable the last-known-good snippet cache.
    pub cache: bool,
    /// YAML file with language definition overrides.
    pub languages_file: Option<PathBuf>,
    /// File extensions treated as documentation when walking directories.
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jobs: None,
            timeout_seconds: 60,
            cache: false,
            languages_file: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from `snipcheck.toml` in the current
    /// directory when present, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if !default.exists() {
                    debug!("No {} found, using defaults", CONFIG_FILE);
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout_seconds, 60);
        assert!(!config.cache);
        assert!(config.extensions.contains(&"md".to_string()));
    }

    #[test]
    fn test_partial_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("snipcheck.toml");
        fs::write(&path, "timeout_seconds = 120\ncache = true\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.timeout_seconds, 120);
        assert!(config.cache);
        // unspecified fields keep defaults
        assert!(config.jobs.is_none());
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("snipcheck.toml");
        fs::write(&path, "timeout_seconds = \"soon\"\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
