//! Configuration for the index builder and the query engine
//!
//! Settings come from an optional `docsearch.json` next to the site sources.
//! Every key has a default, so a missing file (or a partial one) is fine.
//! CLI flags are applied on top by `main`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ranker::FieldWeights;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "docsearch.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub build: BuildConfig,
    pub engine: EngineConfig,
}

/// Where the builder reads content and writes the artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    pub content_dir: PathBuf,
    pub output_path: PathBuf,
    /// Cap on the normalized `content` field, in characters
    pub max_content_chars: usize,
    /// Category for documents sitting directly in the content root
    pub default_category: String,
    /// Abort on the first unreadable document instead of skipping it
    pub strict: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content/docs"),
            output_path: PathBuf::from("public/search-index.json"),
            max_content_chars: 2000,
            default_category: "general".to_string(),
            strict: false,
        }
    }
}

/// Query-time limits and timings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Results shown after ranking
    pub display_limit: usize,
    /// Hits fetched per field before ranking
    pub field_limit: usize,
    pub debounce_ms: u64,
    pub snippet_chars: usize,
    /// Characters of left context kept before the first match in a snippet
    pub snippet_context: usize,
    pub weights: FieldWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            display_limit: 10,
            field_limit: 15,
            debounce_ms: 150,
            snippet_chars: 150,
            snippet_context: 40,
            weights: FieldWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Load config from `path`, or from `docsearch.json` in the working
    /// directory when no path is given. A missing default file yields defaults;
    /// an explicitly requested file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !config_path.exists() {
            if required {
                anyhow::bail!("Config file not found: {:?}", config_path);
            }
            tracing::debug!("No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config {:?}", config_path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", config_path))?;

        tracing::debug!("Loaded config from {:?}", config_path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_site_layout() {
        let config = Config::default();
        assert_eq!(config.build.content_dir, PathBuf::from("content/docs"));
        assert_eq!(config.build.max_content_chars, 2000);
        assert_eq!(config.engine.display_limit, 10);
        assert_eq!(config.engine.field_limit, 15);
        assert_eq!(config.engine.debounce(), Duration::from_millis(150));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docsearch.json");
        fs::write(
            &path,
            r#"{ "build": { "contentDir": "docs" }, "engine": { "weights": { "title": 20 } } }"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.build.content_dir, PathBuf::from("docs"));
        assert_eq!(config.build.default_category, "general");
        assert_eq!(config.engine.weights.weight("title"), 20);
        assert_eq!(config.engine.weights.weight("headings"), 5);
        assert_eq!(config.engine.snippet_chars, 150);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.json"))).is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docsearch.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
