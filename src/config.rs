//! Optional YAML configuration file.
//!
//! Settings are layered: built-in defaults, then the YAML file passed with
//! `--config`, then command-line flags and environment variables.
//!
//! ```yaml
//! storage_path: /var/lib/news_feed/state.json
//! sources:
//!   - public/hybrid_tech_news.txt
//!   - https://example.com/hybrid_tech_news.txt
//! log_filter: news_feed=debug
//! ```

use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Where interaction state lives when nothing else is configured.
pub const DEFAULT_STORAGE_PATH: &str = "news_state.json";

/// Report locations tried in order before falling back to the embedded sample.
pub const DEFAULT_SOURCES: &[&str] = &["public/hybrid_tech_news.txt", "hybrid_tech_news.txt"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// JSON file backing likes, comments and the display name.
    pub storage_path: PathBuf,
    /// Report sources, file paths or `http(s)` URLs, highest priority first.
    pub sources: Vec<String>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            log_filter: None,
        }
    }
}

impl FeedConfig {
    /// Load configuration from `path`, or defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&raw)?;
        info!(path = %path.display(), sources = config.sources.len(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(mut self, storage: Option<PathBuf>, sources: Vec<String>) -> Self {
        if let Some(storage) = storage {
            self.storage_path = storage;
        }
        if !sources.is_empty() {
            self.sources = sources;
        }
        self
    }
}
