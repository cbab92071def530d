//! Configuration types for ragchat.
//!
//! Configuration lives in `.ragchat/config.json`. Every field has a default,
//! so a missing file or a partial one is fine.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory holding config and logs, relative to the working directory.
pub const RAGCHAT_DIR: &str = ".ragchat";

/// Main configuration for ragchat.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Base URL of the document backend.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Render message text as markdown (literal text when false).
    #[serde(default = "default_render_markdown")]
    pub render_markdown: bool,

    /// UI tick interval in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Color theme name (`mocha`, `latte` or `high-contrast`).
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".into()
}

fn default_render_markdown() -> bool {
    true
}

fn default_tick_rate_ms() -> u64 {
    250
}

fn default_theme() -> String {
    "mocha".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            render_markdown: default_render_markdown(),
            tick_rate_ms: default_tick_rate_ms(),
            theme: default_theme(),
        }
    }
}

impl Config {
    /// Default config file location under `root`.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(RAGCHAT_DIR).join("config.json")
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load from `path` if it exists, otherwise return defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),
}
