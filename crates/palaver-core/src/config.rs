//! Configuration management for palaver.
//!
//! Loads configuration from ${PALAVER_HOME}/config.toml with sensible
//! defaults. Field-targeted saves go through `toml_edit` so user comments and
//! unrelated keys survive.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the agent server.
    pub server_url: String,

    /// Default agent for new sessions (optional; the picker is shown when
    /// unset).
    pub agent_id: Option<String>,

    /// Whether the sessions sidebar starts collapsed.
    pub sidebar_collapsed: bool,

    /// Timeout for plain REST requests in seconds. Does not apply to the
    /// event stream.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: Self::DEFAULT_SERVER_URL.to_string(),
            agent_id: None,
            sidebar_collapsed: false,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Saves only the sidebar_collapsed field to the config file.
    ///
    /// Creates the file if it doesn't exist. Preserves existing fields and
    /// comments using toml_edit.
    pub fn save_sidebar_collapsed(collapsed: bool) -> Result<()> {
        Self::save_sidebar_collapsed_to(&paths::config_path(), collapsed)
    }

    /// Saves only the sidebar_collapsed field to a specific config file path.
    pub fn save_sidebar_collapsed_to(path: &Path, collapsed: bool) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            String::new()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        doc["sidebar_collapsed"] = value(collapsed);

        Self::write_config(path, &doc.to_string())
    }

    fn write_config(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

pub mod paths {
    //! Path resolution for palaver configuration and data directories.
    //!
    //! PALAVER_HOME resolution order:
    //! 1. PALAVER_HOME environment variable (if set)
    //! 2. ~/.config/palaver (default)

    use std::path::PathBuf;

    /// Returns the palaver home directory.
    pub fn palaver_home() -> PathBuf {
        if let Ok(home) = std::env::var("PALAVER_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("palaver"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        palaver_home().join("config.toml")
    }

    /// Returns the per-session drafts directory.
    pub fn drafts_dir() -> PathBuf {
        palaver_home().join("drafts")
    }

    /// Returns the log directory.
    pub fn logs_dir() -> PathBuf {
        palaver_home().join("logs")
    }
}
