//! Configuration management for userdesk.
//!
//! Loads configuration from ${USERDESK_HOME}/config.toml with sensible defaults.
//! The API base URL can be overridden by `USERDESK_API_URL` and, above that,
//! by the `--api-url` CLI flag.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `api_url`.
pub const API_URL_ENV: &str = "USERDESK_API_URL";

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for userdesk configuration and data directories.
    //!
    //! USERDESK_HOME resolution order:
    //! 1. USERDESK_HOME environment variable (if set)
    //! 2. ~/.config/userdesk (default)

    use std::path::PathBuf;

    use anyhow::{Context, Result};

    /// Returns the userdesk home directory.
    ///
    /// # Errors
    /// Returns an error if no home directory can be determined.
    pub fn userdesk_home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("USERDESK_HOME") {
            return Ok(PathBuf::from(home));
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("userdesk"))
            .context("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    ///
    /// # Errors
    /// Returns an error if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        Ok(userdesk_home()?.join("config.toml"))
    }

    /// Returns the path to the persisted session file.
    ///
    /// # Errors
    /// Returns an error if no home directory can be determined.
    pub fn session_path() -> Result<PathBuf> {
        Ok(userdesk_home()?.join("session.json"))
    }

    /// Returns the directory log files are written to.
    ///
    /// # Errors
    /// Returns an error if no home directory can be determined.
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(userdesk_home()?.join("logs"))
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the user-management API.
    pub api_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Accept invalid (e.g. self-signed) TLS certificates.
    pub accept_invalid_certs: bool,
}

impl Config {
    pub const DEFAULT_API_URL: &'static str = "https://3.144.28.166:8443";
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Loads configuration from the default path and applies env overrides.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path()?)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
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

    /// Applies environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
    }

    /// Overrides the API URL (used for the `--api-url` flag).
    pub fn with_api_url(mut self, api_url: Option<&str>) -> Self {
        if let Some(url) = api_url.map(str::trim).filter(|v| !v.is_empty()) {
            self.api_url = url.to_string();
        }
        self
    }

    /// Returns the request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Initializes a new config file with the default template.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            accept_invalid_certs: false,
        }
    }
}
