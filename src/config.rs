//! Configuration management for julesync
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for julesync
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote service settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Activity polling settings
    #[serde(default)]
    pub poll: PollConfig,
    /// Local persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all REST paths are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Number of items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// API key; when unset the OS keyring is consulted
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://jules.googleapis.com/".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout_seconds(),
            api_key: None,
        }
    }
}

impl ApiConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Activity polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between the end of one tick and the start of the next
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Session statuses that end polling (compared case-insensitively)
    #[serde(default = "default_terminal_states")]
    pub terminal_states: Vec<String>,
}

fn default_interval_ms() -> u64 {
    3000
}

fn default_terminal_states() -> Vec<String> {
    ["COMPLETED", "FAILED", "CANCELLED", "TERMINATED"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            terminal_states: default_terminal_states(),
        }
    }
}

impl PollConfig {
    /// Poll interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Terminal statuses, upper-cased.
    pub fn terminal_set(&self) -> HashSet<String> {
        self.terminal_states
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Local persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Location of the key-value store; platform data dir when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

const MIN_INTERVAL_MS: u64 = 100;
const MAX_PAGE_SIZE: u32 = 100;

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SyncError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SyncError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("JULESYNC_API_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(api_key) = std::env::var("JULESYNC_API_KEY") {
            if !api_key.is_empty() {
                self.api.api_key = Some(api_key);
            }
        }

        if let Ok(page_size) = std::env::var("JULESYNC_PAGE_SIZE") {
            if let Ok(value) = page_size.parse() {
                self.api.page_size = value;
            } else {
                tracing::warn!("Invalid JULESYNC_PAGE_SIZE: {}", page_size);
            }
        }

        if let Ok(timeout) = std::env::var("JULESYNC_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid JULESYNC_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(interval) = std::env::var("JULESYNC_POLL_INTERVAL_MS") {
            if let Ok(value) = interval.parse() {
                self.poll.interval_ms = value;
            } else {
                tracing::warn!("Invalid JULESYNC_POLL_INTERVAL_MS: {}", interval);
            }
        }

        if let Ok(states) = std::env::var("JULESYNC_TERMINAL_STATES") {
            let parsed: Vec<String> = states
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !parsed.is_empty() {
                tracing::debug!(?parsed, "Env override: JULESYNC_TERMINAL_STATES");
                self.poll.terminal_states = parsed;
            }
        }

        if let Ok(path) = std::env::var("JULESYNC_STORE_PATH") {
            self.storage.path = Some(PathBuf::from(path));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(path) = &cli.store_path {
            tracing::debug!("Using store path from CLI: {}", path.display());
            self.storage.path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` naming the first offending field
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = url::Url::parse(&self.api.base_url) {
            return Err(SyncError::Config(format!(
                "api.base_url is not a valid URL ({}): {}",
                self.api.base_url, e
            ))
            .into());
        }

        if self.api.page_size == 0 || self.api.page_size > MAX_PAGE_SIZE {
            return Err(SyncError::Config(format!(
                "api.page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(SyncError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.poll.interval_ms < MIN_INTERVAL_MS {
            return Err(SyncError::Config(format!(
                "poll.interval_ms must be at least {}",
                MIN_INTERVAL_MS
            ))
            .into());
        }

        if self.poll.terminal_set().is_empty() {
            return Err(SyncError::Config(
                "poll.terminal_states must not be empty".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
