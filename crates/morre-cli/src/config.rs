//! Configuration management for the MORRE CLI
//!
//! Handles CLI settings like server URL, cache location and cache lifetime.

use crate::error::{CliError, Result};
use std::path::PathBuf;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

pub use morre_client::config::DEFAULT_SERVER_URL;

/// How long a cached feature vocabulary stays valid, in minutes
pub const DEFAULT_VOCABULARY_TTL_MINUTES: i64 = 60;

/// Longest accepted vocabulary cache lifetime (one year), in minutes
pub const MAX_VOCABULARY_TTL_MINUTES: i64 = 365 * 24 * 60;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// MORRE server URL
    pub server_url: String,

    /// Directory holding the vocabulary cache database
    pub cache_dir: PathBuf,

    /// Vocabulary cache lifetime in minutes
    pub vocabulary_ttl_minutes: i64,

    pub verbose: bool,
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Result<Self> {
        Ok(Self::with_cache_dir(default_cache_dir()?))
    }

    fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            cache_dir,
            vocabulary_ttl_minutes: DEFAULT_VOCABULARY_TTL_MINUTES,
            verbose: false,
        }
    }

    /// Load config from environment variables
    pub fn from_env() -> Result<Self> {
        let cache_dir = match std::env::var("MORRE_CACHE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_cache_dir()?,
        };
        let mut config = Self::with_cache_dir(cache_dir);

        if let Ok(url) = std::env::var("MORRE_SERVER_URL") {
            config.server_url = url;
        }

        if let Ok(ttl) = std::env::var("MORRE_VOCABULARY_CACHE_TTL") {
            config.vocabulary_ttl_minutes = parse_ttl_minutes(&ttl)?;
        }

        Ok(config)
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn set_server_url(&mut self, url: String) {
        self.server_url = url;
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Path of the vocabulary cache database
    pub fn cache_db_path(&self) -> PathBuf {
        self.cache_dir.join("vocabulary.db")
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Look up a setting by name for `morre config get`
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "server_url" => Ok(self.server_url.clone()),
            "cache_dir" => Ok(self.cache_dir.display().to_string()),
            "vocabulary_ttl_minutes" => Ok(self.vocabulary_ttl_minutes.to_string()),
            "verbose" => Ok(self.verbose.to_string()),
            _ => Err(CliError::config(format!(
                "Unknown config key: {key}. Known keys: server_url, cache_dir, vocabulary_ttl_minutes, verbose"
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        // If we can't determine the cache directory, fall back to a local directory
        Self::new().unwrap_or_else(|_| Self::with_cache_dir(PathBuf::from(".morre-cache")))
    }
}

/// Parse a cache lifetime in minutes, between 1 and [`MAX_VOCABULARY_TTL_MINUTES`]
fn parse_ttl_minutes(raw: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(minutes) if (1..=MAX_VOCABULARY_TTL_MINUTES).contains(&minutes) => Ok(minutes),
        _ => Err(CliError::config(format!(
            "MORRE_VOCABULARY_CACHE_TTL must be a whole number of minutes between 1 and {MAX_VOCABULARY_TTL_MINUTES}, got '{raw}'"
        ))),
    }
}

/// `<system cache dir>/morre`
fn default_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join("morre"))
        .ok_or_else(|| CliError::config("Could not determine cache directory; set MORRE_CACHE_DIR"))
}
