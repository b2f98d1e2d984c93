//! Client configuration
//!
//! Server address, per-request timeout and local validation switches.

use crate::error::{MorreError, Result};
use std::time::Duration;
use url::Url;

// ============================================================================
// Client Configuration Constants
// ============================================================================

/// Default MORRE server URL when not specified via environment variable.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:7474/morre/";

/// Default per-request timeout in seconds.
/// Can be overridden via MORRE_API_TIMEOUT_SECS.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("morre-client/", env!("CARGO_PKG_VERSION"));

/// Configuration for [`MorreClient`](crate::MorreClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
    validate_features: bool,
    user_agent: String,
}

impl ClientConfig {
    /// Create a configuration for the server at `base_url` with default settings.
    ///
    /// There is no `Default` impl; use `ClientConfig::new(DEFAULT_SERVER_URL)`
    /// or [`ClientConfig::from_env`] for the local server.
    ///
    /// # Errors
    ///
    /// Returns a client-tier error if `base_url` is not an absolute
    /// `http`/`https` URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            validate_features: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// - `MORRE_SERVER_URL`: server base URL
    /// - `MORRE_API_TIMEOUT_SECS`: request timeout in seconds
    /// - `MORRE_VALIDATE_FEATURES`: `true`/`false`
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("MORRE_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Ok(secs) = std::env::var("MORRE_API_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                MorreError::config(format!("MORRE_API_TIMEOUT_SECS must be a number of seconds, got '{secs}'"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs))?;
        }

        if let Ok(flag) = std::env::var("MORRE_VALIDATE_FEATURES") {
            let flag: bool = flag.trim().parse().map_err(|_| {
                MorreError::config(format!("MORRE_VALIDATE_FEATURES must be 'true' or 'false', got '{flag}'"))
            })?;
            config = config.with_validate_features(flag);
        }

        Ok(config)
    }

    /// Point the configuration at another server, keeping the other settings.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(MorreError::config("timeout must be greater than zero"));
        }
        self.timeout = timeout;
        Ok(self)
    }

    /// Toggle checking feature keywords against the server vocabulary before
    /// sending feature-based queries.
    pub fn with_validate_features(mut self, validate: bool) -> Self {
        self.validate_features = validate;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn validate_features(&self) -> bool {
        self.validate_features
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Parse and normalize a base URL so relative endpoint paths join beneath it.
fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MorreError::invalid_url(raw, "URL is empty"));
    }

    let mut url = Url::parse(trimmed).map_err(|e| MorreError::invalid_url(raw, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(MorreError::invalid_url(
            raw,
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(MorreError::invalid_url(raw, "URL has no host"));
    }

    // Url::join replaces the last segment unless the path ends with '/'
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}
