//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function. Query commands
//! share a [`Session`]: the MORRE client plus the on-disk vocabulary cache.

pub mod annotations;
pub mod cache;
pub mod config;
pub mod features;
pub mod models;
pub mod persons;
pub mod publications;

use crate::cache::VocabularyCache;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::OutputFormat;
use morre_client::{ClientConfig, FeatureSet, MorreClient, QueryType};
use tracing::{debug, warn};

/// Client and cache for one CLI invocation
pub struct Session {
    client: MorreClient,
    cache: Option<VocabularyCache>,
    server_url: String,
    format: OutputFormat,
}

impl Session {
    /// Connect to the configured server.
    ///
    /// `no_validate` turns off feature checking even when the environment
    /// enables it. A cache that cannot be opened is skipped with a warning.
    pub fn open(config: &Config, format: OutputFormat, no_validate: bool) -> Result<Self> {
        let mut client_config = ClientConfig::from_env()?.with_base_url(config.server_url())?;
        if no_validate {
            client_config = client_config.with_validate_features(false);
        }

        let client = MorreClient::with_config(client_config)?;
        let server_url = client.base_url().to_string();

        let cache = match VocabularyCache::open(config.cache_db_path(), config.vocabulary_ttl_minutes)
        {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(error = %e, "Vocabulary cache unavailable, continuing without it");
                None
            },
        };

        debug!(server_url = %server_url, "Session opened");
        Ok(Self {
            client,
            cache,
            server_url,
            format,
        })
    }

    pub fn client(&self) -> &MorreClient {
        &self.client
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Seed the client with the cached vocabulary of `query_type`, if any
    pub fn prime_vocabulary(&self, query_type: &QueryType) -> bool {
        if !self.client.config().validate_features() {
            return false;
        }
        let Some(cache) = &self.cache else {
            return false;
        };

        match cache.get(&self.server_url, query_type) {
            Ok(Some(vocabulary)) => {
                self.client.prime_vocabulary(vocabulary);
                true
            },
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, query_type = %query_type, "Failed to read vocabulary cache");
                false
            },
        }
    }

    /// Write the client's vocabulary of `query_type` back to the cache
    pub fn persist_vocabulary(&self, query_type: &QueryType) {
        let (Some(cache), Some(vocabulary)) = (
            &self.cache,
            self.client.cached_vocabulary(query_type.as_str()),
        ) else {
            return;
        };

        if let Err(e) = cache.set(&self.server_url, &vocabulary) {
            // Don't fail the command if caching fails
            warn!(error = %e, query_type = %query_type, "Failed to cache vocabulary");
        }
    }
}

/// Parse `KEY=VALUE` arguments into a feature set; repeated keys add values
pub fn parse_features(args: &[String]) -> Result<FeatureSet> {
    args.iter()
        .map(|arg| parse_feature(arg))
        .collect::<Result<Vec<_>>>()
        .map(|pairs| pairs.into_iter().collect())
}

fn parse_feature(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg.split_once('=').ok_or_else(|| {
        CliError::invalid_argument(format!("feature '{arg}' must have the form KEY=VALUE"))
    })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::invalid_argument(format!(
            "feature '{arg}' has an empty key"
        )));
    }

    Ok((key.to_string(), value.trim().to_string()))
}

/// Join positional query words the way the shell split them
pub fn join_query(words: &[String]) -> String {
    words.join(" ")
}
