//! `morre config` command implementation
//!
//! Configuration is read from environment variables and global flags; these
//! commands only display it.

use crate::config::Config;
use crate::error::Result;
use colored::Colorize;

const ENV_VARS: &[(&str, &str)] = &[
    ("MORRE_SERVER_URL", "Server URL"),
    ("MORRE_API_TIMEOUT_SECS", "Request timeout in seconds"),
    ("MORRE_VALIDATE_FEATURES", "Check feature keywords before sending (true/false)"),
    ("MORRE_CACHE_DIR", "Cache directory"),
    ("MORRE_VOCABULARY_CACHE_TTL", "Vocabulary cache lifetime in minutes"),
    ("MORRE_LOG_LEVEL", "Log level (trace, debug, info, warn, error)"),
];

/// Get configuration value
pub async fn get(config: &Config, key: &str) -> Result<()> {
    println!("{}", config.get(key)?);
    Ok(())
}

/// Show all configuration
pub async fn show(config: &Config) -> Result<()> {
    println!("{}", "MORRE CLI Configuration:".cyan().bold());
    println!();
    println!("{:<24} {}", "server_url:", config.server_url());
    println!("{:<24} {}", "cache_dir:", config.cache_dir().display());
    println!("{:<24} {}", "vocabulary_ttl_minutes:", config.vocabulary_ttl_minutes);
    println!("{:<24} {}", "verbose:", config.is_verbose());
    println!();
    println!("{}", "Environment Variables:".cyan());
    for (name, description) in ENV_VARS {
        println!("  {:<28} - {}", name, description);
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_get() {
        let config = Config::default();
        assert!(get(&config, "server_url").await.is_ok());
        assert!(get(&config, "password").await.is_err());
    }

    #[tokio::test]
    async fn test_config_show() {
        assert!(show(&Config::default()).await.is_ok());
    }
}
