//! `morre cache` command implementation
//!
//! Inspects and clears the local vocabulary cache.

use crate::cache::VocabularyCache;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;

/// Remove every cached vocabulary
pub async fn clear(config: &Config) -> Result<()> {
    let cache = VocabularyCache::open(config.cache_db_path(), config.vocabulary_ttl_minutes)?;
    let count = cache.clear()?;

    println!("{} Removed {} cached vocabularies", "✓".green(), count);
    Ok(())
}

/// Show cache statistics, dropping expired entries first
pub async fn stats(config: &Config) -> Result<()> {
    let cache = VocabularyCache::open(config.cache_db_path(), config.vocabulary_ttl_minutes)?;
    let before = cache.stats()?;
    let removed = cache.cleanup_expired()?;

    println!("{}", "Vocabulary Cache:".cyan().bold());
    println!();
    println!("{:<18} {}", "location:", cache.db_path().display());
    println!("{:<18} {} minutes", "ttl:", config.vocabulary_ttl_minutes);
    println!("{:<18} {}", "valid entries:", before.valid_entries);
    println!("{:<18} {}", "expired entries:", before.expired_entries);
    if removed > 0 {
        println!();
        println!("Cleaned up {} expired entries", removed);
    }

    Ok(())
}
