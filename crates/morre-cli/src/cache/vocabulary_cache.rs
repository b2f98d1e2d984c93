//! Feature vocabulary caching
//!
//! Persists `get_query_features` answers in SQLite so repeated CLI runs can
//! validate feature sets without asking the server every time.

use crate::error::{CliError, Result};
use chrono::{DateTime, Duration, Utc};
use morre_client::{FeatureVocabulary, QueryType};
use rusqlite::{params, Connection};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Vocabulary cache manager
pub struct VocabularyCache {
    db_path: PathBuf,
    ttl_minutes: i64,
}

impl VocabularyCache {
    pub fn new(db_path: PathBuf, ttl_minutes: i64) -> Self {
        Self {
            db_path,
            ttl_minutes,
        }
    }

    /// Open the cache at `db_path` and make sure the schema exists
    pub fn open(db_path: PathBuf, ttl_minutes: i64) -> Result<Self> {
        let cache = Self::new(db_path, ttl_minutes);
        cache.init()?;
        Ok(cache)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn open_connection(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Connection::open(&self.db_path)?)
    }

    /// Initialize the cache schema
    pub fn init(&self) -> Result<()> {
        let conn = self.open_connection()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS vocabulary_cache (
                cache_key TEXT PRIMARY KEY,
                server_url TEXT NOT NULL,
                query_type TEXT NOT NULL,
                keywords_json TEXT NOT NULL,
                fetched_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE INDEX IF NOT EXISTS idx_vocabulary_cache_expires_at
            ON vocabulary_cache(expires_at)
            "#,
            [],
        )?;

        debug!(path = %self.db_path.display(), "Vocabulary cache schema initialized");
        Ok(())
    }

    /// Cached vocabulary of `query_type` on `server_url`, if still fresh
    pub fn get(&self, server_url: &str, query_type: &QueryType) -> Result<Option<FeatureVocabulary>> {
        let key = cache_key(server_url, query_type);
        let conn = self.open_connection()?;

        let row: rusqlite::Result<(String, String, String)> = conn.query_row(
            r#"
            SELECT keywords_json, fetched_at, expires_at
            FROM vocabulary_cache
            WHERE cache_key = ?1
            "#,
            params![key],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        );

        let (keywords_json, fetched_at, expires_at) = match row {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                debug!(query_type = %query_type, "Vocabulary cache miss");
                return Ok(None);
            },
            Err(e) => return Err(e.into()),
        };

        let expires_at = parse_timestamp(&expires_at)?;
        if Utc::now() > expires_at {
            debug!(query_type = %query_type, "Vocabulary cache entry expired");
            let _ = self.delete(&key);
            return Ok(None);
        }

        let keywords: Vec<String> = serde_json::from_str(&keywords_json)?;
        let fetched_at = parse_timestamp(&fetched_at)?;

        info!(query_type = %query_type, keywords = keywords.len(), "Vocabulary cache hit");
        Ok(Some(FeatureVocabulary::with_timestamp(
            query_type.clone(),
            keywords,
            fetched_at,
        )))
    }

    /// Store `vocabulary` for `server_url`, replacing any previous entry
    pub fn set(&self, server_url: &str, vocabulary: &FeatureVocabulary) -> Result<()> {
        let key = cache_key(server_url, vocabulary.query_type());
        let keywords_json = serde_json::to_string(vocabulary.keywords())?;
        let expires_at = Duration::try_minutes(self.ttl_minutes)
            .and_then(|ttl| vocabulary.fetched_at().checked_add_signed(ttl))
            .ok_or_else(|| {
                CliError::cache(format!(
                    "vocabulary TTL of {} minutes is out of range",
                    self.ttl_minutes
                ))
            })?;

        let conn = self.open_connection()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO vocabulary_cache
            (cache_key, server_url, query_type, keywords_json, fetched_at, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                key,
                server_url,
                vocabulary.query_type().as_str(),
                keywords_json,
                vocabulary.fetched_at().to_rfc3339(),
                expires_at.to_rfc3339()
            ],
        )?;

        debug!(
            query_type = %vocabulary.query_type(),
            ttl_minutes = self.ttl_minutes,
            "Cached feature vocabulary"
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let conn = self.open_connection()?;
        conn.execute("DELETE FROM vocabulary_cache WHERE cache_key = ?1", params![key])?;
        Ok(())
    }

    /// Clear all cached vocabularies
    pub fn clear(&self) -> Result<usize> {
        let conn = self.open_connection()?;
        let count = conn.execute("DELETE FROM vocabulary_cache", [])?;
        info!(count = count, "Cleared vocabulary cache");
        Ok(count)
    }

    /// Clean up expired cache entries
    pub fn cleanup_expired(&self) -> Result<usize> {
        let conn = self.open_connection()?;
        let count = conn.execute(
            "DELETE FROM vocabulary_cache WHERE expires_at < ?1",
            params![Utc::now().to_rfc3339()],
        )?;

        if count > 0 {
            debug!(count = count, "Cleaned up expired vocabulary entries");
        }
        Ok(count)
    }

    pub fn stats(&self) -> Result<CacheStats> {
        let conn = self.open_connection()?;

        let total: i64 =
            conn.query_row("SELECT COUNT(*) FROM vocabulary_cache", [], |row| row.get(0))?;

        let expired: i64 = conn.query_row(
            "SELECT COUNT(*) FROM vocabulary_cache WHERE expires_at < ?1",
            params![Utc::now().to_rfc3339()],
            |row| row.get(0),
        )?;

        Ok(CacheStats {
            total_entries: total as usize,
            expired_entries: expired as usize,
            valid_entries: (total - expired) as usize,
        })
    }
}

/// Cache key for one query type on one server
fn cache_key(server_url: &str, query_type: &QueryType) -> String {
    let mut hasher = Sha256::new();
    hasher.update(server_url.as_bytes());
    hasher.update(query_type.as_str().as_bytes());
    format!("{:x}", hasher.finalize())
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::cache(format!("Failed to parse cache timestamp: {}", e)))
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub valid_entries: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SERVER: &str = "http://localhost:7474/morre/";

    fn create_test_cache(ttl_minutes: i64) -> (VocabularyCache, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let cache = VocabularyCache::open(dir.path().join("vocabulary.db"), ttl_minutes).unwrap();
        (cache, dir)
    }

    fn person_vocabulary() -> FeatureVocabulary {
        FeatureVocabulary::new(
            QueryType::person(),
            vec!["FIRSTNAME".to_string(), "LASTNAME".to_string()],
        )
    }

    #[test]
    fn test_cache_init() {
        let (cache, _dir) = create_test_cache(60);
        assert!(cache.db_path().exists());
        assert_eq!(cache.stats().unwrap().total_entries, 0);
    }

    #[test]
    fn test_cache_set_and_get() {
        let (cache, _dir) = create_test_cache(60);
        let vocabulary = person_vocabulary();
        cache.set(SERVER, &vocabulary).unwrap();

        let cached = cache.get(SERVER, &QueryType::person()).unwrap().unwrap();
        assert_eq!(cached.keywords(), vocabulary.keywords());
        assert_eq!(cached.query_type(), &QueryType::person());
        assert_eq!(cached.fetched_at().timestamp(), vocabulary.fetched_at().timestamp());
    }

    #[test]
    fn test_cache_miss() {
        let (cache, _dir) = create_test_cache(60);
        assert!(cache.get(SERVER, &QueryType::model()).unwrap().is_none());
    }

    #[test]
    fn test_entries_are_per_server() {
        let (cache, _dir) = create_test_cache(60);
        cache.set(SERVER, &person_vocabulary()).unwrap();

        assert!(cache
            .get("http://morre.example.org/morre/", &QueryType::person())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let (cache, _dir) = create_test_cache(60);
        let stale = FeatureVocabulary::with_timestamp(
            QueryType::person(),
            vec!["LASTNAME".to_string()],
            Utc::now() - Duration::hours(2),
        );
        cache.set(SERVER, &stale).unwrap();

        assert_eq!(cache.stats().unwrap().expired_entries, 1);
        assert!(cache.get(SERVER, &QueryType::person()).unwrap().is_none());
        assert_eq!(cache.stats().unwrap().total_entries, 0);
    }

    #[test]
    fn test_cleanup_expired() {
        let (cache, _dir) = create_test_cache(60);
        cache.set(SERVER, &person_vocabulary()).unwrap();
        cache
            .set(
                SERVER,
                &FeatureVocabulary::with_timestamp(
                    QueryType::publication(),
                    vec!["TITLE".to_string()],
                    Utc::now() - Duration::days(1),
                ),
            )
            .unwrap();

        assert_eq!(cache.cleanup_expired().unwrap(), 1);
        let stats = cache.stats().unwrap();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.valid_entries, 1);
    }

    #[test]
    fn test_out_of_range_ttl_is_an_error() {
        let (cache, _dir) = create_test_cache(i64::MAX);
        let err = cache.set(SERVER, &person_vocabulary()).unwrap_err();

        assert!(matches!(err, CliError::Cache(_)));
        assert_eq!(cache.stats().unwrap().total_entries, 0);
    }

    #[test]
    fn test_cache_clear() {
        let (cache, _dir) = create_test_cache(60);
        cache.set(SERVER, &person_vocabulary()).unwrap();
        assert_eq!(cache.clear().unwrap(), 1);
        assert!(cache.get(SERVER, &QueryType::person()).unwrap().is_none());
    }

    #[test]
    fn test_cache_key_consistency() {
        let key1 = cache_key(SERVER, &QueryType::person());
        let key2 = cache_key(SERVER, &QueryType::person());
        assert_eq!(key1, key2);
        assert_ne!(key1, cache_key(SERVER, &QueryType::model()));
    }
}
