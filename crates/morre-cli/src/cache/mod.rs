//! Local caches
//!
//! SQLite-backed storage for data fetched from the MORRE server.

pub mod vocabulary_cache;

pub use vocabulary_cache::{CacheStats, VocabularyCache};
