//! Feature sets and feature vocabularies
//!
//! A [`FeatureSet`] carries the constraints of a structured query, keyed by
//! server-defined feature keywords. The keywords valid for a query type are
//! published by MORRE (`get_query_features`) and captured client-side as a
//! [`FeatureVocabulary`] snapshot, which can check a feature set, or build one
//! keyword by keyword, before anything is sent.
//!
//! ```
//! use morre_client::{FeatureSet, FeatureVocabulary, QueryType};
//!
//! let vocabulary = FeatureVocabulary::new(
//!     QueryType::person(),
//!     vec!["FIRSTNAME".to_string(), "LASTNAME".to_string()],
//! );
//!
//! let features = vocabulary
//!     .builder()
//!     .feature("LASTNAME", "Teusink")?
//!     .build();
//! assert_eq!(features.get("LASTNAME"), Some(&["Teusink".to_string()][..]));
//!
//! let mut unchecked = FeatureSet::new();
//! unchecked.insert("SHOE_SIZE", "42");
//! assert!(vocabulary.validate(&unchecked).is_err());
//! # Ok::<(), morre_client::MorreError>(())
//! ```

use crate::error::{MorreError, Result};
use crate::types::QueryType;
use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered keyword -> values mapping used as query constraints.
///
/// Keys keep their insertion order on the wire. A key carries one or more
/// values; single-valued keys serialize as a plain string, multi-valued keys
/// as an array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    entries: Vec<(String, Vec<String>)>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to the single `value`, replacing any existing values.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(idx) => self.entries[idx].1 = vec![value],
            None => self.entries.push((key, vec![value])),
        }
        self
    }

    /// Append `value` to the values of `key`, creating the key if needed.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(idx) => self.entries[idx].1.push(value),
            None => self.entries.push((key, vec![value])),
        }
        self
    }

    /// Consuming form of [`FeatureSet::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.position(key).map(|idx| self.entries.remove(idx).1)
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.position(key).map(|idx| self.entries[idx].1.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keywords
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl<K, V> FromIterator<(K, V)> for FeatureSet
where
    K: Into<String>,
    V: Into<String>,
{
    /// Repeated keys accumulate values.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = FeatureSet::new();
        for (key, value) in iter {
            set.push(key, value);
        }
        set
    }
}

impl Serialize for FeatureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            match values.as_slice() {
                [single] => map.serialize_entry(key, single)?,
                many => map.serialize_entry(key, many)?,
            }
        }
        map.end()
    }
}

/// Snapshot of the feature keywords MORRE accepts for one query type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVocabulary {
    query_type: QueryType,
    /// Keywords in server order
    keywords: Vec<String>,
    fetched_at: DateTime<Utc>,
}

impl FeatureVocabulary {
    /// Snapshot taken now
    pub fn new(query_type: QueryType, keywords: Vec<String>) -> Self {
        Self::with_timestamp(query_type, keywords, Utc::now())
    }

    pub fn with_timestamp(
        query_type: QueryType,
        keywords: Vec<String>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let mut seen = HashSet::new();
        let keywords = keywords
            .into_iter()
            .filter(|k| seen.insert(k.clone()))
            .collect();

        Self {
            query_type,
            keywords,
            fetched_at,
        }
    }

    pub fn query_type(&self) -> &QueryType {
        &self.query_type
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Reject the first keyword in `features` that is not part of this vocabulary.
    pub fn validate(&self, features: &FeatureSet) -> Result<()> {
        match features.keys().find(|key| !self.contains(key)) {
            Some(unknown) => Err(MorreError::unknown_feature(self.query_type.as_str(), unknown)),
            None => Ok(()),
        }
    }

    /// Start a feature set whose keywords are checked as they are added.
    pub fn builder(&self) -> FeatureSetBuilder<'_> {
        FeatureSetBuilder {
            vocabulary: self,
            features: FeatureSet::new(),
        }
    }
}

/// Builds a [`FeatureSet`] restricted to one vocabulary
#[derive(Debug)]
pub struct FeatureSetBuilder<'a> {
    vocabulary: &'a FeatureVocabulary,
    features: FeatureSet,
}

impl FeatureSetBuilder<'_> {
    /// Add a value for `keyword`. Repeating a keyword adds another value.
    pub fn feature(mut self, keyword: &str, value: impl Into<String>) -> Result<Self> {
        if !self.vocabulary.contains(keyword) {
            return Err(MorreError::unknown_feature(
                self.vocabulary.query_type.as_str(),
                keyword,
            ));
        }
        self.features.push(keyword, value);
        Ok(self)
    }

    pub fn build(self) -> FeatureSet {
        self.features
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::{ClientError, ErrorKind};
    use serde_json::json;

    fn person_vocabulary() -> FeatureVocabulary {
        FeatureVocabulary::new(
            QueryType::person(),
            vec![
                "FIRSTNAME".to_string(),
                "LASTNAME".to_string(),
                "EMAIL".to_string(),
            ],
        )
    }

    #[test]
    fn test_insert_replaces_and_push_appends() {
        let mut set = FeatureSet::new();
        set.insert("NAME", "glycolysis").insert("NAME", "gluconeogenesis");
        assert_eq!(set.get("NAME").unwrap(), ["gluconeogenesis".to_string()]);

        set.push("NAME", "glycolysis");
        assert_eq!(set.get("NAME").unwrap().len(), 2);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_serialization_preserves_insertion_order() {
        let set = FeatureSet::new()
            .with("ZETA", "1")
            .with("ALPHA", "2")
            .with("MIDDLE", "3");

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"ZETA":"1","ALPHA":"2","MIDDLE":"3"}"#);
    }

    #[test]
    fn test_multi_valued_keys_serialize_as_arrays() {
        let set: FeatureSet = [("AUTHOR", "Teusink"), ("AUTHOR", "Westerhoff"), ("YEAR", "2000")]
            .into_iter()
            .collect();

        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!({"AUTHOR": ["Teusink", "Westerhoff"], "YEAR": "2000"})
        );
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let mut set = FeatureSet::new().with("A", "1").with("B", "2").with("C", "3");
        assert_eq!(set.remove("B"), Some(vec!["2".to_string()]));
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["A", "C"]);
        assert!(set.remove("B").is_none());
    }

    #[test]
    fn test_vocabulary_deduplicates_keywords() {
        let vocab = FeatureVocabulary::new(
            QueryType::model(),
            vec!["NAME".to_string(), "NAME".to_string(), "AUTHOR".to_string()],
        );
        assert_eq!(vocab.keywords(), ["NAME".to_string(), "AUTHOR".to_string()]);
    }

    #[test]
    fn test_validate_accepts_vocabulary_keywords() {
        let vocab = person_vocabulary();
        let set: FeatureSet = vocab.keywords().iter().map(|k| (k.clone(), "x")).collect();
        assert!(vocab.validate(&set).is_ok());
    }

    #[test]
    fn test_validate_reports_unknown_keyword() {
        let vocab = person_vocabulary();
        let set = FeatureSet::new().with("LASTNAME", "Teusink").with("lastname", "Teusink");

        let err = vocab.validate(&set).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Client);
        match err {
            MorreError::Client(ClientError::UnknownFeature { query_type, keyword }) => {
                assert_eq!(query_type, "person_query");
                assert_eq!(keyword, "lastname");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_builder_rejects_unknown_keyword() {
        let vocab = person_vocabulary();
        let result = vocab.builder().feature("FIRSTNAME", "Bas").and_then(|b| b.feature("ORCID", "0000"));
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_accumulates_values() {
        let vocab = person_vocabulary();
        let set = vocab
            .builder()
            .feature("LASTNAME", "Teusink")
            .unwrap()
            .feature("LASTNAME", "Snoep")
            .unwrap()
            .build();
        assert_eq!(set.get("LASTNAME").unwrap().len(), 2);
    }
}
