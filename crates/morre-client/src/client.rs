//! HTTP client for the MORRE query service
//!
//! [`MorreClient`] issues exactly one request per query call and maps every
//! outcome onto the three error tiers in [`crate::error`]. Feature-based
//! queries are checked against a per-query-type vocabulary snapshot first
//! (fetched once, then reused), so unknown keywords fail locally.

use crate::config::ClientConfig;
use crate::endpoints;
use crate::error::{ClientError, CommunicationError, MorreError, Result, ServiceError};
use crate::features::{FeatureSet, FeatureVocabulary};
use crate::types::{
    AggregatedRequest, AnnotationResult, ApiResponse, ErrorBody, FeatureQueryRequest,
    KeywordRequest, ModelResult, PersonResult, PublicationResult, QueryFeaturesRequest,
    QueryType, SimpleModelRequest,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::Mutex as FetchLock;
use tracing::{debug, info, warn};
use url::Url;

type VocabularyMap = HashMap<QueryType, Arc<FeatureVocabulary>>;
type FetchLocks = HashMap<QueryType, Arc<FetchLock<()>>>;

/// Client for one MORRE server.
///
/// Cheap to clone; clones share the connection pool and the vocabulary
/// snapshots. Calls are independent and may run concurrently; concurrent
/// misses on the same vocabulary wait for a single fetch.
///
/// ```no_run
/// use morre_client::MorreClient;
///
/// # async fn run() -> morre_client::Result<()> {
/// let client = MorreClient::new("http://localhost:7474/morre/")?;
/// for model in client.model_query("glycolysis").await? {
///     println!("{}", model.model_id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MorreClient {
    http: Client,
    config: Arc<ClientConfig>,
    vocabularies: Arc<RwLock<VocabularyMap>>,
    fetch_locks: Arc<Mutex<FetchLocks>>,
}

impl std::fmt::Debug for MorreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorreClient")
            .field("base_url", &self.config.base_url().as_str())
            .field("timeout", &self.config.timeout())
            .field("validate_features", &self.config.validate_features())
            .finish_non_exhaustive()
    }
}

impl MorreClient {
    /// Create a client for `base_url` with default settings
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(base_url)?)
    }

    /// Create from environment variables (see [`ClientConfig::from_env`])
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| MorreError::Client(ClientError::HttpSetup(e)))?;

        Ok(Self {
            http,
            config: Arc::new(config),
            vocabularies: Arc::new(RwLock::new(HashMap::new())),
            fetch_locks: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        self.config.base_url()
    }

    // ========================================================================
    // Model queries
    // ========================================================================

    /// Free-text model search.
    ///
    /// An empty or whitespace-only `query` is a client error.
    pub async fn model_query(&self, query: &str) -> Result<Vec<ModelResult>> {
        let keyword = non_blank("query", query)?;

        let models: Vec<ModelResult> = self
            .post(endpoints::MODEL_QUERY, &KeywordRequest { keyword })
            .await?;

        info!(query = %keyword, results = models.len(), "Model query finished");
        Ok(models)
    }

    /// Model search with server-side aggregation and ranking.
    ///
    /// `aggregation_type` selects the aggregation algorithm and
    /// `ranker_weights` is passed through untouched; both are interpreted by
    /// the server.
    pub async fn aggregated_model_query(
        &self,
        query: &str,
        aggregation_type: &str,
        ranker_weights: &str,
    ) -> Result<Vec<ModelResult>> {
        let keyword = non_blank("query", query)?;
        let aggregation_type = non_blank("aggregation type", aggregation_type)?;

        let request = AggregatedRequest {
            keyword,
            aggregation_type,
            rankers_weights: ranker_weights,
        };
        let models: Vec<ModelResult> = self
            .post(endpoints::AGGREGATED_MODEL_QUERY, &request)
            .await?;

        info!(
            query = %keyword,
            aggregation_type = %aggregation_type,
            results = models.len(),
            "Aggregated model query finished"
        );
        Ok(models)
    }

    /// Structured model search of the given query type.
    pub async fn do_model_query(
        &self,
        query_type: &str,
        features: &FeatureSet,
    ) -> Result<Vec<ModelResult>> {
        let query_type = QueryType::new(query_type)?;
        self.check_features(&query_type, features).await?;

        let request = FeatureQueryRequest {
            query_type: Some(query_type.as_str()),
            features,
        };
        let models: Vec<ModelResult> = self
            .post(endpoints::FEATURE_MODEL_QUERY, &request)
            .await?;

        info!(
            query_type = %query_type,
            features = features.len(),
            results = models.len(),
            "Feature model query finished"
        );
        Ok(models)
    }

    /// Single-keyword model search.
    ///
    /// Not every query type supports single-keyword search. Check the type
    /// first; an unsupported type is rejected by the server and surfaces as a
    /// service error, never as an empty list.
    pub async fn do_simple_model_query(
        &self,
        query_type: &str,
        keyword: &str,
    ) -> Result<Vec<ModelResult>> {
        let query_type = QueryType::new(query_type)?;
        let keyword = non_blank("keyword", keyword)?;

        let request = SimpleModelRequest {
            query_type: query_type.as_str(),
            keyword,
            aggregation_type: None,
            rankers_weights: None,
        };
        let models: Vec<ModelResult> = self.post(endpoints::SIMPLE_MODEL_QUERY, &request).await?;

        info!(query_type = %query_type, keyword = %keyword, results = models.len(), "Simple model query finished");
        Ok(models)
    }

    /// [`do_simple_model_query`](Self::do_simple_model_query) with server-side aggregation
    pub async fn do_simple_aggregated_model_query(
        &self,
        query_type: &str,
        keyword: &str,
        aggregation_type: &str,
        rankers_weights: &str,
    ) -> Result<Vec<ModelResult>> {
        let query_type = QueryType::new(query_type)?;
        let keyword = non_blank("keyword", keyword)?;
        let aggregation_type = non_blank("aggregation type", aggregation_type)?;

        let request = SimpleModelRequest {
            query_type: query_type.as_str(),
            keyword,
            aggregation_type: Some(aggregation_type),
            rankers_weights: Some(rankers_weights),
        };
        let models: Vec<ModelResult> = self
            .post(endpoints::SIMPLE_AGGREGATED_MODEL_QUERY, &request)
            .await?;

        info!(
            query_type = %query_type,
            keyword = %keyword,
            aggregation_type = %aggregation_type,
            results = models.len(),
            "Simple aggregated model query finished"
        );
        Ok(models)
    }

    // ========================================================================
    // Person, publication and annotation queries
    // ========================================================================

    pub async fn do_person_query(&self, features: &FeatureSet) -> Result<Vec<PersonResult>> {
        let query_type = QueryType::person();
        self.check_features(&query_type, features).await?;

        let request = FeatureQueryRequest {
            query_type: None,
            features,
        };
        let persons: Vec<PersonResult> = self.post(endpoints::PERSON_QUERY, &request).await?;

        info!(features = features.len(), results = persons.len(), "Person query finished");
        Ok(persons)
    }

    pub async fn do_publication_query(
        &self,
        features: &FeatureSet,
    ) -> Result<Vec<PublicationResult>> {
        let query_type = QueryType::publication();
        self.check_features(&query_type, features).await?;

        let request = FeatureQueryRequest {
            query_type: None,
            features,
        };
        let publications: Vec<PublicationResult> =
            self.post(endpoints::PUBLICATION_QUERY, &request).await?;

        info!(features = features.len(), results = publications.len(), "Publication query finished");
        Ok(publications)
    }

    /// Free-text annotation search
    pub async fn do_annotation_query(&self, query: &str) -> Result<Vec<AnnotationResult>> {
        let keyword = non_blank("query", query)?;

        let annotations: Vec<AnnotationResult> = self
            .post(endpoints::ANNOTATION_QUERY, &KeywordRequest { keyword })
            .await?;

        info!(query = %keyword, results = annotations.len(), "Annotation query finished");
        Ok(annotations)
    }

    // ========================================================================
    // Feature vocabularies
    // ========================================================================

    /// Fetch the feature keywords valid for `query_type`.
    ///
    /// Always asks the server and replaces the cached snapshot for that type.
    pub async fn query_features(&self, query_type: &str) -> Result<Vec<String>> {
        let query_type = QueryType::new(query_type)?;
        let lock = self.fetch_lock(&query_type);
        let _fetching = lock.lock().await;
        let vocabulary = self.fetch_vocabulary(query_type).await?;
        Ok(vocabulary.keywords().to_vec())
    }

    /// Cached vocabulary for `query_type`, fetched on first use
    pub async fn vocabulary(&self, query_type: &str) -> Result<Arc<FeatureVocabulary>> {
        let query_type = QueryType::new(query_type)?;
        self.vocabulary_for(&query_type).await
    }

    /// Cached vocabulary for `query_type` without touching the network
    pub fn cached_vocabulary(&self, query_type: &str) -> Option<Arc<FeatureVocabulary>> {
        let query_type = QueryType::new(query_type).ok()?;
        self.snapshot(&query_type)
    }

    /// Seed the cache with a snapshot obtained elsewhere (e.g. from disk)
    pub fn prime_vocabulary(&self, vocabulary: FeatureVocabulary) {
        debug!(
            query_type = %vocabulary.query_type(),
            keywords = vocabulary.keywords().len(),
            "Priming feature vocabulary"
        );
        self.write_vocabularies()
            .insert(vocabulary.query_type().clone(), Arc::new(vocabulary));
    }

    pub fn clear_vocabularies(&self) {
        self.write_vocabularies().clear();
    }

    async fn vocabulary_for(&self, query_type: &QueryType) -> Result<Arc<FeatureVocabulary>> {
        if let Some(vocabulary) = self.snapshot(query_type) {
            return Ok(vocabulary);
        }

        // Whoever holds the lock fetches; the others find the snapshot after it.
        // A failed fetch is not cached, so the next waiter tries again.
        let lock = self.fetch_lock(query_type);
        let _fetching = lock.lock().await;
        if let Some(vocabulary) = self.snapshot(query_type) {
            debug!(query_type = %query_type, "Vocabulary fetched by a concurrent caller");
            return Ok(vocabulary);
        }
        self.fetch_vocabulary(query_type.clone()).await
    }

    fn snapshot(&self, query_type: &QueryType) -> Option<Arc<FeatureVocabulary>> {
        self.read_vocabularies().get(query_type).cloned()
    }

    fn fetch_lock(&self, query_type: &QueryType) -> Arc<FetchLock<()>> {
        let mut locks = self.fetch_locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(query_type.clone()).or_default())
    }

    async fn fetch_vocabulary(&self, query_type: QueryType) -> Result<Arc<FeatureVocabulary>> {
        let request = QueryFeaturesRequest {
            query_type: query_type.as_str(),
        };
        let keywords: Vec<String> = self.post(endpoints::GET_QUERY_FEATURES, &request).await?;

        if keywords.is_empty() {
            warn!(query_type = %query_type, "Server returned an empty feature vocabulary");
        }
        debug!(query_type = %query_type, keywords = keywords.len(), "Fetched feature vocabulary");

        let vocabulary = Arc::new(FeatureVocabulary::new(query_type.clone(), keywords));
        self.write_vocabularies()
            .insert(query_type, Arc::clone(&vocabulary));
        Ok(vocabulary)
    }

    /// Reject empty feature sets and, when enabled, unknown keywords
    async fn check_features(&self, query_type: &QueryType, features: &FeatureSet) -> Result<()> {
        if features.is_empty() {
            return Err(MorreError::Client(ClientError::EmptyFeatureSet(
                query_type.to_string(),
            )));
        }

        if self.config.validate_features() {
            self.vocabulary_for(query_type).await?.validate(features)?;
        }

        Ok(())
    }

    fn read_vocabularies(&self) -> std::sync::RwLockReadGuard<'_, VocabularyMap> {
        self.vocabularies.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_vocabularies(&self) -> std::sync::RwLockWriteGuard<'_, VocabularyMap> {
        self.vocabularies.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// POST `body` to `path` and unwrap the response envelope
    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = endpoints::endpoint_url(self.config.base_url(), path)?;
        debug!(endpoint = %path, "Sending MORRE request");

        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| CommunicationError::from_reqwest(url.as_str(), e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CommunicationError::from_reqwest(url.as_str(), e))?;

        if !status.is_success() {
            let error = service_error_from_body(path, status.as_u16(), &bytes);
            warn!(endpoint = %path, status = status.as_u16(), message = %error.message, "MORRE rejected request");
            return Err(error.into());
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes).map_err(|source| {
            CommunicationError::MalformedResponse {
                url: url.to_string(),
                source,
            }
        })?;

        if !envelope.success {
            let message = envelope
                .error
                .unwrap_or_else(|| "request failed without an error message".to_string());
            warn!(endpoint = %path, message = %message, "MORRE reported failure");
            return Err(ServiceError::new(path, Some(status.as_u16()), message).into());
        }

        envelope.data.ok_or_else(|| {
            CommunicationError::MissingData {
                url: url.to_string(),
            }
            .into()
        })
    }
}

/// Build a service error from a non-2xx body, falling back to the status line
fn service_error_from_body(path: &str, status: u16, body: &[u8]) -> ServiceError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"));

    ServiceError::new(path, Some(status), message)
}

/// Trim and reject empty string arguments
fn non_blank<'a>(name: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(MorreError::empty_argument(name))
    } else {
        Ok(trimmed)
    }
}
