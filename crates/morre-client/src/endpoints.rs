//! MORRE query endpoint paths
//!
//! Paths are relative to the configured base URL, which always ends in `/`.

use crate::error::{MorreError, Result};
use url::Url;

pub const MODEL_QUERY: &str = "query/model_query";
pub const AGGREGATED_MODEL_QUERY: &str = "query/aggregated_model_query";
pub const GET_QUERY_FEATURES: &str = "query/get_query_features";
pub const FEATURE_MODEL_QUERY: &str = "query/feature_model_query";
pub const SIMPLE_MODEL_QUERY: &str = "query/simple_model_query";
pub const SIMPLE_AGGREGATED_MODEL_QUERY: &str = "query/simple_aggregated_model_query";
pub const PERSON_QUERY: &str = "query/person_query";
pub const PUBLICATION_QUERY: &str = "query/publication_query";
pub const ANNOTATION_QUERY: &str = "query/annotation_query";

/// Build the absolute URL of `path` under `base_url`
pub fn endpoint_url(base_url: &Url, path: &str) -> Result<Url> {
    base_url
        .join(path)
        .map_err(|e| MorreError::invalid_url(format!("{base_url}{path}"), e.to_string()))
}
