//! `morre models`, `morre model-query` and `morre simple`
//!
//! The three ways of searching for models.

use crate::commands::{join_query, parse_features, Session};
use crate::error::Result;
use crate::output::print_results;
use morre_client::QueryType;
use tracing::debug;

/// Free-text search, aggregated when `aggregation` is given
pub async fn run(
    session: &Session,
    query: &[String],
    aggregation: Option<&str>,
    weights: Option<&str>,
) -> Result<()> {
    let query = join_query(query);
    debug!(query = %query, aggregation = ?aggregation, "Starting model search");

    let models = match aggregation {
        Some(aggregation) => {
            session
                .client()
                .aggregated_model_query(&query, aggregation, weights.unwrap_or_default())
                .await?
        },
        None => session.client().model_query(&query).await?,
    };

    print_results(&models, session.format(), "models")
}

/// Structured search with `KEY=VALUE` constraints
pub async fn feature_query(session: &Session, query_type: &str, features: &[String]) -> Result<()> {
    let query_type = QueryType::new(query_type)?;
    let features = parse_features(features)?;

    session.prime_vocabulary(&query_type);
    let result = session
        .client()
        .do_model_query(query_type.as_str(), &features)
        .await;
    session.persist_vocabulary(&query_type);

    print_results(&result?, session.format(), "models")
}

/// Single-keyword search, aggregated when `aggregation` is given
pub async fn simple(
    session: &Session,
    query_type: &str,
    keyword: &str,
    aggregation: Option<&str>,
    weights: Option<&str>,
) -> Result<()> {
    let models = match aggregation {
        Some(aggregation) => {
            session
                .client()
                .do_simple_aggregated_model_query(
                    query_type,
                    keyword,
                    aggregation,
                    weights.unwrap_or_default(),
                )
                .await?
        },
        None => {
            session
                .client()
                .do_simple_model_query(query_type, keyword)
                .await?
        },
    };

    print_results(&models, session.format(), "models")
}
