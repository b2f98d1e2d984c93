//! `morre persons` command implementation

use crate::commands::{parse_features, Session};
use crate::error::Result;
use crate::output::print_results;
use morre_client::QueryType;

/// Search persons matching the `KEY=VALUE` constraints
pub async fn run(session: &Session, features: &[String]) -> Result<()> {
    let features = parse_features(features)?;
    let query_type = QueryType::person();

    session.prime_vocabulary(&query_type);
    let result = session.client().do_person_query(&features).await;
    session.persist_vocabulary(&query_type);

    print_results(&result?, session.format(), "persons")
}
