//! `morre annotations` command implementation

use crate::commands::{join_query, Session};
use crate::error::Result;
use crate::output::print_results;

pub async fn run(session: &Session, query: &[String]) -> Result<()> {
    let annotations = session
        .client()
        .do_annotation_query(&join_query(query))
        .await?;

    print_results(&annotations, session.format(), "annotations")
}
