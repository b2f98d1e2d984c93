//! `morre features` command implementation
//!
//! Lists the feature keywords a query type accepts. Answers come from the
//! local vocabulary cache unless it is empty, stale or `--refresh` is given.

use crate::commands::Session;
use crate::error::Result;
use crate::output::OutputFormat;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use morre_client::{FeatureVocabulary, QueryType};
use std::sync::Arc;
use tracing::debug;

pub async fn run(session: &Session, query_type: &str, refresh: bool) -> Result<()> {
    let query_type = QueryType::new(query_type)?;

    let from_cache = !refresh && session.prime_vocabulary(&query_type);
    let vocabulary = if from_cache {
        debug!(query_type = %query_type, "Using cached vocabulary");
        session.client().vocabulary(query_type.as_str()).await?
    } else {
        session.client().query_features(query_type.as_str()).await?;
        session.persist_vocabulary(&query_type);
        session.client().vocabulary(query_type.as_str()).await?
    };

    display(&vocabulary, session.format(), from_cache)
}

fn display(vocabulary: &Arc<FeatureVocabulary>, format: OutputFormat, from_cache: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(vocabulary.as_ref())?);
        },
        OutputFormat::Compact => {
            for keyword in vocabulary.keywords() {
                println!("{}", keyword);
            }
        },
        OutputFormat::Table => {
            if vocabulary.keywords().is_empty() {
                println!(
                    "{}",
                    format!("No features published for {}", vocabulary.query_type())
                        .bold()
                        .red()
                );
                return Ok(());
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec!["Feature"]);
            for keyword in vocabulary.keywords() {
                table.add_row(vec![keyword.as_str()]);
            }

            println!();
            println!("{}", table);
            println!();
            println!(
                "{} {} features for {} ({} {})",
                "✓".green(),
                vocabulary.keywords().len(),
                vocabulary.query_type().to_string().cyan(),
                if from_cache { "cached" } else { "fetched" },
                vocabulary.fetched_at().format("%Y-%m-%d %H:%M UTC")
            );
        },
    }

    Ok(())
}
