//! Result rendering
//!
//! Every query command prints its hits through [`print_results`] in the format
//! chosen with `--format`.

use crate::error::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use morre_client::QueryResult;
use serde::Serialize;

const LABEL_WIDTH: usize = 60;

/// How query results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Bordered table with identifier, label and score
    Table,
    /// One identifier per line
    Compact,
    /// Pretty-printed JSON array
    Json,
}

/// Print `results` in `format`; `what` names the result kind in messages
pub fn print_results<T>(results: &[T], format: OutputFormat, what: &str) -> Result<()>
where
    T: QueryResult + Serialize,
{
    match format {
        OutputFormat::Json => display_json(results),
        OutputFormat::Compact => {
            display_compact(results);
            Ok(())
        },
        OutputFormat::Table => {
            if results.is_empty() {
                println!("{}", format!("No {what} found").bold().red());
            } else {
                display_table(results, what);
            }
            Ok(())
        },
    }
}

fn display_compact<T: QueryResult>(results: &[T]) {
    for result in results {
        println!("{}", result.identifier());
    }
}

fn display_table<T: QueryResult>(results: &[T], what: &str) {
    println!();
    println!("{}", render_table(results));
    println!();
    println!("{} Found {} {}", "✓".green(), results.len(), what);
}

fn render_table<T: QueryResult>(results: &[T]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["#", "ID", "Name", "Score"]);

    for (rank, result) in results.iter().enumerate() {
        let label = result
            .label()
            .map(|l| truncate_string(&l, LABEL_WIDTH))
            .unwrap_or_else(|| "-".to_string());
        let score = result
            .score()
            .map(|s| format!("{s:.3}"))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            (rank + 1).to_string(),
            result.identifier().to_string(),
            label,
            score,
        ]);
    }

    table
}

fn display_json<T: Serialize>(results: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    println!("{}", json);
    Ok(())
}

/// Truncate to `max_len` characters, marking the cut with "..."
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
