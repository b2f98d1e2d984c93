//! MORRE CLI Library
//!
//! Command-line interface for querying a MORRE model repository server.
//!
//! # Overview
//!
//! - **Model search**: free text or aggregated (`morre models`), structured
//!   (`morre model-query`) and single keyword (`morre simple`)
//! - **Person, publication and annotation search** (`morre persons`,
//!   `morre publications`, `morre annotations`)
//! - **Feature discovery**: list the keywords a query type accepts
//!   (`morre features`), cached locally between runs
//! - **Cache and configuration**: `morre cache`, `morre config`

pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};
pub use output::OutputFormat;

use clap::{Parser, Subcommand};

/// MORRE - model repository query client
#[derive(Parser, Debug)]
#[command(name = "morre")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Server URL
    #[arg(
        long,
        env = "MORRE_SERVER_URL",
        default_value = config::DEFAULT_SERVER_URL,
        global = true
    )]
    pub server_url: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Send feature sets without checking them against the server's vocabulary
    #[arg(long, global = true)]
    pub no_validate: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Free-text model search
    Models {
        /// Search terms (joined with spaces)
        #[arg(required = true)]
        query: Vec<String>,

        /// Server-side aggregation algorithm
        #[arg(short, long)]
        aggregation: Option<String>,

        /// Ranker weights passed to the aggregation
        #[arg(short, long, requires = "aggregation")]
        weights: Option<String>,
    },

    /// List the feature keywords a query type accepts
    Features {
        /// Query type (e.g. model_query, person_query)
        query_type: String,

        /// Ignore the local cache and ask the server
        #[arg(short, long)]
        refresh: bool,
    },

    /// Structured model search
    ModelQuery {
        /// Query type
        query_type: String,

        /// Feature constraint as KEY=VALUE (repeatable)
        #[arg(short, long = "feature", value_name = "KEY=VALUE", required = true)]
        features: Vec<String>,
    },

    /// Single-keyword model search
    Simple {
        /// Query type
        query_type: String,

        /// Keyword to search for
        keyword: String,

        /// Server-side aggregation algorithm
        #[arg(short, long)]
        aggregation: Option<String>,

        /// Ranker weights passed to the aggregation
        #[arg(short, long, requires = "aggregation")]
        weights: Option<String>,
    },

    /// Search persons by feature constraints
    Persons {
        /// Feature constraint as KEY=VALUE (repeatable)
        #[arg(short, long = "feature", value_name = "KEY=VALUE", required = true)]
        features: Vec<String>,
    },

    /// Search publications by feature constraints
    Publications {
        /// Feature constraint as KEY=VALUE (repeatable)
        #[arg(short, long = "feature", value_name = "KEY=VALUE", required = true)]
        features: Vec<String>,
    },

    /// Free-text annotation search
    Annotations {
        /// Search terms (joined with spaces)
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Manage the local vocabulary cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Remove all cached vocabularies
    Clear,

    /// Show cache statistics
    Stats,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Get configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show all configuration
    Show,
}
