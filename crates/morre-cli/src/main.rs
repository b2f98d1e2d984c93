//! MORRE CLI - Main entry point

use clap::Parser;
use colored::Colorize;
use morre_cli::commands::{self, Session};
use morre_cli::{CacheCommand, Cli, Commands, Config, ConfigCommand};
use morre_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Pick up MORRE_* variables from a local .env file, if there is one
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Quiet by default, debug with --verbose; MORRE_LOG_* variables take precedence
    let log_config = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        })
        .output(LogOutput::Console)
        .log_file_prefix("morre-cli")
        .build();
    let log_config = log_config.clone().overlay_env().unwrap_or(log_config);

    // CLI should work without logging
    let guard = init_logging(&log_config).ok().flatten();

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, kind = ?e.morre_kind(), "Command failed");
        eprintln!("{} {}", "Error:".red().bold(), e);
        // Flush file logs; process::exit skips destructors
        drop(guard);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> morre_cli::Result<()> {
    let mut config = Config::from_env()?;
    config.set_server_url(cli.server_url.clone());
    config.set_verbose(cli.verbose);

    match &cli.command {
        Commands::Cache { command } => match command {
            CacheCommand::Clear => commands::cache::clear(&config).await,
            CacheCommand::Stats => commands::cache::stats(&config).await,
        },

        Commands::Config { command } => match command {
            ConfigCommand::Get { key } => commands::config::get(&config, key).await,
            ConfigCommand::Show => commands::config::show(&config).await,
        },

        query => {
            let session = Session::open(&config, cli.format, cli.no_validate)?;
            execute_query(&session, query).await
        },
    }
}

async fn execute_query(session: &Session, command: &Commands) -> morre_cli::Result<()> {
    match command {
        Commands::Models {
            query,
            aggregation,
            weights,
        } => commands::models::run(session, query, aggregation.as_deref(), weights.as_deref()).await,

        Commands::Features { query_type, refresh } => {
            commands::features::run(session, query_type, *refresh).await
        },

        Commands::ModelQuery {
            query_type,
            features,
        } => commands::models::feature_query(session, query_type, features).await,

        Commands::Simple {
            query_type,
            keyword,
            aggregation,
            weights,
        } => {
            commands::models::simple(
                session,
                query_type,
                keyword,
                aggregation.as_deref(),
                weights.as_deref(),
            )
            .await
        },

        Commands::Persons { features } => commands::persons::run(session, features).await,

        Commands::Publications { features } => {
            commands::publications::run(session, features).await
        },

        Commands::Annotations { query } => commands::annotations::run(session, query).await,

        Commands::Cache { .. } | Commands::Config { .. } => Ok(()),
    }
}
