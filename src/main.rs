// dbnorm - Database connection configuration normalizer
// Copyright (c) 2025 dbnorm Contributors
// Licensed under the MIT License

use clap::Parser;
use dbnorm::cli::{Cli, Commands};
use dbnorm::config::{load_config, logging_config, LoggingConfig};
use dbnorm::log_error_with_context;
use dbnorm::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The [logging] section applies when the config file is readable; the
    // commands report load errors themselves.
    let logging = load_config(&cli.config)
        .and_then(|store| logging_config(&store))
        .unwrap_or_else(|_| LoggingConfig::default());
    let log_level = cli.log_level.as_deref().unwrap_or(&logging.level);

    let guard = match init_logging(log_level, &logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "dbnorm starting");

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            log_error_with_context!(e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Init(args) => args.execute().await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::TestConnection(args) => args.execute(&cli.config).await,
    }
}
