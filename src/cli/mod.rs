//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for dbnorm using clap.
//!
//! Exit codes: 0 success, 2 configuration error, 3 connection failure,
//! 5 fatal error.

pub mod commands;

use clap::{Parser, Subcommand};

/// dbnorm - database connection configuration normalizer
#[derive(Parser, Debug)]
#[command(name = "dbnorm")]
#[command(version, about, long_about = None)]
#[command(author = "dbnorm Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "dbnorm.toml", env = "DBNORM_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DBNORM_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate and normalize the database configuration
    ValidateConfig(commands::validate::ValidateArgs),

    /// Probe a configured database with a round-trip query
    TestConnection(commands::test_connection::TestConnectionArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["dbnorm", "validate-config"]);
        assert_eq!(cli.config, "dbnorm.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["dbnorm", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["dbnorm", "--log-level", "debug", "init"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_test_connection() {
        let cli = Cli::parse_from(["dbnorm", "test-connection", "--database", "reports"]);
        match cli.command {
            Commands::TestConnection(args) => assert_eq!(args.database.as_deref(), Some("reports")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_init_driver() {
        let cli = Cli::parse_from(["dbnorm", "init", "--driver", "sqlite"]);
        match cli.command {
            Commands::Init(args) => assert_eq!(args.driver, "sqlite"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_init_driver() {
        assert!(Cli::try_parse_from(["dbnorm", "init", "--driver", "oracle"]).is_err());
    }
}
