//! Test connection command implementation
//!
//! Builds the database facade from the configuration file and runs the
//! round-trip probe against one database.

use crate::config::load_config;
use crate::core::{DatabaseFacade, DatabaseProvider};
use crate::domain::DbNormError;
use crate::log_connection_test;
use clap::Args;
use std::sync::Arc;

/// Arguments for the test-connection command
#[derive(Args, Debug)]
pub struct TestConnectionArgs {
    /// Database to probe (defaults to the default database)
    #[arg(short, long)]
    pub database: Option<String>,
}

impl TestConnectionArgs {
    /// Execute the test-connection command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, database = ?self.database, "Testing connection");

        let store = match load_config(config_path) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let provider = DatabaseProvider::new(DatabaseFacade::builder(store));
        let facade = match provider.get() {
            Ok(facade) => facade,
            Err(e @ DbNormError::Connection(_)) => {
                println!("❌ Failed to prepare connections");
                println!("   Error: {e}");
                return Ok(3); // Connection error exit code
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let database = self
            .database
            .clone()
            .unwrap_or_else(|| facade.normalized().default_database.clone());
        let driver = match facade.database(Some(&database)) {
            Ok(handle) => handle.driver().to_string(),
            Err(_) => "unknown".to_string(),
        };

        println!("🔌 Testing database '{database}' ({driver})");

        match facade.test_connection(Some(&database)).await {
            Ok(reachable) => {
                log_connection_test!(database, driver, reachable);
                if reachable {
                    println!("✅ Connection successful");
                } else {
                    println!("⚠️  Connected, but the probe returned no row");
                }
                Ok(0)
            }
            Err(e) => {
                log_connection_test!(database, driver, false);
                println!("❌ Connection failed");
                println!("   Error: {e}");
                Ok(3) // Connection error exit code
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> String {
        let path = dir.path().join("dbnorm.toml");
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_in_memory_sqlite_is_reachable() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[database]\ndriver = \"sqlite\"\ndatabase = \":memory:\"\n",
        );

        let args = TestConnectionArgs { database: None };
        assert_eq!(args.execute(&path).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_database_is_a_connection_failure() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[database]\ndriver = \"sqlite\"\ndatabase = \":memory:\"\n",
        );

        let args = TestConnectionArgs {
            database: Some("archive".to_string()),
        };
        assert_eq!(args.execute(&path).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_invalid_config_exit_code() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[database]\nhost = \"db1\"\n");

        let args = TestConnectionArgs { database: None };
        assert_eq!(args.execute(&path).await.unwrap(), 2);
    }
}
