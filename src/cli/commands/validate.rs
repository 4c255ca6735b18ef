//! Validate config command implementation
//!
//! This module implements the `validate-config` command: it loads the
//! configuration file, runs the validator and the transformer, and prints
//! the normalized connections. No connection is opened.

use crate::config::{load_config, save_section, ConfigStore};
use crate::core::facade::{DATABASE_KEY, ORM_KEY};
use crate::core::{register_orm_defaults, transformer, validator, NormalizedConfig};
use crate::domain::DbNormError;
use clap::Args;
use serde_json::Value;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Write the default [orm] block into the file when it has none
    #[arg(long)]
    pub write_defaults: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let store = match load_config(config_path) {
            Ok(store) => {
                println!("✅ Configuration file loaded successfully");
                store
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let raw = store.get(DATABASE_KEY).unwrap_or(Value::Null);
        let normalized = match normalize(&raw) {
            Ok(normalized) => normalized,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print_summary(&normalized);

        if self.write_defaults {
            let base_dir = std::env::current_dir()?;
            let registered = register_orm_defaults(&store, &base_dir)?;
            let written = match store.get(ORM_KEY) {
                Some(orm) if registered => save_section(config_path, ORM_KEY, &orm)?,
                _ => false,
            };
            if written {
                println!("✅ Default [{ORM_KEY}] block written to {config_path}");
            } else {
                println!("ℹ️  [{ORM_KEY}] block already present, nothing written");
            }
            println!();
        }

        Ok(0)
    }
}

fn normalize(raw: &Value) -> Result<NormalizedConfig, DbNormError> {
    let validated = validator::validate(raw)?;
    tracing::debug!(shape = ?validated.kind(), "Detected configuration shape");
    Ok(transformer::transform(&validated)?)
}

fn print_summary(normalized: &NormalizedConfig) {
    println!("Configuration Summary:");
    println!("  Default Database: {}", normalized.default_database);
    println!("  Databases:");
    for (database, connection) in &normalized.databases {
        println!("    {database} -> {connection}");
    }
    println!("  Connections:");
    for (name, spec) in &normalized.connections {
        println!("    {name}: {}", spec.descriptor());
        if !spec.username().is_empty() {
            println!("      Username: {}", spec.username());
        }
        if !spec.options().is_empty() {
            println!("      Options: {}", Value::Object(spec.options().clone()));
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config_str, ENV_MUTEX};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const SQLITE_CONFIG: &str = r#"
[database]
driver = "sqlite"
database = "/data/app.db"
"#;

    #[test]
    fn test_normalize_reports_rule_violation() {
        let err = normalize(&json!({"driver": "oracle"})).unwrap_err();
        assert!(err.to_string().contains("oracle"));
    }

    #[tokio::test]
    async fn test_execute_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dbnorm.toml");
        fs::write(&path, SQLITE_CONFIG).unwrap();

        let args = ValidateArgs {
            write_defaults: false,
        };
        assert_eq!(args.execute(&path.to_string_lossy()).await.unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), SQLITE_CONFIG);
    }

    #[tokio::test]
    async fn test_execute_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dbnorm.toml");
        fs::write(&path, "[database]\ndriver = \"pgsql\"\nhost = \"db1\"\n").unwrap();

        let args = ValidateArgs {
            write_defaults: false,
        };
        assert_eq!(args.execute(&path.to_string_lossy()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_execute_missing_file() {
        let args = ValidateArgs {
            write_defaults: false,
        };
        assert_eq!(args.execute("no-such-dbnorm.toml").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_write_defaults_keeps_password_placeholder() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dbnorm.toml");
        fs::write(
            &path,
            r#"[database]
driver = "pgsql"
host = "db1"
database = "app"
username = "app"
password = "${DBNORM_TEST_VALIDATE_PASSWORD}"
"#,
        )
        .unwrap();

        let exit_code = {
            let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            std::env::set_var("DBNORM_TEST_VALIDATE_PASSWORD", "hunter2");
            let args = ValidateArgs {
                write_defaults: true,
            };
            let exit_code = args.execute(&path.to_string_lossy()).await.unwrap();
            std::env::remove_var("DBNORM_TEST_VALIDATE_PASSWORD");
            exit_code
        };
        assert_eq!(exit_code, 0);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("${DBNORM_TEST_VALIDATE_PASSWORD}"));
        assert!(!written.contains("hunter2"));
        assert!(written.contains("cycle_migrations"));
    }

    #[tokio::test]
    async fn test_execute_writes_defaults_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dbnorm.toml");
        fs::write(&path, SQLITE_CONFIG).unwrap();

        let args = ValidateArgs {
            write_defaults: true,
        };
        assert_eq!(args.execute(&path.to_string_lossy()).await.unwrap(), 0);

        let written = fs::read_to_string(&path).unwrap();
        let store = load_config_str(&written).unwrap();
        assert_eq!(store.get("orm.migrations.table"), Some(json!("cycle_migrations")));
        assert_eq!(store.get("database.driver"), Some(json!("sqlite")));

        assert_eq!(args.execute(&path.to_string_lossy()).await.unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), written);
    }
}
