//! Integration tests for configuration loading
//!
//! Note: Tests that modify environment variables hold `ENV_MUTEX` to avoid
//! interference between tests.

use dbnorm::config::{load_config, logging_config, save_section, ConfigStore};
use dbnorm::core::{transformer, validator};
use dbnorm::domain::DbNormError;
use secrecy::ExposeSecret;
use serde_json::json;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("DBNORM__DATABASE__CONNECTIONS__MAIN__HOST");
    std::env::remove_var("DBNORM__DATABASE__CONNECTIONS__MAIN__PORT");
    std::env::remove_var("DBNORM__ORM__CACHE__ENABLE");
    std::env::remove_var("TEST_DBNORM_PG_PASSWORD");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const MULTI_CONFIG: &str = r#"
[database]
default = "default"

[database.databases.default]
connection = "main"

[database.databases.analytics]
connection = "warehouse"

[database.connections.main]
driver = "pgsql"
host = "db1"
database = "app"
username = "app"
password = "${TEST_DBNORM_PG_PASSWORD}"

[database.connections.main.options]
max_connections = 4

[database.connections.warehouse]
driver = "sqlite"
database = "/data/warehouse.db"

[logging]
level = "debug"
local_enabled = false
"#;

#[test]
fn test_load_multi_connection_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_DBNORM_PG_PASSWORD", "from-env");

    let file = write_config(MULTI_CONFIG);
    let store = load_config(file.path()).unwrap();

    let raw = store.get("database").unwrap();
    let normalized = transformer::transform(&validator::validate(&raw).unwrap()).unwrap();

    assert_eq!(normalized.default_database, "default");
    assert_eq!(normalized.databases["analytics"], "warehouse");
    let main = &normalized.connections["main"];
    assert_eq!(main.descriptor(), "pgsql:host=db1;port=5432;dbname=app;charset=utf8");
    assert_eq!(main.password().expose_secret().as_str(), "from-env");
    assert_eq!(main.option_u64("max_connections"), Some(4));

    let logging = logging_config(&store).unwrap();
    assert_eq!(logging.level, "debug");

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_fails() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(MULTI_CONFIG);
    let err = load_config(file.path()).unwrap_err();

    assert!(matches!(err, DbNormError::Configuration(_)));
    assert!(err.to_string().contains("TEST_DBNORM_PG_PASSWORD"));
}

#[test]
fn test_environment_overrides_apply_to_dotted_keys() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_DBNORM_PG_PASSWORD", "pw");
    std::env::set_var("DBNORM__DATABASE__CONNECTIONS__MAIN__HOST", "db9");
    std::env::set_var("DBNORM__DATABASE__CONNECTIONS__MAIN__PORT", "6543");
    std::env::set_var("DBNORM__ORM__CACHE__ENABLE", "true");

    let file = write_config(MULTI_CONFIG);
    let store = load_config(file.path()).unwrap();
    assert_eq!(store.get("orm.cache.enable"), Some(json!(true)));

    let raw = store.get("database").unwrap();
    let normalized = transformer::transform(&validator::validate(&raw).unwrap()).unwrap();
    assert_eq!(
        normalized.connections["main"].descriptor(),
        "pgsql:host=db9;port=6543;dbname=app;charset=utf8"
    );

    cleanup_env_vars();
}

#[test]
fn test_invalid_toml_is_a_configuration_error() {
    let file = write_config("[database\ndriver = ");
    assert!(matches!(
        load_config(file.path()),
        Err(DbNormError::Configuration(_))
    ));
}

#[test]
fn test_save_section_persists_only_the_new_block() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_DBNORM_PG_PASSWORD", "hunter2");
    std::env::set_var("DBNORM__DATABASE__CONNECTIONS__MAIN__HOST", "override-host");

    let file = write_config(MULTI_CONFIG);
    let store = load_config(file.path()).unwrap();
    assert_eq!(
        store.get("database.connections.main.host"),
        Some(json!("override-host"))
    );

    let orm = json!({"schema": {}, "migrations": {"table": "cycle_migrations"}});
    assert!(save_section(file.path(), "orm", &orm).unwrap());
    cleanup_env_vars();

    let written = std::fs::read_to_string(file.path()).unwrap();
    assert!(written.contains("${TEST_DBNORM_PG_PASSWORD}"));
    assert!(!written.contains("hunter2"));
    assert!(!written.contains("override-host"));

    let reloaded: toml::Table = toml::from_str(&written).unwrap();
    assert_eq!(reloaded["orm"]["migrations"]["table"].as_str(), Some("cycle_migrations"));
    assert_eq!(
        reloaded["database"]["connections"]["main"]["host"].as_str(),
        Some("db1")
    );
}

#[test]
fn test_save_section_keeps_existing_block() {
    let file = write_config("[orm.schema.user]\ntable = \"users\"\n");
    let before = std::fs::read_to_string(file.path()).unwrap();

    assert!(!save_section(file.path(), "orm", &json!({"schema": {}})).unwrap());
    assert_eq!(std::fs::read_to_string(file.path()).unwrap(), before);
}

#[test]
fn test_toml_declaration_order_drives_default_and_first_error() {
    let file = write_config(
        r#"
[database.databases.zeta]
connection = "main"

[database.databases.alpha]
connection = "main"

[database.connections.main]
driver = "sqlite"
database = "/data/app.db"
"#,
    );
    let store = load_config(file.path()).unwrap();
    let raw = store.get("database").unwrap();
    let normalized = transformer::transform(&validator::validate(&raw).unwrap()).unwrap();
    assert_eq!(normalized.default_database, "zeta");

    let file = write_config(
        r#"
[database.databases.default]
connection = "zulu"

[database.connections.zulu]
driver = "pgsql"
database = "app"

[database.connections.alpha]
driver = "mysql"
host = "db2"
"#,
    );
    let store = load_config(file.path()).unwrap();
    let raw = store.get("database").unwrap();
    let err = validator::validate(&raw).unwrap_err();
    assert!(err.to_string().contains("'zulu'"), "unexpected error: {err}");
}
