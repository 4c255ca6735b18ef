//! Configuration management for dbnorm.
//!
//! # Overview
//!
//! dbnorm reads a TOML file into a dotted-path key-value store
//! ([`MemoryConfigStore`]) with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment overrides (`DBNORM__DATABASE__HOST=db1` sets `database.host`)
//! - Typed sections for what dbnorm owns itself ([`LoggingConfig`], [`OrmConfig`])
//!
//! The `database` section stays untyped in the store; it is validated and
//! normalized by [`crate::core`].
//!
//! # Example Configuration
//!
//! Multiple connections:
//!
//! ```toml
//! [database]
//! default = "default"
//!
//! [database.databases.default]
//! connection = "main"
//!
//! [database.databases.analytics]
//! connection = "warehouse"
//!
//! [database.connections.main]
//! driver = "pgsql"
//! host = "db1"
//! database = "app"
//! username = "app"
//! password = "${APP_DB_PASSWORD}"
//!
//! [database.connections.warehouse]
//! driver = "sqlite"
//! database = "/data/warehouse.db"
//! ```
//!
//! A single flat connection:
//!
//! ```toml
//! [database]
//! driver = "mysql"
//! host = "db2"
//! port = 3307
//! database = "shop"
//! username = "shop"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dbnorm::config::{load_config, ConfigStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = load_config("dbnorm.toml")?;
//! println!("database section present: {}", store.has("database"));
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;
pub mod store;

// Re-export commonly used types
pub use loader::{load_config, load_config_str, logging_config, save_section};
pub use schema::{
    CacheConfig, ConnectionSettings, LoggingConfig, MigrationsConfig, OrmConfig, ProxiesConfig,
};
pub use secret::{empty_secret, secret_string, SecretString, SecretValue};
pub use store::{ConfigStore, MemoryConfigStore};

// Serializes unit tests that touch process environment variables
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
