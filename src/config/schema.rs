//! Configuration schema types
//!
//! The `database` section is deliberately untyped (it is validated rule by
//! rule by [`crate::core::validator`]); this module holds the typed shapes
//! that come out of validation and the typed sections dbnorm owns itself.

use crate::config::SecretString;
use crate::domain::Driver;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Settings of one connection after validation
///
/// Produced by the validator from a raw settings mapping. Optional fields
/// stay `None` here; driver defaults are applied by the transformer.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Driver selecting the descriptor grammar and defaults
    pub driver: Driver,

    /// Server host (network drivers)
    pub host: Option<String>,

    /// Server port, already range-checked
    pub port: Option<u16>,

    /// Database name, or file path for sqlite
    pub database: String,

    /// Login user (network drivers)
    pub username: Option<String>,

    /// Login password
    pub password: Option<SecretString>,

    /// Client character set
    pub charset: Option<String>,

    /// Free-form driver options, passed through untouched
    pub options: Map<String, Value>,
}

/// ORM settings block stored under the `orm` key
///
/// Written with [`OrmConfig::defaults_for`] the first time a facade is built
/// against a store that has no `orm` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrmConfig {
    /// Schema definition handed to the ORM runtime
    #[serde(default = "default_schema")]
    pub schema: Value,

    /// Generated proxy classes
    pub proxies: ProxiesConfig,

    /// Migration files and tracking table
    pub migrations: MigrationsConfig,

    /// Schema cache
    pub cache: CacheConfig,
}

impl OrmConfig {
    /// Default ORM block with every path rooted at `base_dir`
    ///
    /// # Examples
    ///
    /// ```
    /// use dbnorm::config::OrmConfig;
    /// use std::path::Path;
    ///
    /// let orm = OrmConfig::defaults_for(Path::new("/srv/app"));
    /// assert_eq!(orm.proxies.directory, "/srv/app/storage/cycle/proxies");
    /// assert_eq!(orm.migrations.table, "cycle_migrations");
    /// assert!(!orm.cache.enable);
    /// ```
    pub fn defaults_for(base_dir: &Path) -> Self {
        let under = |parts: &[&str]| {
            parts
                .iter()
                .fold(base_dir.to_path_buf(), |path, part| path.join(part))
                .to_string_lossy()
                .into_owned()
        };

        Self {
            schema: default_schema(),
            proxies: ProxiesConfig {
                directory: under(&["storage", "cycle", "proxies"]),
            },
            migrations: MigrationsConfig {
                directory: under(&["database", "migrations"]),
                table: default_migrations_table(),
            },
            cache: CacheConfig {
                enable: false,
                directory: under(&["storage", "cycle", "cache"]),
            },
        }
    }
}

/// Proxy code generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxiesConfig {
    /// Directory for generated proxies
    pub directory: String,
}

/// Migration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationsConfig {
    /// Directory holding migration files
    pub directory: String,

    /// Table tracking applied migrations
    #[serde(default = "default_migrations_table")]
    pub table: String,
}

/// Schema cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether the compiled schema is cached
    #[serde(default)]
    pub enable: bool,

    /// Cache directory
    pub directory: String,
}

/// Logging configuration (`[logging]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    /// Validates the logging section
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending key.
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            ));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_schema() -> Value {
    Value::Object(Map::new())
}

fn default_migrations_table() -> String {
    "cycle_migrations".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_local_path() -> String {
    "storage/logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_orm_defaults_layout() {
        let orm = OrmConfig::defaults_for(Path::new("/srv/app"));

        assert_eq!(orm.schema, json!({}));
        assert_eq!(orm.proxies.directory, "/srv/app/storage/cycle/proxies");
        assert_eq!(orm.migrations.directory, "/srv/app/database/migrations");
        assert_eq!(orm.migrations.table, "cycle_migrations");
        assert!(!orm.cache.enable);
        assert_eq!(orm.cache.directory, "/srv/app/storage/cycle/cache");
    }

    #[test]
    fn test_orm_config_serializes_to_store_layout() {
        let value = serde_json::to_value(OrmConfig::defaults_for(Path::new("/app"))).unwrap();

        assert_eq!(value["migrations"]["table"], "cycle_migrations");
        assert_eq!(value["cache"]["enable"], false);
        assert!(value["schema"].is_object());
    }

    #[test]
    fn test_orm_config_deserialize_fills_defaults() {
        let orm: OrmConfig = serde_json::from_value(json!({
            "proxies": {"directory": "/p"},
            "migrations": {"directory": "/m"},
            "cache": {"directory": "/c"}
        }))
        .unwrap();

        assert_eq!(orm.migrations.table, "cycle_migrations");
        assert!(!orm.cache.enable);
        assert_eq!(orm.schema, json!({}));
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.local_enabled);
        assert_eq!(config.local_rotation, "daily");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();

        config.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = " ".to_string();
        assert!(config.validate().is_err());
    }
}
