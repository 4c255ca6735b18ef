//! Configuration transformer
//!
//! Turns a [`ValidatedConfig`] into a [`NormalizedConfig`]: one
//! [`ConnectionSpec`] per connection plus the database to connection mapping.
//! The transformation is pure; running it twice on the same input gives
//! equal output.

use super::normalized::{ConnectionSpec, NormalizedConfig};
use super::registry;
use super::validator::{self, ConfigShape, ValidatedConfig};
use super::DEFAULT_NAME;
use crate::config::{empty_secret, ConnectionSettings};
use crate::domain::{ConfigError, Driver};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Builds the normalized configuration
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedDriver`] if a driver left the registry
/// between validation and transformation, which cannot happen with the
/// static table, and the validator's errors if handed settings it never saw.
///
/// # Examples
///
/// ```
/// use dbnorm::core::{transformer, validator};
/// use serde_json::json;
///
/// let raw = json!({"driver": "pgsql", "host": "db1", "database": "app", "username": "app"});
/// let normalized = transformer::transform(&validator::validate(&raw).unwrap()).unwrap();
///
/// let spec = &normalized.connections["default"];
/// assert_eq!(spec.descriptor(), "pgsql:host=db1;port=5432;dbname=app;charset=utf8");
/// assert_eq!(normalized.databases["default"], "default");
/// ```
pub fn transform(validated: &ValidatedConfig<'_>) -> Result<NormalizedConfig, ConfigError> {
    let normalized = match validated.shape() {
        ConfigShape::MultiConnection {
            databases,
            connections,
            default,
        } => {
            let mut specs = BTreeMap::new();
            for (name, settings) in connections {
                let settings = validator::settings_table(name, settings)?;
                let parsed = validator::parse_settings(name, settings)?;
                specs.insert(name.clone(), build_spec(parsed)?);
            }

            let mut mapping = BTreeMap::new();
            for (database, entry) in databases {
                match validator::database_reference(database, entry)? {
                    Some(connection) => {
                        mapping.insert(database.clone(), connection.to_string());
                    }
                    None => {
                        tracing::warn!(
                            database = %database,
                            "Database entry references no connection and is skipped"
                        );
                    }
                }
            }

            NormalizedConfig {
                default_database: default_database(default, databases, &mapping),
                databases: mapping,
                connections: specs,
            }
        }
        ConfigShape::SingleConnection { settings } => {
            let parsed = validator::parse_settings(DEFAULT_NAME, settings)?;
            NormalizedConfig {
                default_database: DEFAULT_NAME.to_string(),
                databases: BTreeMap::from([(DEFAULT_NAME.to_string(), DEFAULT_NAME.to_string())]),
                connections: BTreeMap::from([(DEFAULT_NAME.to_string(), build_spec(parsed)?)]),
            }
        }
    };

    tracing::debug!(
        default_database = %normalized.default_database,
        databases = normalized.databases.len(),
        connections = normalized.connections.len(),
        "Database configuration normalized"
    );
    Ok(normalized)
}

/// Explicit `default`, else a mapped database named `default`, else the first
/// declared database that maps to a connection
fn default_database(
    explicit: Option<&str>,
    databases: &Map<String, Value>,
    mapping: &BTreeMap<String, String>,
) -> String {
    explicit
        .or_else(|| mapping.contains_key(DEFAULT_NAME).then_some(DEFAULT_NAME))
        .or_else(|| {
            databases
                .keys()
                .find(|name| mapping.contains_key(name.as_str()))
                .map(String::as_str)
        })
        .unwrap_or(DEFAULT_NAME)
        .to_string()
}

fn build_spec(settings: ConnectionSettings) -> Result<ConnectionSpec, ConfigError> {
    let entry = registry::lookup(settings.driver.as_str())?;
    let descriptor = entry.build_descriptor(
        settings.host.as_deref(),
        settings.port,
        &settings.database,
        settings.charset.as_deref(),
    );

    let (username, password) = match settings.driver {
        Driver::Sqlite => (String::new(), empty_secret()),
        Driver::Postgres | Driver::MySql => (
            settings.username.unwrap_or_default(),
            settings.password.unwrap_or_else(empty_secret),
        ),
    };

    Ok(ConnectionSpec::new(
        settings.driver,
        descriptor,
        username,
        password,
        settings.options,
    ))
}
