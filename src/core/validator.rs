//! Configuration validation
//!
//! Checks a raw `database` section against the structural and per-driver
//! rules. Rules run in a fixed order and the first violation wins:
//!
//! 1. The section must be non-empty.
//! 2. Shape detection: non-empty `databases` and `connections` tables select
//!    the multi-connection shape; otherwise a top-level `driver` selects the
//!    single-connection shape.
//! 3. Every database entry that references a connection must find it.
//! 4. Every settings table needs a registered `driver` and the fields the
//!    driver requires.
//! 5. Optional fields must have usable types (`port`, `charset`, `options`...).
//!
//! Validation borrows the input and never mutates it.

use super::registry;
use crate::config::schema::ConnectionSettings;
use crate::config::secret_string;
use crate::domain::{ConfigError, Driver};
use serde_json::{Map, Value};

/// Which of the two accepted layouts a configuration uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// `databases` + `connections` tables
    MultiConnection,
    /// One flat settings table with a `driver`
    SingleConnection,
}

/// The detected layout, borrowing the relevant parts of the raw config
#[derive(Debug, Clone, Copy)]
pub enum ConfigShape<'a> {
    /// Named databases mapped onto named connections
    MultiConnection {
        databases: &'a Map<String, Value>,
        connections: &'a Map<String, Value>,
        default: Option<&'a str>,
    },
    /// A single flat connection
    SingleConnection { settings: &'a Map<String, Value> },
}

/// Read-only confirmation that a raw configuration passed validation
#[derive(Debug, Clone, Copy)]
pub struct ValidatedConfig<'a> {
    raw: &'a Value,
    shape: ConfigShape<'a>,
}

impl<'a> ValidatedConfig<'a> {
    /// The raw configuration, unchanged
    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    /// The detected shape
    pub fn shape(&self) -> ConfigShape<'a> {
        self.shape
    }

    /// Tag of the detected shape
    pub fn kind(&self) -> ShapeKind {
        match self.shape {
            ConfigShape::MultiConnection { .. } => ShapeKind::MultiConnection,
            ConfigShape::SingleConnection { .. } => ShapeKind::SingleConnection,
        }
    }
}

/// Validates a raw `database` section
///
/// # Errors
///
/// Returns the first [`ConfigError`] encountered, in rule order.
///
/// # Examples
///
/// ```
/// use dbnorm::core::validator::{validate, ShapeKind};
/// use serde_json::json;
///
/// let raw = json!({"driver": "sqlite", "database": "/data/app.db"});
/// let validated = validate(&raw).unwrap();
/// assert_eq!(validated.kind(), ShapeKind::SingleConnection);
/// ```
pub fn validate(raw: &Value) -> Result<ValidatedConfig<'_>, ConfigError> {
    if is_empty(raw) {
        return Err(ConfigError::MissingConfig);
    }

    let shape = detect_shape(raw)?;

    match shape {
        ConfigShape::MultiConnection {
            databases,
            connections,
            default,
        } => {
            let mut mapped = Vec::with_capacity(databases.len());
            for (database, entry) in databases {
                if let Some(connection) = database_reference(database, entry)? {
                    if !connections.contains_key(connection) {
                        return Err(ConfigError::UnknownConnectionReference {
                            database: database.clone(),
                            connection: connection.to_string(),
                        });
                    }
                    mapped.push(database.as_str());
                }
            }

            if mapped.is_empty() {
                return Err(ConfigError::InvalidShape {
                    reason: "no entry of \"databases\" references a connection".to_string(),
                });
            }

            if let Some(default) = default {
                if !mapped.contains(&default) {
                    return Err(ConfigError::UnknownDefaultDatabase {
                        database: default.to_string(),
                    });
                }
            }

            for (connection, settings) in connections {
                let settings = settings_table(connection, settings)?;
                parse_settings(connection, settings)?;
            }
        }
        ConfigShape::SingleConnection { settings } => {
            parse_settings(super::DEFAULT_NAME, settings)?;
        }
    }

    let validated = ValidatedConfig { raw, shape };
    tracing::debug!(shape = ?validated.kind(), "Database configuration validated");
    Ok(validated)
}

fn detect_shape(raw: &Value) -> Result<ConfigShape<'_>, ConfigError> {
    let Some(root) = raw.as_object() else {
        return Err(ConfigError::InvalidShape {
            reason: "the database section must be a table".to_string(),
        });
    };

    let databases = non_empty_table(root, "databases");
    let connections = non_empty_table(root, "connections");

    if let (Some(databases), Some(connections)) = (databases, connections) {
        let default = match root.get("default") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name.as_str()),
            Some(_) => {
                return Err(ConfigError::InvalidShape {
                    reason: "\"default\" must name a database".to_string(),
                })
            }
        };
        return Ok(ConfigShape::MultiConnection {
            databases,
            connections,
            default,
        });
    }

    if is_present(root.get("driver")) {
        return Ok(ConfigShape::SingleConnection { settings: root });
    }

    let missing = if databases.is_none() {
        "\"databases\""
    } else {
        "\"connections\""
    };
    Err(ConfigError::InvalidShape {
        reason: format!(
            "section {missing} is missing or invalid and no top-level \"driver\" was found"
        ),
    })
}

/// Connection name referenced by a database entry
///
/// An entry is either a bare connection name or a table with a `connection`
/// key (`driver` is accepted as a legacy alias). A table with neither
/// references nothing.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidShape`] for entries of any other type.
pub fn database_reference<'a>(
    database: &str,
    entry: &'a Value,
) -> Result<Option<&'a str>, ConfigError> {
    match entry {
        Value::String(connection) => Ok(Some(connection.as_str())),
        Value::Object(table) => {
            let reference = table
                .get("connection")
                .filter(|value| !value.is_null())
                .or_else(|| table.get("driver").filter(|value| !value.is_null()));
            match reference {
                None => Ok(None),
                Some(Value::String(connection)) => Ok(Some(connection.as_str())),
                Some(_) => Err(ConfigError::InvalidShape {
                    reason: format!("database '{database}' must reference a connection by name"),
                }),
            }
        }
        _ => Err(ConfigError::InvalidShape {
            reason: format!("database '{database}' must be a table or a connection name"),
        }),
    }
}

/// Settings table of a named connection
///
/// # Errors
///
/// Returns [`ConfigError::InvalidShape`] when the entry is not a table.
pub fn settings_table<'a>(
    connection: &str,
    settings: &'a Value,
) -> Result<&'a Map<String, Value>, ConfigError> {
    settings.as_object().ok_or_else(|| ConfigError::InvalidShape {
        reason: format!("connection '{connection}' must be a table of settings"),
    })
}

/// Applies rules 4 and 5 to one settings table
///
/// # Errors
///
/// Returns [`ConfigError::MissingDriverField`], [`ConfigError::UnsupportedDriver`],
/// [`ConfigError::MissingRequiredField`] or [`ConfigError::InvalidField`].
pub fn parse_settings(
    connection: &str,
    settings: &Map<String, Value>,
) -> Result<ConnectionSettings, ConfigError> {
    let driver_id = match settings.get("driver") {
        None | Some(Value::Null) => {
            return Err(ConfigError::MissingDriverField {
                connection: connection.to_string(),
            })
        }
        Some(Value::String(id)) if id.trim().is_empty() => {
            return Err(ConfigError::MissingDriverField {
                connection: connection.to_string(),
            })
        }
        Some(Value::String(id)) => id.clone(),
        Some(other) => {
            return Err(ConfigError::UnsupportedDriver {
                driver: other.to_string(),
            })
        }
    };

    let entry = registry::lookup(&driver_id)?;
    for field in entry.required_fields {
        required_string(connection, entry.driver, settings, field)?;
    }

    let fields = FieldReader {
        connection,
        settings,
    };
    let database = fields.string("database")?.unwrap_or_default();

    Ok(ConnectionSettings {
        driver: entry.driver,
        host: fields.string("host")?,
        port: fields.port()?,
        database,
        username: fields.string("username")?,
        password: fields.string("password")?.map(secret_string),
        charset: fields.string("charset")?,
        options: fields.options()?,
    })
}

fn required_string(
    connection: &str,
    driver: Driver,
    settings: &Map<String, Value>,
    field: &str,
) -> Result<(), ConfigError> {
    let present = match settings.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(value)) => !value.trim().is_empty(),
        Some(_) => true,
    };

    if present {
        Ok(())
    } else {
        Err(ConfigError::MissingRequiredField {
            connection: connection.to_string(),
            field: field.to_string(),
            driver: driver.as_str().to_string(),
        })
    }
}

/// Typed access to optional settings fields
struct FieldReader<'a> {
    connection: &'a str,
    settings: &'a Map<String, Value>,
}

impl FieldReader<'_> {
    fn invalid(&self, field: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidField {
            connection: self.connection.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    fn string(&self, field: &str) -> Result<Option<String>, ConfigError> {
        match self.settings.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(other) => Err(self.invalid(field, format!("expected a string, found {other}"))),
        }
    }

    fn port(&self) -> Result<Option<u16>, ConfigError> {
        let out_of_range = |shown: &dyn std::fmt::Display| {
            self.invalid("port", format!("{shown} is not a port between 1 and 65535"))
        };

        match self.settings.get("port") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(number)) => number
                .as_u64()
                .and_then(|port| u16::try_from(port).ok())
                .filter(|port| *port != 0)
                .map(Some)
                .ok_or_else(|| out_of_range(number)),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => text
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|port| *port != 0)
                .map(Some)
                .ok_or_else(|| out_of_range(&format!("'{text}'"))),
            Some(other) => Err(self.invalid("port", format!("expected an integer, found {other}"))),
        }
    }

    fn options(&self) -> Result<Map<String, Value>, ConfigError> {
        match self.settings.get("options") {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(options)) => Ok(options.clone()),
            Some(other) => Err(self.invalid("options", format!("expected a table, found {other}"))),
        }
    }
}

fn non_empty_table<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    root.get(key)
        .and_then(Value::as_object)
        .filter(|table| !table.is_empty())
}

fn is_present(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

fn is_empty(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::Object(table) => table.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
