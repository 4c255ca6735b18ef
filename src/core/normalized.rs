//! Normalized connection model
//!
//! What the transformer produces and what connection managers consume.

use crate::config::SecretString;
use crate::domain::{ConnectionError, Driver};
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Driver-specific description of one connection
///
/// Immutable once built. The password is redacted in `Debug` output and the
/// descriptor never contains credentials, so a spec is safe to log.
#[derive(Debug, Clone)]
pub struct ConnectionSpec {
    driver: Driver,
    descriptor: String,
    username: String,
    password: SecretString,
    options: Map<String, Value>,
}

impl ConnectionSpec {
    /// Assembles a spec from already normalized parts
    pub fn new(
        driver: Driver,
        descriptor: String,
        username: String,
        password: SecretString,
        options: Map<String, Value>,
    ) -> Self {
        Self {
            driver,
            descriptor,
            username,
            password,
            options,
        }
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    /// Connection string, e.g. `pgsql:host=db1;port=5432;dbname=app;charset=utf8`
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// Driver options, passed through from the raw settings
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Positive integer option, if set
    pub fn option_u64(&self, key: &str) -> Option<u64> {
        match self.options.get(key)? {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean option, if set
    pub fn option_bool(&self, key: &str) -> Option<bool> {
        match self.options.get(key)? {
            Value::Bool(flag) => Some(*flag),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

impl PartialEq for ConnectionSpec {
    fn eq(&self, other: &Self) -> bool {
        self.driver == other.driver
            && self.descriptor == other.descriptor
            && self.username == other.username
            && self.password.expose_secret().as_str() == other.password.expose_secret().as_str()
            && self.options == other.options
    }
}

/// Output of the transformer
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedConfig {
    /// Database used when a caller names none
    pub default_database: String,

    /// Database name to connection name
    pub databases: BTreeMap<String, String>,

    /// Connection name to spec
    pub connections: BTreeMap<String, ConnectionSpec>,
}

impl NormalizedConfig {
    /// Resolves an optional database name to `(database, connection)` names
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::UnknownDatabase`] for undeclared names.
    pub fn resolve<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a str), ConnectionError> {
        let database = name.unwrap_or(self.default_database.as_str());
        self.databases
            .get_key_value(database)
            .map(|(database, connection)| (database.as_str(), connection.as_str()))
            .ok_or_else(|| ConnectionError::UnknownDatabase(database.to_string()))
    }

    /// Spec behind a database name
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::UnknownDatabase`] for undeclared names.
    pub fn spec_for(&self, name: Option<&str>) -> Result<&ConnectionSpec, ConnectionError> {
        let (database, connection) = self.resolve(name)?;
        self.connections
            .get(connection)
            .ok_or_else(|| ConnectionError::UnknownDatabase(database.to_string()))
    }
}
