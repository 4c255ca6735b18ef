//! Domain error types
//!
//! This module defines the error hierarchy for dbnorm. Configuration rule
//! violations and connection failures each have their own enum; both are
//! wrapped by [`DbNormError`]. Driver-level error types never leak out of the
//! adapters, they are converted to messages at the boundary.

use thiserror::Error;

/// Main dbnorm error type
///
/// This is the primary error type used throughout the crate.
#[derive(Debug, Error)]
pub enum DbNormError {
    /// Loading errors (missing file, bad TOML, unset environment variables)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The database configuration violates a validation rule
    #[error("Invalid database configuration: {0}")]
    Invalid(#[from] ConfigError),

    /// Connection-related errors
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Config store read/write errors
    #[error("Config store error: {0}")]
    Store(String),

    /// The shared facade failed to initialise earlier in this process
    #[error("Database facade unavailable: {0}")]
    FacadeUnavailable(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Validation and transformation errors
///
/// Every variant carries the names needed to locate the offending entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No database configuration was supplied
    #[error("database configuration is missing; add a \"database\" section to your configuration")]
    MissingConfig,

    /// Neither the multi-connection nor the single-connection shape matched
    #[error("invalid configuration shape: {reason}")]
    InvalidShape { reason: String },

    /// A database entry names a connection that is not declared
    #[error("database '{database}' references connection '{connection}' which does not exist")]
    UnknownConnectionReference {
        database: String,
        connection: String,
    },

    /// The `default` entry names a database that is not declared or maps to no connection
    #[error("default database '{database}' is not a \"databases\" entry with a connection")]
    UnknownDefaultDatabase { database: String },

    /// A connection settings object has no driver
    #[error("field 'driver' is required for connection '{connection}'")]
    MissingDriverField { connection: String },

    /// Driver identifier outside the registry
    #[error("driver '{driver}' is not supported (expected one of: pgsql, mysql, sqlite)")]
    UnsupportedDriver { driver: String },

    /// A field required by the driver is absent or empty
    #[error("field '{field}' is required for {driver} connection '{connection}'")]
    MissingRequiredField {
        connection: String,
        field: String,
        driver: String,
    },

    /// An optional field has the wrong type or an out-of-range value
    #[error("field '{field}' of connection '{connection}' is invalid: {reason}")]
    InvalidField {
        connection: String,
        field: String,
        reason: String,
    },
}

/// Connection errors
///
/// Raised by connection handles and by the facade's connectivity probe.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// No database with this name is configured
    #[error("unknown database '{0}'")]
    UnknownDatabase(String),

    /// A pool could not be created for a connection
    #[error("failed to create connection pool for '{connection}': {message}")]
    PoolCreation { connection: String, message: String },

    /// A query failed at the driver level
    #[error("query failed on connection '{connection}': {message}")]
    QueryFailed { connection: String, message: String },

    /// The round-trip probe failed; the cause is kept as the error source
    #[error("unable to connect to database '{database}': {source}")]
    TestFailed {
        database: String,
        #[source]
        source: Box<ConnectionError>,
    },
}

impl ConnectionError {
    /// Wraps any connection failure into a probe failure for `database`
    pub fn test_failed(database: impl Into<String>, cause: ConnectionError) -> Self {
        ConnectionError::TestFailed {
            database: database.into(),
            source: Box::new(cause),
        }
    }
}

impl From<std::io::Error> for DbNormError {
    fn from(err: std::io::Error) -> Self {
        DbNormError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DbNormError {
    fn from(err: serde_json::Error) -> Self {
        DbNormError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DbNormError {
    fn from(err: toml::de::Error) -> Self {
        DbNormError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<toml::ser::Error> for DbNormError {
    fn from(err: toml::ser::Error) -> Self {
        DbNormError::Serialization(format!("TOML serialization error: {err}"))
    }
}
