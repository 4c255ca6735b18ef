//! SQLite connection handle

use crate::adapters::database::pool::PoolSettings;
use crate::adapters::database::ConnectionHandle;
use crate::core::ConnectionSpec;
use crate::domain::{ConnectionError, Driver};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tokio::sync::OnceCell;

/// SQLite allows one writer; a single pooled connection unless configured
const DEFAULT_MAX_CONNECTIONS: u32 = 1;

/// Pooled SQLite handle
pub struct SqliteHandle {
    name: String,
    connect_options: SqliteConnectOptions,
    settings: PoolSettings,
    pool: OnceCell<SqlitePool>,
}

impl SqliteHandle {
    /// Create a handle for the connection `name`
    ///
    /// Honors the `create_if_missing` option (default `false`).
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::PoolCreation`] if the descriptor is not a
    /// valid sqlite descriptor.
    pub fn new(name: &str, spec: &ConnectionSpec) -> Result<Self, ConnectionError> {
        let connect_options = SqliteConnectOptions::from_str(spec.descriptor())
            .map_err(|e| ConnectionError::PoolCreation {
                connection: name.to_string(),
                message: e.to_string(),
            })?
            .create_if_missing(spec.option_bool("create_if_missing").unwrap_or(false));

        let settings = PoolSettings::from_spec(spec, DEFAULT_MAX_CONNECTIONS);
        tracing::debug!(
            connection = %name,
            descriptor = %spec.descriptor(),
            "SQLite pool prepared"
        );

        Ok(Self {
            name: name.to_string(),
            connect_options,
            settings,
            pool: OnceCell::new(),
        })
    }

    async fn pool(&self) -> &SqlitePool {
        self.pool
            .get_or_init(|| async {
                SqlitePoolOptions::new()
                    .max_connections(self.settings.max_connections)
                    .acquire_timeout(self.settings.connect_timeout)
                    .connect_lazy_with(self.connect_options.clone())
            })
            .await
    }
}

#[async_trait]
impl ConnectionHandle for SqliteHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn driver(&self) -> Driver {
        Driver::Sqlite
    }

    async fn fetch_first(&self, sql: &str) -> Result<bool, ConnectionError> {
        let row = sqlx::query(sql)
            .fetch_optional(self.pool().await)
            .await
            .map_err(|e| ConnectionError::QueryFailed {
                connection: self.name.clone(),
                message: e.to_string(),
            })?;

        Ok(row.is_some())
    }
}
