//! PostgreSQL connection handle
//!
//! Builds a deadpool pool from a `pgsql:` descriptor. The pool opens no
//! connection until the first query.

use crate::adapters::database::pool::{PoolSettings, DEFAULT_MAX_CONNECTIONS};
use crate::adapters::database::ConnectionHandle;
use crate::core::registry::ParsedDescriptor;
use crate::core::ConnectionSpec;
use crate::domain::{ConnectionError, Driver};
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use secrecy::ExposeSecret;
use tokio_postgres::NoTls;

/// Pooled PostgreSQL handle
pub struct PostgreSQLHandle {
    /// Connection name
    name: String,

    /// Connection pool
    pool: Pool,
}

impl PostgreSQLHandle {
    /// Create a handle for the connection `name`
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::PoolCreation`] if the descriptor cannot be
    /// parsed or the pool cannot be built.
    pub fn new(name: &str, spec: &ConnectionSpec) -> Result<Self, ConnectionError> {
        let pool_error = |message: String| ConnectionError::PoolCreation {
            connection: name.to_string(),
            message,
        };

        let ParsedDescriptor::Network {
            host,
            port,
            dbname,
            charset,
            ..
        } = ParsedDescriptor::parse(name, spec.descriptor()).map_err(|e| pool_error(e.to_string()))?
        else {
            return Err(pool_error(format!(
                "descriptor '{}' is not a network descriptor",
                spec.descriptor()
            )));
        };

        let settings = PoolSettings::from_spec(spec, DEFAULT_MAX_CONNECTIONS);

        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&host)
            .port(port)
            .dbname(&dbname)
            .connect_timeout(settings.connect_timeout);
        if !charset.is_empty() {
            pg_config.options(&format!("-c client_encoding={charset}"));
        }
        if !spec.username().is_empty() {
            pg_config.user(spec.username());
        }
        let password = spec.password().expose_secret();
        if !password.is_empty() {
            pg_config.password(password.as_str());
        }

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(manager)
            .max_size(settings.max_connections as usize)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(settings.connect_timeout))
            .create_timeout(Some(settings.connect_timeout))
            .recycle_timeout(Some(settings.connect_timeout))
            .build()
            .map_err(|e| pool_error(e.to_string()))?;

        tracing::debug!(
            connection = %name,
            host = %host,
            port,
            dbname = %dbname,
            max_connections = settings.max_connections,
            "PostgreSQL pool prepared"
        );

        Ok(Self {
            name: name.to_string(),
            pool,
        })
    }
}

#[async_trait]
impl ConnectionHandle for PostgreSQLHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn driver(&self) -> Driver {
        Driver::Postgres
    }

    async fn fetch_first(&self, sql: &str) -> Result<bool, ConnectionError> {
        let query_error = |message: String| ConnectionError::QueryFailed {
            connection: self.name.clone(),
            message,
        };

        let client = self
            .pool
            .get()
            .await
            .map_err(|e| query_error(format!("Failed to get connection from pool: {e}")))?;

        let rows = client
            .query(sql, &[])
            .await
            .map_err(|e| query_error(e.to_string()))?;

        Ok(!rows.is_empty())
    }
}
