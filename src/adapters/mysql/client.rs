//! MySQL connection handle
//!
//! sqlx pools spawn maintenance tasks, so the pool itself is created on the
//! first query (inside the runtime) from options prepared up front.

use crate::adapters::database::pool::{PoolSettings, DEFAULT_MAX_CONNECTIONS};
use crate::adapters::database::ConnectionHandle;
use crate::core::registry::ParsedDescriptor;
use crate::core::ConnectionSpec;
use crate::domain::{ConnectionError, Driver};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use tokio::sync::OnceCell;

/// Pooled MySQL handle
pub struct MySqlHandle {
    name: String,
    connect_options: MySqlConnectOptions,
    settings: PoolSettings,
    pool: OnceCell<MySqlPool>,
}

impl MySqlHandle {
    /// Create a handle for the connection `name`
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::PoolCreation`] if the descriptor is not a
    /// network descriptor.
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

        let mut connect_options = MySqlConnectOptions::new()
            .host(&host)
            .port(port)
            .database(&dbname)
            .username(spec.username());
        let password = spec.password().expose_secret();
        if !password.is_empty() {
            connect_options = connect_options.password(password.as_str());
        }
        if !charset.is_empty() {
            connect_options = connect_options.charset(&charset);
        }

        let settings = PoolSettings::from_spec(spec, DEFAULT_MAX_CONNECTIONS);
        tracing::debug!(
            connection = %name,
            host = %host,
            port,
            dbname = %dbname,
            max_connections = settings.max_connections,
            "MySQL pool prepared"
        );

        Ok(Self {
            name: name.to_string(),
            connect_options,
            settings,
            pool: OnceCell::new(),
        })
    }

    async fn pool(&self) -> &MySqlPool {
        self.pool
            .get_or_init(|| async {
                MySqlPoolOptions::new()
                    .max_connections(self.settings.max_connections)
                    .acquire_timeout(self.settings.connect_timeout)
                    .connect_lazy_with(self.connect_options.clone())
            })
            .await
    }
}

#[async_trait]
impl ConnectionHandle for MySqlHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn driver(&self) -> Driver {
        Driver::MySql
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
