//! Connection manager factory
//!
//! Builds one handle per normalized connection, choosing the adapter by
//! driver, and serves them by database name.

use super::traits::{ConnectionHandle, ConnectionManager, ConnectionManagerFactory};
use crate::adapters::mysql::MySqlHandle;
use crate::adapters::postgresql::PostgreSQLHandle;
use crate::adapters::sqlite::SqliteHandle;
use crate::core::{ConnectionSpec, NormalizedConfig};
use crate::domain::{ConnectionError, Driver, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Create the handle for one connection based on its driver
///
/// # Errors
///
/// Returns an error if the adapter cannot prepare its pool.
pub fn create_connection_handle(
    name: &str,
    spec: &ConnectionSpec,
) -> std::result::Result<Arc<dyn ConnectionHandle>, ConnectionError> {
    let handle: Arc<dyn ConnectionHandle> = match spec.driver() {
        Driver::Postgres => Arc::new(PostgreSQLHandle::new(name, spec)?),
        Driver::MySql => Arc::new(MySqlHandle::new(name, spec)?),
        Driver::Sqlite => Arc::new(SqliteHandle::new(name, spec)?),
    };
    Ok(handle)
}

/// [`ConnectionManager`] backed by per-connection pools
pub struct PooledConnectionManager {
    default_database: String,
    databases: BTreeMap<String, String>,
    handles: BTreeMap<String, Arc<dyn ConnectionHandle>>,
}

impl PooledConnectionManager {
    /// Prepare a handle for every connection in `config`
    ///
    /// # Errors
    ///
    /// Returns the first adapter error.
    pub fn new(config: &NormalizedConfig) -> Result<Self> {
        let mut handles = BTreeMap::new();
        for (name, spec) in &config.connections {
            tracing::info!(connection = %name, driver = %spec.driver(), "Creating connection handle");
            handles.insert(name.clone(), create_connection_handle(name, spec)?);
        }

        Ok(Self {
            default_database: config.default_database.clone(),
            databases: config.databases.clone(),
            handles,
        })
    }
}

impl ConnectionManager for PooledConnectionManager {
    fn database(
        &self,
        name: Option<&str>,
    ) -> std::result::Result<Arc<dyn ConnectionHandle>, ConnectionError> {
        let database = name.unwrap_or(self.default_database.as_str());
        self.databases
            .get(database)
            .and_then(|connection| self.handles.get(connection))
            .cloned()
            .ok_or_else(|| ConnectionError::UnknownDatabase(database.to_string()))
    }

    fn database_names(&self) -> Vec<String> {
        self.databases.keys().cloned().collect()
    }
}

/// Default factory: builds a [`PooledConnectionManager`]
#[derive(Debug, Default, Clone, Copy)]
pub struct PooledConnectionManagerFactory;

impl ConnectionManagerFactory for PooledConnectionManagerFactory {
    fn create(&self, config: &NormalizedConfig) -> Result<Arc<dyn ConnectionManager>> {
        Ok(Arc::new(PooledConnectionManager::new(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{transformer, validator};
    use serde_json::json;

    fn normalized(raw: serde_json::Value) -> NormalizedConfig {
        transformer::transform(&validator::validate(&raw).unwrap()).unwrap()
    }

    #[test]
    fn test_databases_share_connection_handles() {
        let config = normalized(json!({
            "databases": {"default": "main", "reports": {"connection": "main"}, "cache": "warehouse"},
            "connections": {
                "main": {"driver": "pgsql", "host": "db1", "database": "app", "username": "app"},
                "warehouse": {"driver": "sqlite", "database": ":memory:"},
            }
        }));
        let manager = PooledConnectionManagerFactory.create(&config).unwrap();

        let default = manager.database(None).unwrap();
        let reports = manager.database(Some("reports")).unwrap();
        assert!(Arc::ptr_eq(&default, &reports));
        assert_eq!(default.driver(), Driver::Postgres);
        assert_eq!(manager.database(Some("cache")).unwrap().name(), "warehouse");
        assert_eq!(manager.database_names(), vec!["cache", "default", "reports"]);
    }

    #[test]
    fn test_unknown_database() {
        let config = normalized(json!({"driver": "sqlite", "database": ":memory:"}));
        let manager = PooledConnectionManager::new(&config).unwrap();
        assert!(matches!(
            manager.database(Some("archive")),
            Err(ConnectionError::UnknownDatabase(name)) if name == "archive"
        ));
    }
}
