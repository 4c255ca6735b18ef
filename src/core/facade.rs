//! Database facade
//!
//! Wires validation, transformation, the connection manager and the ORM
//! runtime together. A [`DatabaseFacade`] only exists once every step
//! succeeded; any failure returns the originating error and leaves nothing
//! half-built behind.
//!
//! # Example
//!
//! ```rust,no_run
//! use dbnorm::config::load_config;
//! use dbnorm::core::DatabaseFacade;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(load_config("dbnorm.toml")?);
//! let facade = DatabaseFacade::builder(store).base_dir("/srv/app").build()?;
//!
//! if facade.test_connection(None).await? {
//!     println!("default database reachable");
//! }
//! # Ok(())
//! # }
//! ```

use super::normalized::NormalizedConfig;
use super::{transformer, validator};
use crate::adapters::database::{
    ConnectionHandle, ConnectionManager, ConnectionManagerFactory, OrmFactory, OrmHandle,
    PooledConnectionManagerFactory,
};
use crate::adapters::orm::SchemaOrmFactory;
use crate::config::{ConfigStore, OrmConfig};
use crate::domain::{ConnectionError, Result};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Query used by [`DatabaseFacade::test_connection`]
pub const PROBE_SQL: &str = "SELECT 1 as test";

/// Store key of the raw database section
pub const DATABASE_KEY: &str = "database";

/// Store key of the ORM block
pub const ORM_KEY: &str = "orm";

/// Ready-to-use database access built from the configuration store
pub struct DatabaseFacade {
    raw: Value,
    normalized: NormalizedConfig,
    manager: Arc<dyn ConnectionManager>,
    orm: Arc<dyn OrmHandle>,
}

impl std::fmt::Debug for DatabaseFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseFacade")
            .field("normalized", &self.normalized)
            .finish_non_exhaustive()
    }
}

/// Builder for [`DatabaseFacade`]
pub struct DatabaseFacadeBuilder {
    store: Arc<dyn ConfigStore>,
    manager_factory: Arc<dyn ConnectionManagerFactory>,
    orm_factory: Arc<dyn OrmFactory>,
    base_dir: Option<PathBuf>,
}

impl DatabaseFacadeBuilder {
    /// Replace the connection manager factory (default: pooled manager)
    pub fn manager_factory(mut self, factory: Arc<dyn ConnectionManagerFactory>) -> Self {
        self.manager_factory = factory;
        self
    }

    /// Replace the ORM factory (default: [`SchemaOrmFactory`])
    pub fn orm_factory(mut self, factory: Arc<dyn OrmFactory>) -> Self {
        self.orm_factory = factory;
        self
    }

    /// Root for the default ORM paths (default: current directory)
    pub fn base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Build the facade
    ///
    /// Reads `database` from the store, validates and normalizes it, creates
    /// the connection manager and the ORM runtime (schema from `orm.schema`),
    /// then registers the default `orm` block if the store has none.
    ///
    /// # Errors
    ///
    /// Returns the first error of any step, unchanged.
    pub fn build(self) -> Result<DatabaseFacade> {
        let raw = self.store.get(DATABASE_KEY).unwrap_or(Value::Null);

        let normalized = {
            let validated = validator::validate(&raw).map_err(|e| {
                tracing::warn!(error = %e, "Database configuration rejected");
                e
            })?;
            transformer::transform(&validated)?
        };

        let manager = self.manager_factory.create(&normalized)?;
        let schema = self.store.get_or("orm.schema", json!({}));
        let orm = self.orm_factory.create(Arc::clone(&manager), schema)?;

        let base_dir = match self.base_dir {
            Some(base_dir) => base_dir,
            None => std::env::current_dir()?,
        };
        register_orm_defaults(self.store.as_ref(), &base_dir)?;

        tracing::info!(
            default_database = %normalized.default_database,
            databases = normalized.databases.len(),
            "Database facade ready"
        );

        Ok(DatabaseFacade {
            raw,
            normalized,
            manager,
            orm,
        })
    }
}

impl DatabaseFacade {
    /// Start building a facade over `store`
    pub fn builder(store: Arc<dyn ConfigStore>) -> DatabaseFacadeBuilder {
        DatabaseFacadeBuilder {
            store,
            manager_factory: Arc::new(PooledConnectionManagerFactory),
            orm_factory: Arc::new(SchemaOrmFactory),
            base_dir: None,
        }
    }

    /// Handle for a named database, or the default one
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::UnknownDatabase`] for undeclared names.
    pub fn database(&self, name: Option<&str>) -> Result<Arc<dyn ConnectionHandle>> {
        Ok(self.manager.database(name)?)
    }

    /// The ORM runtime
    pub fn orm(&self) -> Arc<dyn OrmHandle> {
        Arc::clone(&self.orm)
    }

    /// Round-trip probe against a named database, or the default one
    ///
    /// # Errors
    ///
    /// Every failure is wrapped into [`ConnectionError::TestFailed`] naming
    /// the database.
    pub async fn test_connection(&self, name: Option<&str>) -> Result<bool> {
        let database = name.unwrap_or(self.normalized.default_database.as_str());

        let outcome = match self.manager.database(Some(database)) {
            Ok(handle) => handle.fetch_first(PROBE_SQL).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(found) => {
                tracing::info!(database = %database, row_returned = found, "Connection test completed");
                Ok(found)
            }
            Err(e) => {
                tracing::warn!(database = %database, error = %e, "Connection test failed");
                Err(ConnectionError::test_failed(database, e).into())
            }
        }
    }

    /// The `database` section exactly as it was read from the store
    pub fn config(&self) -> &Value {
        &self.raw
    }

    /// The normalized configuration the manager was built from
    pub fn normalized(&self) -> &NormalizedConfig {
        &self.normalized
    }
}

/// Writes the default `orm` block unless the store already has one
///
/// Returns whether the block was written. The check and the write are a
/// single [`ConfigStore::set_if_absent`] call.
///
/// # Errors
///
/// Returns an error if the store rejects the write.
pub fn register_orm_defaults(store: &dyn ConfigStore, base_dir: &Path) -> Result<bool> {
    let defaults = serde_json::to_value(OrmConfig::defaults_for(base_dir))?;
    let written = store.set_if_absent(ORM_KEY, defaults)?;

    if written {
        tracing::info!(base_dir = %base_dir.display(), "Registered default ORM configuration");
    } else {
        tracing::debug!("ORM configuration already present, defaults not written");
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use crate::domain::{ConfigError, DbNormError, Driver};
    use async_trait::async_trait;
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubHandle {
        name: String,
        reachable: bool,
    }

    #[async_trait]
    impl ConnectionHandle for StubHandle {
        fn name(&self) -> &str {
            &self.name
        }

        fn driver(&self) -> Driver {
            Driver::Sqlite
        }

        async fn fetch_first(&self, sql: &str) -> std::result::Result<bool, ConnectionError> {
            assert_eq!(sql, PROBE_SQL);
            if self.reachable {
                Ok(true)
            } else {
                Err(ConnectionError::QueryFailed {
                    connection: self.name.clone(),
                    message: "connection refused".to_string(),
                })
            }
        }
    }

    struct StubManager {
        config: NormalizedConfig,
        reachable: bool,
    }

    impl ConnectionManager for StubManager {
        fn database(
            &self,
            name: Option<&str>,
        ) -> std::result::Result<Arc<dyn ConnectionHandle>, ConnectionError> {
            let (_, connection) = self.config.resolve(name)?;
            Ok(Arc::new(StubHandle {
                name: connection.to_string(),
                reachable: self.reachable,
            }))
        }

        fn database_names(&self) -> Vec<String> {
            self.config.databases.keys().cloned().collect()
        }
    }

    struct StubManagerFactory {
        reachable: bool,
        calls: AtomicUsize,
    }

    impl ConnectionManagerFactory for StubManagerFactory {
        fn create(&self, config: &NormalizedConfig) -> Result<Arc<dyn ConnectionManager>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(StubManager {
                config: config.clone(),
                reachable: self.reachable,
            }))
        }
    }

    struct StubOrm(Value);

    impl OrmHandle for StubOrm {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn schema(&self) -> &Value {
            &self.0
        }

        fn manager(&self) -> Arc<dyn ConnectionManager> {
            unreachable!("not used by these tests")
        }
    }

    struct StubOrmFactory;

    impl OrmFactory for StubOrmFactory {
        fn create(&self, _manager: Arc<dyn ConnectionManager>, schema: Value) -> Result<Arc<dyn OrmHandle>> {
            Ok(Arc::new(StubOrm(schema)))
        }
    }

    fn store(root: Value) -> Arc<MemoryConfigStore> {
        Arc::new(MemoryConfigStore::new(root))
    }

    fn builder(store: Arc<MemoryConfigStore>, reachable: bool) -> DatabaseFacadeBuilder {
        DatabaseFacade::builder(store)
            .manager_factory(Arc::new(StubManagerFactory {
                reachable,
                calls: AtomicUsize::new(0),
            }))
            .orm_factory(Arc::new(StubOrmFactory))
            .base_dir("/srv/app")
    }

    fn sqlite_config() -> Value {
        json!({"database": {"driver": "sqlite", "database": "/data/app.db"}})
    }

    #[test]
    fn test_missing_database_section() {
        let err = builder(store(json!({})), true).build().unwrap_err();
        assert!(matches!(err, DbNormError::Invalid(ConfigError::MissingConfig)));
    }

    #[test]
    fn test_invalid_config_never_reaches_factory() {
        let factory = Arc::new(StubManagerFactory {
            reachable: true,
            calls: AtomicUsize::new(0),
        });
        let store = store(json!({"database": {"driver": "oracle", "host": "db1"}}));

        let result = DatabaseFacade::builder(store.clone())
            .manager_factory(factory.clone())
            .orm_factory(Arc::new(StubOrmFactory))
            .base_dir("/srv/app")
            .build();

        assert!(matches!(
            result,
            Err(DbNormError::Invalid(ConfigError::UnsupportedDriver { .. }))
        ));
        assert_eq!(factory.calls.load(Ordering::SeqCst), 0);
        assert!(!store.has("orm"), "defaults must not be written on failure");
    }

    #[test]
    fn test_build_registers_orm_defaults() {
        let store = store(sqlite_config());
        builder(store.clone(), true).build().unwrap();

        assert_eq!(
            store.get("orm.proxies.directory"),
            Some(json!("/srv/app/storage/cycle/proxies"))
        );
        assert_eq!(
            store.get("orm.migrations.directory"),
            Some(json!("/srv/app/database/migrations"))
        );
        assert_eq!(store.get("orm.migrations.table"), Some(json!("cycle_migrations")));
        assert_eq!(store.get("orm.cache.enable"), Some(json!(false)));
        assert_eq!(
            store.get("orm.cache.directory"),
            Some(json!("/srv/app/storage/cycle/cache"))
        );
        assert_eq!(store.get("orm.schema"), Some(json!({})));
    }

    #[test]
    fn test_existing_orm_block_is_kept() {
        let mut root = sqlite_config();
        root["orm"] = json!({"schema": {"user": {"table": "users"}}});
        let store = store(root);

        let facade = builder(store.clone(), true).build().unwrap();

        assert_eq!(store.get("orm"), Some(json!({"schema": {"user": {"table": "users"}}})));
        assert_eq!(facade.orm().schema(), &json!({"user": {"table": "users"}}));
    }

    #[test]
    fn test_config_returns_raw_section() {
        let facade = builder(store(sqlite_config()), true).build().unwrap();
        assert_eq!(
            facade.config(),
            &json!({"driver": "sqlite", "database": "/data/app.db"})
        );
        assert_eq!(facade.normalized().default_database, "default");
        assert_eq!(facade.database(None).unwrap().name(), "default");
    }

    #[tokio::test]
    async fn test_connection_probe_success() {
        let facade = builder(store(sqlite_config()), true).build().unwrap();
        assert!(facade.test_connection(None).await.unwrap());
    }

    #[tokio::test]
    async fn test_connection_failure_is_wrapped() {
        let facade = builder(store(sqlite_config()), false).build().unwrap();
        let err = facade.test_connection(None).await.unwrap_err();

        match err {
            DbNormError::Connection(ConnectionError::TestFailed { database, source }) => {
                assert_eq!(database, "default");
                assert!(source.to_string().contains("connection refused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_unknown_database_is_wrapped() {
        let facade = builder(store(sqlite_config()), true).build().unwrap();
        let err = facade.test_connection(Some("archive")).await.unwrap_err();
        assert!(err.to_string().contains("unable to connect to database 'archive'"));
    }

    #[test]
    fn test_register_orm_defaults_reports_write() {
        let store = MemoryConfigStore::empty();
        assert!(register_orm_defaults(&store, Path::new("/srv/app")).unwrap());
        assert!(!register_orm_defaults(&store, Path::new("/elsewhere")).unwrap());
        assert_eq!(
            store.get("orm.proxies.directory"),
            Some(json!("/srv/app/storage/cycle/proxies"))
        );
    }
}
