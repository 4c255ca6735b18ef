//! Connection abstraction traits
//!
//! This module defines the seams between the normalization core and the
//! runtime that actually talks to databases: a connection manager built from
//! a [`NormalizedConfig`], the per-connection handles it hands out, and the
//! ORM runtime built on top of the manager.

use crate::core::NormalizedConfig;
use crate::domain::{ConnectionError, Driver, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// A live (possibly lazily connected) database connection
///
/// Handles are shared: several database names may map onto the same
/// connection and therefore the same handle.
#[async_trait]
pub trait ConnectionHandle: Send + Sync {
    /// Name of the connection this handle serves
    fn name(&self) -> &str;

    /// Driver behind the handle
    fn driver(&self) -> Driver;

    /// Runs `sql` and reports whether it returned at least one row
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be obtained or the query fails.
    async fn fetch_first(&self, sql: &str) -> std::result::Result<bool, ConnectionError>;
}

/// Resolves database names to connection handles
pub trait ConnectionManager: Send + Sync {
    /// Handle for `name`, or for the default database when `None`
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::UnknownDatabase`] for undeclared names.
    fn database(
        &self,
        name: Option<&str>,
    ) -> std::result::Result<Arc<dyn ConnectionHandle>, ConnectionError>;

    /// Every database name this manager can resolve
    fn database_names(&self) -> Vec<String>;
}

/// Builds a [`ConnectionManager`] from normalized configuration
pub trait ConnectionManagerFactory: Send + Sync {
    /// Creates the manager
    ///
    /// # Errors
    ///
    /// Returns an error if any connection cannot be prepared.
    fn create(&self, config: &NormalizedConfig) -> Result<Arc<dyn ConnectionManager>>;
}

/// Opaque handle to the ORM runtime
pub trait OrmHandle: Send + Sync {
    /// Downcast to Any for runtime-specific operations
    fn as_any(&self) -> &dyn Any;

    /// Schema definition the runtime was built with
    fn schema(&self) -> &Value;

    /// Connection manager the runtime sits on
    fn manager(&self) -> Arc<dyn ConnectionManager>;
}

/// Builds an [`OrmHandle`] on top of a connection manager
pub trait OrmFactory: Send + Sync {
    /// Creates the ORM runtime
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be compiled.
    fn create(&self, manager: Arc<dyn ConnectionManager>, schema: Value)
        -> Result<Arc<dyn OrmHandle>>;
}
