//! Schema-holding ORM runtime
//!
//! The default [`OrmHandle`]: it keeps the schema definition from
//! `orm.schema` and the connection manager it was built on, and leaves entity
//! mapping to whatever runtime downcasts it.

use crate::adapters::database::{ConnectionManager, OrmFactory, OrmHandle};
use crate::domain::{DbNormError, Result};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// ORM handle over a schema definition
pub struct SchemaOrm {
    manager: Arc<dyn ConnectionManager>,
    schema: Value,
}

impl SchemaOrm {
    /// Entity names declared by the schema
    pub fn entities(&self) -> Vec<&str> {
        self.schema
            .as_object()
            .map(|entities| entities.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl OrmHandle for SchemaOrm {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn schema(&self) -> &Value {
        &self.schema
    }

    fn manager(&self) -> Arc<dyn ConnectionManager> {
        Arc::clone(&self.manager)
    }
}

/// Default factory: builds a [`SchemaOrm`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaOrmFactory;

impl OrmFactory for SchemaOrmFactory {
    fn create(&self, manager: Arc<dyn ConnectionManager>, schema: Value) -> Result<Arc<dyn OrmHandle>> {
        if !schema.is_object() {
            return Err(DbNormError::Configuration(format!(
                "orm.schema must be a table, found {schema}"
            )));
        }

        tracing::debug!(entities = schema.as_object().map_or(0, |s| s.len()), "ORM schema loaded");
        Ok(Arc::new(SchemaOrm { manager, schema }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::{ConnectionManagerFactory, PooledConnectionManagerFactory};
    use crate::core::{transformer, validator};
    use serde_json::json;

    fn manager() -> Arc<dyn ConnectionManager> {
        let raw = json!({"driver": "sqlite", "database": ":memory:"});
        let normalized = transformer::transform(&validator::validate(&raw).unwrap()).unwrap();
        PooledConnectionManagerFactory.create(&normalized).unwrap()
    }

    #[test]
    fn test_schema_orm_keeps_schema_and_manager() {
        let manager = manager();
        let orm = SchemaOrmFactory
            .create(Arc::clone(&manager), json!({"user": {"table": "users"}, "post": {}}))
            .unwrap();

        assert_eq!(orm.schema()["user"]["table"], "users");
        assert!(Arc::ptr_eq(&orm.manager(), &manager));

        let schema_orm = orm.as_any().downcast_ref::<SchemaOrm>().unwrap();
        assert_eq!(schema_orm.entities(), vec!["user", "post"]);
    }

    #[test]
    fn test_non_table_schema_is_rejected() {
        let result = SchemaOrmFactory.create(manager(), json!(["user"]));
        assert!(matches!(result, Err(DbNormError::Configuration(_))));
    }
}
