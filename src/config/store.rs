//! Key-value configuration store
//!
//! The facade reads its raw `database` section and the `orm` block through
//! the narrow [`ConfigStore`] interface. Keys are dotted paths into a JSON
//! tree (`orm.schema`, `database.connections.main.host`).
//!
//! [`MemoryConfigStore`] is the in-process implementation used by the CLI and
//! the tests; it is filled by [`crate::config::loader`].

use crate::domain::{DbNormError, Result};
use serde_json::{Map, Value};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Narrow read/write interface over the process configuration
pub trait ConfigStore: Send + Sync {
    /// Value stored at a dotted `key`, if any
    fn get(&self, key: &str) -> Option<Value>;

    /// Whether anything (including `null`) is stored at `key`
    fn has(&self, key: &str) -> bool;

    /// Stores `value` at `key`, creating intermediate tables
    ///
    /// # Errors
    ///
    /// Returns an error if an intermediate segment holds a non-table value.
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Value at `key`, or `default` when absent
    fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Stores `value` only when `key` is absent; returns whether it wrote
    ///
    /// Implementations backed by shared state should override this so the
    /// check and the write happen under one lock.
    fn set_if_absent(&self, key: &str, value: Value) -> Result<bool> {
        if self.has(key) {
            return Ok(false);
        }
        self.set(key, value)?;
        Ok(true)
    }
}

/// In-memory [`ConfigStore`] over a JSON tree
///
/// # Examples
///
/// ```
/// use dbnorm::config::{ConfigStore, MemoryConfigStore};
/// use serde_json::json;
///
/// let store = MemoryConfigStore::new(json!({"orm": {"schema": {}}}));
/// assert!(store.has("orm.schema"));
/// store.set("database.driver", json!("sqlite")).unwrap();
/// assert_eq!(store.get("database.driver"), Some(json!("sqlite")));
/// ```
#[derive(Debug)]
pub struct MemoryConfigStore {
    root: RwLock<Value>,
}

impl MemoryConfigStore {
    /// Creates a store over `root`; a non-table root is replaced by an empty table
    pub fn new(root: Value) -> Self {
        let root = match root {
            Value::Object(_) => root,
            _ => Value::Object(Map::new()),
        };
        Self {
            root: RwLock::new(root),
        }
    }

    /// Creates an empty store
    pub fn empty() -> Self {
        Self::new(Value::Object(Map::new()))
    }

    /// Copy of the whole tree
    pub fn snapshot(&self) -> Result<Value> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Value>> {
        self.root
            .read()
            .map_err(|_| DbNormError::Store("config store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Value>> {
        self.root
            .write()
            .map_err(|_| DbNormError::Store("config store lock poisoned".to_string()))
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Option<Value> {
        let root = self.read().ok()?;
        lookup(&root, key).cloned()
    }

    fn has(&self, key: &str) -> bool {
        self.read()
            .map(|root| lookup(&root, key).is_some())
            .unwrap_or(false)
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut root = self.write()?;
        insert(&mut root, key, value)
    }

    fn set_if_absent(&self, key: &str, value: Value) -> Result<bool> {
        let mut root = self.write()?;
        if lookup(&root, key).is_some() {
            return Ok(false);
        }
        insert(&mut root, key, value)?;
        Ok(true)
    }
}

/// Splits a dotted key; empty segments are rejected by callers
fn segments(key: &str) -> impl Iterator<Item = &str> {
    key.split('.').filter(|segment| !segment.is_empty())
}

fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    segments(key).try_fold(root, |node, segment| node.as_object()?.get(segment))
}

fn insert(root: &mut Value, key: &str, value: Value) -> Result<()> {
    let parts: Vec<&str> = segments(key).collect();
    let Some((last, parents)) = parts.split_last() else {
        return Err(DbNormError::Store(format!("invalid config key '{key}'")));
    };

    let mut node = root;
    for (depth, segment) in parents.iter().enumerate() {
        let table = node.as_object_mut().ok_or_else(|| {
            DbNormError::Store(format!(
                "cannot set '{key}': '{}' is not a table",
                parts[..depth].join(".")
            ))
        })?;
        node = table
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    let table = node.as_object_mut().ok_or_else(|| {
        DbNormError::Store(format!(
            "cannot set '{key}': '{}' is not a table",
            parents.join(".")
        ))
    })?;
    table.insert(last.to_string(), value);
    Ok(())
}
