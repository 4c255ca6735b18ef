//! Database runtime integrations for dbnorm.
//!
//! This module provides the collaborators the facade is wired to:
//!
//! - [`database`] - Connection traits and the pooled connection manager
//! - [`postgresql`] - PostgreSQL handles (deadpool-postgres)
//! - [`mysql`] - MySQL handles (sqlx)
//! - [`sqlite`] - SQLite handles (sqlx)
//! - [`orm`] - Schema-holding ORM handle
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate driver crates and
//! enable testing with mock implementations. The facade only sees the traits
//! in [`database::traits`]; any of them can be replaced through
//! [`crate::core::DatabaseFacade::builder`].
//!
//! ```rust,no_run
//! use dbnorm::adapters::database::{ConnectionManagerFactory, PooledConnectionManagerFactory};
//! use dbnorm::core::{transformer, validator};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = json!({"driver": "sqlite", "database": "/data/app.db"});
//! let normalized = transformer::transform(&validator::validate(&raw)?)?;
//!
//! let manager = PooledConnectionManagerFactory.create(&normalized)?;
//! let reachable = manager.database(None)?.fetch_first("SELECT 1 as test").await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod mysql;
pub mod orm;
pub mod postgresql;
pub mod sqlite;
