//! Core business logic for dbnorm.
//!
//! This module turns the raw `database` section of the configuration into
//! driver-specific connection specs and wires them into a facade.
//!
//! # Modules
//!
//! - [`registry`] - Static driver table and descriptor grammar
//! - [`validator`] - Structural and per-driver validation rules
//! - [`transformer`] - Validated config to [`NormalizedConfig`]
//! - [`facade`] - Construction pipeline and connectivity probe
//! - [`provider`] - Lazily built, process-wide facade
//!
//! # Workflow
//!
//! 1. **Read**: fetch `database` from the [`crate::config::ConfigStore`]
//! 2. **Validate**: detect the shape and check every connection
//! 3. **Transform**: build descriptors and the database to connection mapping
//! 4. **Wire**: create the connection manager and the ORM runtime
//! 5. **Register**: write the default `orm` block if the store has none
//!
//! # Example
//!
//! ```rust
//! use dbnorm::core::{transformer, validator};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "databases": {"default": {"connection": "main"}},
//!     "connections": {
//!         "main": {"driver": "mysql", "host": "db2", "port": 3307, "database": "shop", "username": "shop"}
//!     }
//! });
//!
//! let validated = validator::validate(&raw).unwrap();
//! let normalized = transformer::transform(&validated).unwrap();
//! assert_eq!(
//!     normalized.connections["main"].descriptor(),
//!     "mysql:host=db2;port=3307;dbname=shop;charset=utf8mb4"
//! );
//! ```

pub mod facade;
pub mod normalized;
pub mod provider;
pub mod registry;
pub mod transformer;
pub mod validator;

/// Synthetic database and connection name of the single-connection shape
pub const DEFAULT_NAME: &str = "default";

pub use facade::{register_orm_defaults, DatabaseFacade, DatabaseFacadeBuilder, PROBE_SQL};
pub use normalized::{ConnectionSpec, NormalizedConfig};
pub use provider::{DatabaseProvider, FacadeState};
pub use validator::{ConfigShape, ShapeKind, ValidatedConfig};
