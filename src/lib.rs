// dbnorm - Database connection configuration normalizer
// Copyright (c) 2025 dbnorm Contributors
// Licensed under the MIT License

//! # dbnorm - database connection configuration normalizer
//!
//! dbnorm turns heterogeneous database connection settings into a validated,
//! driver-specific representation and wires it into a connection manager and
//! an ORM runtime.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Validating** a `database` configuration section rule by rule
//! - **Normalizing** it into connection descriptors and credentials for
//!   `pgsql`, `mysql` and `sqlite`
//! - **Wiring** the result into pooled connections and an ORM handle
//! - **Probing** connectivity with a round-trip query
//!
//! ## Architecture
//!
//! dbnorm follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Validation, transformation, facade and provider
//! - [`adapters`] - Connection managers, driver handles, ORM handle
//! - [`domain`] - Driver identifiers and error types
//! - [`config`] - Configuration store and loading
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dbnorm::config::load_config;
//! use dbnorm::core::DatabaseFacade;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(load_config("dbnorm.toml")?);
//!     let facade = DatabaseFacade::builder(store).build()?;
//!
//!     let reports = facade.database(Some("reports"))?;
//!     println!("reports uses connection {}", reports.name());
//!
//!     facade.test_connection(None).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Rule violations are [`domain::ConfigError`] values naming the offending
//! entry; connection failures are [`domain::ConnectionError`]. Both convert
//! into [`domain::DbNormError`] with the `?` operator:
//!
//! ```rust
//! use dbnorm::core::validator;
//! use dbnorm::domain::{ConfigError, DbNormError};
//! use serde_json::json;
//!
//! fn check(raw: serde_json::Value) -> Result<(), DbNormError> {
//!     validator::validate(&raw)?;
//!     Ok(())
//! }
//!
//! let err = check(json!({"driver": "pgsql", "database": "app"})).unwrap_err();
//! assert!(matches!(
//!     err,
//!     DbNormError::Invalid(ConfigError::MissingRequiredField { ref field, .. }) if field == "host"
//! ));
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
