//! PostgreSQL connections
//!
//! `pgsql` connections are served by a deadpool-postgres pool over
//! tokio-postgres.

pub mod client;

pub use client::PostgreSQLHandle;
