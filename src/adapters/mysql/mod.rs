//! MySQL connections
//!
//! `mysql` connections are served by an sqlx pool.

pub mod client;

pub use client::MySqlHandle;
