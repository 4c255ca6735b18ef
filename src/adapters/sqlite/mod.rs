//! SQLite connections
//!
//! `sqlite` connections are served by an sqlx pool over a database file (or
//! `:memory:`).

pub mod client;

pub use client::SqliteHandle;
