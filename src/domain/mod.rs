//! Domain types shared by every layer of dbnorm.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Driver identifiers** ([`Driver`]), a closed set of supported engines
//! - **Error types** ([`DbNormError`], [`ConfigError`], [`ConnectionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]; rule violations convert into
//! [`DbNormError`] with the `?` operator:
//!
//! ```rust
//! use dbnorm::domain::{ConfigError, Result};
//!
//! fn check(driver: &str) -> Result<()> {
//!     let _driver: dbnorm::domain::Driver = driver.parse()?;
//!     Ok(())
//! }
//!
//! assert!(check("sqlite").is_ok());
//! assert!(check("oracle").is_err());
//! ```

pub mod driver;
pub mod errors;
pub mod result;

pub use driver::Driver;
pub use errors::{ConfigError, ConnectionError, DbNormError};
pub use result::Result;
