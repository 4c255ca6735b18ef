//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output
//! - Configurable log levels (overridable through `RUST_LOG`)
//! - JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use dbnorm::logging::init_logging;
//! use dbnorm::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the outcome of a connectivity probe
///
/// # Example
///
/// ```no_run
/// use dbnorm::log_connection_test;
///
/// log_connection_test!("default", "pgsql", true);
/// ```
#[macro_export]
macro_rules! log_connection_test {
    ($database:expr, $driver:expr, $reachable:expr) => {
        tracing::info!(
            database = %$database,
            driver = %$driver,
            reachable = $reachable,
            "Connection test finished"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use dbnorm::log_error_with_context;
/// use dbnorm::domain::DbNormError;
///
/// let error = DbNormError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::DbNormError;

    #[test]
    fn test_macros_expand_without_subscriber() {
        let error = DbNormError::Store("locked".to_string());
        log_error_with_context!(&error, "Failed to read store");
        log_connection_test!("default", "sqlite", false);
    }
}
