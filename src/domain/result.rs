//! Result type alias for dbnorm

use super::errors::DbNormError;

/// Result type alias for dbnorm operations
///
/// # Examples
///
/// ```
/// use dbnorm::domain::result::Result;
/// use dbnorm::domain::errors::{ConfigError, DbNormError};
///
/// fn failing_function() -> Result<()> {
///     Err(DbNormError::Invalid(ConfigError::MissingConfig))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DbNormError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ConfigError;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> std::result::Result<i32, ConfigError> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
