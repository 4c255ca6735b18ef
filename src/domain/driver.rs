//! Database driver identifiers
//!
//! The set of drivers is closed: dispatch happens over [`Driver`] with
//! exhaustive matches instead of open-ended string comparisons.

use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported database drivers
///
/// # Examples
///
/// ```
/// use dbnorm::domain::Driver;
/// use std::str::FromStr;
///
/// let driver = Driver::from_str("pgsql").unwrap();
/// assert_eq!(driver, Driver::Postgres);
/// assert_eq!(driver.as_str(), "pgsql");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Driver {
    /// PostgreSQL (`pgsql`)
    #[serde(rename = "pgsql")]
    Postgres,
    /// MySQL / MariaDB (`mysql`)
    #[serde(rename = "mysql")]
    MySql,
    /// SQLite (`sqlite`)
    #[serde(rename = "sqlite")]
    Sqlite,
}

impl Driver {
    /// Returns the configuration identifier of the driver
    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Postgres => "pgsql",
            Driver::MySql => "mysql",
            Driver::Sqlite => "sqlite",
        }
    }

    /// All drivers, in registry order
    pub fn all() -> &'static [Driver] {
        &[Driver::Postgres, Driver::MySql, Driver::Sqlite]
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Driver {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pgsql" => Ok(Driver::Postgres),
            "mysql" => Ok(Driver::MySql),
            "sqlite" => Ok(Driver::Sqlite),
            other => Err(ConfigError::UnsupportedDriver {
                driver: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_from_str() {
        assert_eq!(Driver::from_str("pgsql").unwrap(), Driver::Postgres);
        assert_eq!(Driver::from_str("mysql").unwrap(), Driver::MySql);
        assert_eq!(Driver::from_str("sqlite").unwrap(), Driver::Sqlite);
    }

    #[test]
    fn test_driver_identifiers_are_case_sensitive() {
        let err = Driver::from_str("PGSQL").unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedDriver {
                driver: "PGSQL".to_string()
            }
        );
    }

    #[test]
    fn test_driver_round_trips_through_display() {
        for driver in Driver::all() {
            assert_eq!(Driver::from_str(&driver.to_string()).unwrap(), *driver);
        }
    }

    #[test]
    fn test_driver_serde_uses_identifiers() {
        let json = serde_json::to_string(&Driver::MySql).unwrap();
        assert_eq!(json, "\"mysql\"");
    }
}
