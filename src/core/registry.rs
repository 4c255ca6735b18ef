//! Driver registry
//!
//! Static table of what each driver requires and how its connection
//! descriptor is spelled. The table is never mutated at runtime.
//!
//! | driver | required fields | default port | default charset | descriptor |
//! |---|---|---|---|---|
//! | pgsql | host, database, username | 5432 | utf8 | `pgsql:host=H;port=P;dbname=D;charset=C` |
//! | mysql | host, database, username | 3306 | utf8mb4 | `mysql:host=H;port=P;dbname=D;charset=C` |
//! | sqlite | database | | | `sqlite:PATH` |

use crate::domain::{ConfigError, Driver};
use std::str::FromStr;

/// Per-driver requirements and defaults
#[derive(Debug, PartialEq, Eq)]
pub struct DriverDescriptor {
    /// Driver this entry describes
    pub driver: Driver,

    /// Fields that must be present and non-empty, in check order
    pub required_fields: &'static [&'static str],

    /// Port used when the settings omit one
    pub default_port: Option<u16>,

    /// Charset used when the settings omit one
    pub default_charset: Option<&'static str>,
}

static DRIVERS: [DriverDescriptor; 3] = [
    DriverDescriptor {
        driver: Driver::Postgres,
        required_fields: &["host", "database", "username"],
        default_port: Some(5432),
        default_charset: Some("utf8"),
    },
    DriverDescriptor {
        driver: Driver::MySql,
        required_fields: &["host", "database", "username"],
        default_port: Some(3306),
        default_charset: Some("utf8mb4"),
    },
    DriverDescriptor {
        driver: Driver::Sqlite,
        required_fields: &["database"],
        default_port: None,
        default_charset: None,
    },
];

/// Looks up a driver by its configuration identifier
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedDriver`] for identifiers outside the table.
///
/// # Examples
///
/// ```
/// use dbnorm::core::registry;
///
/// let mysql = registry::lookup("mysql").unwrap();
/// assert_eq!(mysql.default_port, Some(3306));
/// assert!(registry::lookup("oracle").is_err());
/// ```
pub fn lookup(driver_id: &str) -> Result<&'static DriverDescriptor, ConfigError> {
    Driver::from_str(driver_id).map(descriptor)
}

/// Registry entry of a known driver
pub fn descriptor(driver: Driver) -> &'static DriverDescriptor {
    match driver {
        Driver::Postgres => &DRIVERS[0],
        Driver::MySql => &DRIVERS[1],
        Driver::Sqlite => &DRIVERS[2],
    }
}

impl DriverDescriptor {
    /// Renders the connection descriptor for this driver
    ///
    /// Port and charset fall back to the driver defaults. For sqlite only
    /// `database` (the file path) is used.
    pub fn build_descriptor(
        &self,
        host: Option<&str>,
        port: Option<u16>,
        database: &str,
        charset: Option<&str>,
    ) -> String {
        match self.driver {
            Driver::Postgres | Driver::MySql => format!(
                "{}:host={};port={};dbname={};charset={}",
                self.driver.as_str(),
                host.unwrap_or_default(),
                port.or(self.default_port).unwrap_or_default(),
                database,
                charset.or(self.default_charset).unwrap_or_default(),
            ),
            Driver::Sqlite => format!("sqlite:{database}"),
        }
    }
}

/// A descriptor split back into its parts
///
/// Adapters use this to turn a descriptor into driver connection options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDescriptor {
    /// pgsql / mysql server descriptor
    Network {
        driver: Driver,
        host: String,
        port: u16,
        dbname: String,
        charset: String,
    },
    /// sqlite file descriptor
    File { path: String },
}

impl ParsedDescriptor {
    /// Parses a descriptor produced by [`DriverDescriptor::build_descriptor`]
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedDriver`] for an unknown prefix and
    /// [`ConfigError::InvalidField`] (field `connection`) for malformed parts.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbnorm::core::registry::ParsedDescriptor;
    ///
    /// let parsed = ParsedDescriptor::parse("main", "sqlite:/data/app.db").unwrap();
    /// assert_eq!(parsed, ParsedDescriptor::File { path: "/data/app.db".to_string() });
    /// ```
    pub fn parse(connection: &str, text: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidField {
            connection: connection.to_string(),
            field: "connection".to_string(),
            reason,
        };

        let (prefix, rest) = text
            .split_once(':')
            .ok_or_else(|| invalid(format!("descriptor '{text}' has no driver prefix")))?;
        let driver = Driver::from_str(prefix)?;

        if driver == Driver::Sqlite {
            if rest.is_empty() {
                return Err(invalid("sqlite descriptor has no path".to_string()));
            }
            return Ok(ParsedDescriptor::File {
                path: rest.to_string(),
            });
        }

        let mut host = None;
        let mut port = None;
        let mut dbname = None;
        let mut charset = None;
        for pair in rest.split(';').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| invalid(format!("malformed descriptor part '{pair}'")))?;
            match key {
                "host" => host = Some(value.to_string()),
                "port" => {
                    port = Some(
                        value
                            .parse::<u16>()
                            .map_err(|_| invalid(format!("port '{value}' is not a valid port")))?,
                    )
                }
                "dbname" => dbname = Some(value.to_string()),
                "charset" => charset = Some(value.to_string()),
                _ => {}
            }
        }

        let entry = descriptor(driver);
        Ok(ParsedDescriptor::Network {
            driver,
            host: host.ok_or_else(|| invalid("descriptor has no host".to_string()))?,
            port: port.or(entry.default_port).unwrap_or_default(),
            dbname: dbname.ok_or_else(|| invalid("descriptor has no dbname".to_string()))?,
            charset: charset
                .or_else(|| entry.default_charset.map(str::to_string))
                .unwrap_or_default(),
        })
    }
}
