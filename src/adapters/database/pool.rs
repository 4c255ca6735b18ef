//! Pool sizing shared by every driver adapter

use crate::core::ConnectionSpec;
use std::time::Duration;

/// Connection timeout used when `connect_timeout` is not set
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Pool size used for network drivers when `max_connections` is not set
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Pool limits read from a spec's `options`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on open connections
    pub max_connections: u32,

    /// How long to wait for a connection before failing
    pub connect_timeout: Duration,
}

impl PoolSettings {
    /// Reads `max_connections` and `connect_timeout` (seconds)
    ///
    /// Zero or unparsable values fall back to the defaults.
    pub fn from_spec(spec: &ConnectionSpec, default_max_connections: u32) -> Self {
        let max_connections = spec
            .option_u64("max_connections")
            .and_then(|value| u32::try_from(value).ok())
            .filter(|value| *value > 0)
            .unwrap_or(default_max_connections);

        let connect_timeout = spec
            .option_u64("connect_timeout")
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        Self {
            max_connections,
            connect_timeout: Duration::from_secs(connect_timeout),
        }
    }
}
