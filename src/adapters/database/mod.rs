//! Connection abstraction layer
//!
//! Traits the core talks to, plus the default pooled implementation that
//! dispatches to the driver adapters.

pub mod factory;
pub mod pool;
pub mod traits;

pub use factory::{create_connection_handle, PooledConnectionManager, PooledConnectionManagerFactory};
pub use pool::PoolSettings;
pub use traits::{ConnectionHandle, ConnectionManager, ConnectionManagerFactory, OrmFactory, OrmHandle};
