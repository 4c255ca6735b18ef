//! Process-wide facade provider
//!
//! Builds the [`DatabaseFacade`] on first request and hands out the same
//! instance afterwards. Construction runs under a mutex, so the ORM defaults
//! are registered by one facade only.

use super::facade::{DatabaseFacade, DatabaseFacadeBuilder};
use crate::domain::{DbNormError, Result};
use std::sync::{Arc, Mutex};

/// Lifecycle of the provided facade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacadeState {
    /// Not requested yet
    Uninitialized,
    /// Built and cached
    Ready,
    /// Construction failed; the message of the original error
    Failed(String),
}

enum Slot {
    Uninitialized(DatabaseFacadeBuilder),
    Ready(Arc<DatabaseFacade>),
    Failed(String),
}

/// Lazily constructs and caches one [`DatabaseFacade`]
pub struct DatabaseProvider {
    slot: Mutex<Slot>,
}

impl DatabaseProvider {
    /// Wrap a configured builder; nothing is built until [`Self::get`]
    pub fn new(builder: DatabaseFacadeBuilder) -> Self {
        Self {
            slot: Mutex::new(Slot::Uninitialized(builder)),
        }
    }

    /// The facade, built on first call
    ///
    /// # Errors
    ///
    /// The first failing call returns the construction error itself; later
    /// calls return [`DbNormError::FacadeUnavailable`] with its message.
    pub fn get(&self) -> Result<Arc<DatabaseFacade>> {
        let mut slot = self.slot.lock().map_err(|_| {
            DbNormError::FacadeUnavailable("database provider lock poisoned".to_string())
        })?;

        // The builder is consumed; every arm puts a slot back.
        match std::mem::replace(&mut *slot, Slot::Failed(String::new())) {
            Slot::Ready(facade) => {
                *slot = Slot::Ready(Arc::clone(&facade));
                Ok(facade)
            }
            Slot::Failed(message) => {
                *slot = Slot::Failed(message.clone());
                Err(DbNormError::FacadeUnavailable(message))
            }
            Slot::Uninitialized(builder) => match builder.build() {
                Ok(facade) => {
                    let facade = Arc::new(facade);
                    *slot = Slot::Ready(Arc::clone(&facade));
                    Ok(facade)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Database facade construction failed");
                    *slot = Slot::Failed(e.to_string());
                    Err(e)
                }
            },
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> FacadeState {
        match self.slot.lock() {
            Ok(slot) => match &*slot {
                Slot::Uninitialized(_) => FacadeState::Uninitialized,
                Slot::Ready(_) => FacadeState::Ready,
                Slot::Failed(message) => FacadeState::Failed(message.clone()),
            },
            Err(_) => FacadeState::Failed("database provider lock poisoned".to_string()),
        }
    }
}
