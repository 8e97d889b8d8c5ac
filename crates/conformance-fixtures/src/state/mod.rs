//! In-memory state store.
//!
//! [`MemoryStateStore`] keeps values in a mutex-guarded map and is safe to
//! share across threads. Bulk operations take the lock once per call, so a
//! batch is applied atomically with respect to other callers. Every
//! operation first consults the store's [`FaultInjector`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use conformance_contracts::{
    DeleteRequest, DriverError, GetRequest, PropertyMap, SetRequest, StateDriver,
};
use tracing::debug;

use crate::fault::FaultInjector;

/// Component type the store registers under.
pub const MEMORY_STATE_TYPE: &str = "state.in-memory";

/// Optional property capping the number of stored keys.
pub const MAX_ENTRIES_PROPERTY: &str = "maxEntries";

/// Map-backed [`StateDriver`].
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    faults: Arc<FaultInjector>,
    max_entries: Option<usize>,
    initialised: bool,
    closed: bool,
}

impl MemoryStateStore {
    /// Creates an empty store with no faults armed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares `faults` with the store.
    #[must_use]
    pub fn with_faults(mut self, faults: Arc<FaultInjector>) -> Self {
        self.faults = faults;
        self
    }

    /// Returns the store's fault injector.
    #[must_use]
    pub const fn faults(&self) -> &Arc<FaultInjector> {
        &self.faults
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn ready(&self, operation: &str) -> Result<(), DriverError> {
        if self.closed {
            return Err(DriverError::Closed {
                driver: String::from(MEMORY_STATE_TYPE),
            });
        }
        if !self.initialised {
            return Err(DriverError::NotInitialised {
                driver: String::from(MEMORY_STATE_TYPE),
            });
        }
        self.faults.check(operation)
    }

    fn insert_all<'a, I>(&self, requests: I) -> Result<(), DriverError>
    where
        I: IntoIterator<Item = &'a SetRequest>,
    {
        let mut entries = self.lock();
        for request in requests {
            if let Some(limit) = self.max_entries
                && !entries.contains_key(request.key())
                && entries.len() >= limit
            {
                return Err(DriverError::operation(
                    "set",
                    format!("store is full ({limit} entries)"),
                ));
            }
            entries.insert(request.key().to_owned(), request.value().to_vec());
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateDriver for MemoryStateStore {
    fn init(&mut self, properties: &PropertyMap) -> Result<(), DriverError> {
        self.faults.check("init")?;
        self.faults.configure(properties)?;
        self.max_entries = properties.parse::<usize>(MAX_ENTRIES_PROPERTY)?;
        self.initialised = true;
        self.closed = false;
        debug!(
            target: "conformance::fixtures",
            max_entries = ?self.max_entries,
            "memory state store initialised"
        );
        Ok(())
    }

    fn get(&self, request: &GetRequest) -> Result<Option<Vec<u8>>, DriverError> {
        self.ready("get")?;
        Ok(self.lock().get(request.key()).cloned())
    }

    fn set(&self, request: &SetRequest) -> Result<(), DriverError> {
        self.ready("set")?;
        self.insert_all([request])
    }

    fn delete(&self, request: &DeleteRequest) -> Result<(), DriverError> {
        self.ready("delete")?;
        self.lock().remove(request.key());
        Ok(())
    }

    fn bulk_set(&self, requests: &[SetRequest]) -> Result<(), DriverError> {
        self.ready("bulk_set")?;
        self.insert_all(requests)
    }

    fn bulk_delete(&self, requests: &[DeleteRequest]) -> Result<(), DriverError> {
        self.ready("bulk_delete")?;
        let mut entries = self.lock();
        for request in requests {
            entries.remove(request.key());
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.faults.check("close")?;
        self.closed = true;
        self.lock().clear();
        Ok(())
    }
}
