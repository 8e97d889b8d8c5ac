//! Key-value state storage contract.
//!
//! A [`StateDriver`] stores opaque byte values under string keys. Reading a
//! key that was never written (or was deleted) is not an error: `get`
//! returns `Ok(None)`, which is distinct from `Ok(Some(vec![]))`.
//!
//! Bulk operations apply per item. The contract does not require atomicity
//! across items, so a failing bulk call may leave some items applied. The
//! default bulk implementations simply loop over the singular operations;
//! backends with native batching override them.

use crate::error::DriverError;
use crate::properties::PropertyMap;

/// Request to write a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRequest {
    key: String,
    value: Vec<u8>,
}

impl SetRequest {
    /// Creates a write request.
    #[must_use]
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Returns the key.
    #[must_use]
    pub const fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the value bytes.
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// Request to read a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    key: String,
}

impl GetRequest {
    /// Creates a read request.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Returns the key.
    #[must_use]
    pub const fn key(&self) -> &str {
        self.key.as_str()
    }
}

/// Request to remove a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    key: String,
}

impl DeleteRequest {
    /// Creates a delete request.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Returns the key.
    #[must_use]
    pub const fn key(&self) -> &str {
        self.key.as_str()
    }
}

/// Contract for key-value state storage drivers.
pub trait StateDriver {
    /// Connects the driver using the resolved descriptor properties.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the properties are invalid or the
    /// backend cannot be reached.
    fn init(&mut self, properties: &PropertyMap) -> Result<(), DriverError>;

    /// Reads a value; `Ok(None)` means the key is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the backend read fails.
    fn get(&self, request: &GetRequest) -> Result<Option<Vec<u8>>, DriverError>;

    /// Writes a value, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the backend write fails.
    fn set(&self, request: &SetRequest) -> Result<(), DriverError>;

    /// Removes a value. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the backend delete fails.
    fn delete(&self, request: &DeleteRequest) -> Result<(), DriverError>;

    /// Writes several values.
    ///
    /// # Errors
    ///
    /// Returns the first [`DriverError`] encountered; earlier items may
    /// already be applied.
    fn bulk_set(&self, requests: &[SetRequest]) -> Result<(), DriverError> {
        requests.iter().try_for_each(|request| self.set(request))
    }

    /// Removes several values.
    ///
    /// # Errors
    ///
    /// Returns the first [`DriverError`] encountered; earlier items may
    /// already be removed.
    fn bulk_delete(&self, requests: &[DeleteRequest]) -> Result<(), DriverError> {
        requests.iter().try_for_each(|request| self.delete(request))
    }

    /// Releases backend resources.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the backend fails to shut down cleanly.
    fn close(&mut self) -> Result<(), DriverError> {
        Ok(())
    }
}

impl<T: StateDriver + ?Sized> StateDriver for Box<T> {
    fn init(&mut self, properties: &PropertyMap) -> Result<(), DriverError> {
        (**self).init(properties)
    }

    fn get(&self, request: &GetRequest) -> Result<Option<Vec<u8>>, DriverError> {
        (**self).get(request)
    }

    fn set(&self, request: &SetRequest) -> Result<(), DriverError> {
        (**self).set(request)
    }

    fn delete(&self, request: &DeleteRequest) -> Result<(), DriverError> {
        (**self).delete(request)
    }

    fn bulk_set(&self, requests: &[SetRequest]) -> Result<(), DriverError> {
        (**self).bulk_set(requests)
    }

    fn bulk_delete(&self, requests: &[DeleteRequest]) -> Result<(), DriverError> {
        (**self).bulk_delete(requests)
    }

    fn close(&mut self) -> Result<(), DriverError> {
        (**self).close()
    }
}
