//! Secret retrieval contract.

use std::collections::HashMap;

use crate::error::DriverError;
use crate::properties::PropertyMap;

/// Values of one secret, keyed by version or sub-key.
pub type SecretData = HashMap<String, String>;

/// Every secret a store exposes, keyed by secret name.
pub type BulkSecretData = HashMap<String, SecretData>;

/// Request for a single named secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSecretRequest {
    name: String,
    metadata: HashMap<String, String>,
}

impl GetSecretRequest {
    /// Creates a request for `name` with no metadata.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attaches store-specific metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the secret name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}

/// Request for every secret the store exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkGetSecretRequest {
    metadata: HashMap<String, String>,
}

impl BulkGetSecretRequest {
    /// Creates a bulk request carrying `metadata`.
    #[must_use]
    pub const fn new(metadata: HashMap<String, String>) -> Self {
        Self { metadata }
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}

/// Contract for secret store drivers. Stores are read-only to the harness.
pub trait SecretDriver {
    /// Connects the driver using the resolved descriptor properties.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the properties are invalid or the
    /// backing store cannot be read.
    fn init(&mut self, properties: &PropertyMap) -> Result<(), DriverError>;

    /// Returns the values of one secret.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::SecretNotFound`] for unknown names, or another
    /// [`DriverError`] when the store fails.
    fn get_secret(&self, request: &GetSecretRequest) -> Result<SecretData, DriverError>;

    /// Returns every secret in the store.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the store fails.
    fn bulk_get_secret(
        &self,
        request: &BulkGetSecretRequest,
    ) -> Result<BulkSecretData, DriverError>;

    /// Releases backend resources.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the backend fails to shut down cleanly.
    fn close(&mut self) -> Result<(), DriverError> {
        Ok(())
    }
}

impl<T: SecretDriver + ?Sized> SecretDriver for Box<T> {
    fn init(&mut self, properties: &PropertyMap) -> Result<(), DriverError> {
        (**self).init(properties)
    }

    fn get_secret(&self, request: &GetSecretRequest) -> Result<SecretData, DriverError> {
        (**self).get_secret(request)
    }

    fn bulk_get_secret(
        &self,
        request: &BulkGetSecretRequest,
    ) -> Result<BulkSecretData, DriverError> {
        (**self).bulk_get_secret(request)
    }

    fn close(&mut self) -> Result<(), DriverError> {
        (**self).close()
    }
}
