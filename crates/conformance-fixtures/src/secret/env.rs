//! Secret store backed by process environment variables.

use std::env::{self, VarError};

use conformance_contracts::{
    BulkGetSecretRequest, BulkSecretData, DriverError, GetSecretRequest, PropertyMap,
    SecretData, SecretDriver,
};

use super::{bulk, single};

/// Component type the store registers under.
pub const ENV_SECRET_TYPE: &str = "secretstores.local.env";

/// [`SecretDriver`] exposing every environment variable as a secret.
///
/// Variables whose name or value is not valid Unicode are left out of bulk
/// reads.
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    initialised: bool,
}

impl EnvSecretStore {
    /// Creates an uninitialised store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn ready(&self) -> Result<(), DriverError> {
        if self.initialised {
            Ok(())
        } else {
            Err(DriverError::NotInitialised {
                driver: String::from(ENV_SECRET_TYPE),
            })
        }
    }
}

impl SecretDriver for EnvSecretStore {
    fn init(&mut self, _properties: &PropertyMap) -> Result<(), DriverError> {
        self.initialised = true;
        Ok(())
    }

    fn get_secret(&self, request: &GetSecretRequest) -> Result<SecretData, DriverError> {
        self.ready()?;
        match env::var(request.name()) {
            Ok(value) => Ok(single(request.name(), value)),
            Err(VarError::NotPresent) => Err(DriverError::SecretNotFound {
                name: request.name().to_owned(),
            }),
            Err(VarError::NotUnicode(_)) => Err(DriverError::operation(
                "get_secret",
                format!("'{}' is not valid Unicode", request.name()),
            )),
        }
    }

    fn bulk_get_secret(
        &self,
        _request: &BulkGetSecretRequest,
    ) -> Result<BulkSecretData, DriverError> {
        self.ready()?;
        Ok(bulk(env::vars_os().filter_map(|(name, value)| {
            Some((name.into_string().ok()?, value.into_string().ok()?))
        })))
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.initialised = false;
        Ok(())
    }
}
