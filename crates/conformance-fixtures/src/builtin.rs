//! Registration of the fixture drivers with a [`DriverRegistry`].

use conformance_harness::{DriverRegistry, SetupError};

use crate::pubsub::{MEMORY_PUBSUB_TYPE, MemoryPubSub};
use crate::secret::{ENV_SECRET_TYPE, EnvSecretStore, FILE_SECRET_TYPE, LocalFileSecretStore};
use crate::state::{MEMORY_STATE_TYPE, MemoryStateStore};

/// Registers every fixture driver under its component type.
///
/// # Errors
///
/// Returns [`SetupError::DuplicateFactory`] when `registry` already holds a
/// factory for one of the fixture component types.
pub fn register_fixtures(registry: &mut DriverRegistry) -> Result<(), SetupError> {
    registry.register_state(MEMORY_STATE_TYPE, || Box::new(MemoryStateStore::new()))?;
    registry.register_pubsub(MEMORY_PUBSUB_TYPE, || Box::new(MemoryPubSub::new()))?;
    registry.register_secret(FILE_SECRET_TYPE, || Box::new(LocalFileSecretStore::new()))?;
    registry.register_secret(ENV_SECRET_TYPE, || Box::new(EnvSecretStore::new()))?;
    Ok(())
}

/// Returns a registry holding only the fixture drivers.
///
/// # Errors
///
/// Propagates errors from [`register_fixtures`].
pub fn fixture_registry() -> Result<DriverRegistry, SetupError> {
    let mut registry = DriverRegistry::new();
    register_fixtures(&mut registry)?;
    Ok(registry)
}
