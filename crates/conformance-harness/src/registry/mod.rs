//! Driver factories keyed by component type.
//!
//! A [`DriverRegistry`] maps a descriptor's `spec.type` (for example
//! `state.memory`) to a factory producing a fresh driver of the matching
//! family. Each family has its own table and duplicate registrations are
//! rejected.

use std::collections::HashMap;
use std::fmt;

use conformance_contracts::{CapabilityFamily, PubSubDriver, SecretDriver, StateDriver};

use crate::error::SetupError;

/// Factory for state drivers.
pub type StateFactory = Box<dyn Fn() -> Box<dyn StateDriver> + Send + Sync>;
/// Factory for pub/sub drivers.
pub type PubSubFactory = Box<dyn Fn() -> Box<dyn PubSubDriver> + Send + Sync>;
/// Factory for secret drivers.
pub type SecretFactory = Box<dyn Fn() -> Box<dyn SecretDriver> + Send + Sync>;

/// Registry of driver factories.
///
/// # Example
///
/// ```
/// use conformance_contracts::{
///     DeleteRequest, DriverError, GetRequest, PropertyMap, SetRequest, StateDriver,
/// };
/// use conformance_harness::DriverRegistry;
///
/// struct Null;
///
/// impl StateDriver for Null {
///     fn init(&mut self, _: &PropertyMap) -> Result<(), DriverError> { Ok(()) }
///     fn get(&self, _: &GetRequest) -> Result<Option<Vec<u8>>, DriverError> { Ok(None) }
///     fn set(&self, _: &SetRequest) -> Result<(), DriverError> { Ok(()) }
///     fn delete(&self, _: &DeleteRequest) -> Result<(), DriverError> { Ok(()) }
/// }
///
/// let mut registry = DriverRegistry::new();
/// registry
///     .register_state("state.null", || Box::new(Null))
///     .expect("first registration succeeds");
/// assert!(registry.register_state("state.null", || Box::new(Null)).is_err());
/// assert!(registry.state_driver("state.null").is_ok());
/// ```
#[derive(Default)]
pub struct DriverRegistry {
    state: HashMap<String, StateFactory>,
    pubsub: HashMap<String, PubSubFactory>,
    secret: HashMap<String, SecretFactory>,
}

impl DriverRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a state driver factory.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::DuplicateFactory`] if `component_type` is
    /// already registered for the state family.
    pub fn register_state<F>(
        &mut self,
        component_type: impl Into<String>,
        factory: F,
    ) -> Result<(), SetupError>
    where
        F: Fn() -> Box<dyn StateDriver> + Send + Sync + 'static,
    {
        insert_unique(
            &mut self.state,
            CapabilityFamily::State,
            component_type.into(),
            Box::new(factory),
        )
    }

    /// Registers a pub/sub driver factory.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::DuplicateFactory`] if `component_type` is
    /// already registered for the pub/sub family.
    pub fn register_pubsub<F>(
        &mut self,
        component_type: impl Into<String>,
        factory: F,
    ) -> Result<(), SetupError>
    where
        F: Fn() -> Box<dyn PubSubDriver> + Send + Sync + 'static,
    {
        insert_unique(
            &mut self.pubsub,
            CapabilityFamily::PubSub,
            component_type.into(),
            Box::new(factory),
        )
    }

    /// Registers a secret driver factory.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::DuplicateFactory`] if `component_type` is
    /// already registered for the secret family.
    pub fn register_secret<F>(
        &mut self,
        component_type: impl Into<String>,
        factory: F,
    ) -> Result<(), SetupError>
    where
        F: Fn() -> Box<dyn SecretDriver> + Send + Sync + 'static,
    {
        insert_unique(
            &mut self.secret,
            CapabilityFamily::SecretStore,
            component_type.into(),
            Box::new(factory),
        )
    }

    /// Builds a fresh state driver for `component_type`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownComponentType`] if nothing is registered.
    pub fn state_driver(&self, component_type: &str) -> Result<Box<dyn StateDriver>, SetupError> {
        lookup(&self.state, CapabilityFamily::State, component_type).map(|factory| factory())
    }

    /// Builds a fresh pub/sub driver for `component_type`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownComponentType`] if nothing is registered.
    pub fn pubsub_driver(
        &self,
        component_type: &str,
    ) -> Result<Box<dyn PubSubDriver>, SetupError> {
        lookup(&self.pubsub, CapabilityFamily::PubSub, component_type).map(|factory| factory())
    }

    /// Builds a fresh secret driver for `component_type`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownComponentType`] if nothing is registered.
    pub fn secret_driver(
        &self,
        component_type: &str,
    ) -> Result<Box<dyn SecretDriver>, SetupError> {
        lookup(&self.secret, CapabilityFamily::SecretStore, component_type)
            .map(|factory| factory())
    }

    /// Registered component types for `family`, sorted.
    #[must_use]
    pub fn component_types(&self, family: CapabilityFamily) -> Vec<&str> {
        let mut types: Vec<&str> = match family {
            CapabilityFamily::State => self.state.keys().map(String::as_str).collect(),
            CapabilityFamily::PubSub => self.pubsub.keys().map(String::as_str).collect(),
            CapabilityFamily::SecretStore => self.secret.keys().map(String::as_str).collect(),
        };
        types.sort_unstable();
        types
    }

    /// Total number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len() + self.pubsub.len() + self.secret.len()
    }

    /// Returns `true` when no factories are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("state", &self.component_types(CapabilityFamily::State))
            .field("pubsub", &self.component_types(CapabilityFamily::PubSub))
            .field("secret", &self.component_types(CapabilityFamily::SecretStore))
            .finish()
    }
}

fn insert_unique<T>(
    table: &mut HashMap<String, T>,
    family: CapabilityFamily,
    component_type: String,
    factory: T,
) -> Result<(), SetupError> {
    if table.contains_key(&component_type) {
        return Err(SetupError::DuplicateFactory {
            family,
            component_type,
        });
    }
    table.insert(component_type, factory);
    Ok(())
}

fn lookup<'a, T>(
    table: &'a HashMap<String, T>,
    family: CapabilityFamily,
    component_type: &str,
) -> Result<&'a T, SetupError> {
    table
        .get(component_type)
        .ok_or_else(|| SetupError::UnknownComponentType {
            family,
            component_type: component_type.to_owned(),
        })
}
