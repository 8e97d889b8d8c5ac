//! Setup errors.
//!
//! A setup error aborts a family run before any phase executes. Driver
//! errors, mismatches, and budget violations are never setup errors; they
//! accumulate in the report instead.

use std::sync::Arc;

use conformance_config::{ConfigError, CredentialError};
use conformance_contracts::CapabilityFamily;
use conformance_descriptor::DescriptorError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

/// Errors that prevent a conformance run from starting.
#[derive(Debug, Clone, Error)]
pub enum SetupError {
    /// The descriptor could not be loaded.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// A required credential is missing.
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// The test matrix could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The matrix's log settings could not be applied.
    #[error("failed to configure logging: {0}")]
    Telemetry(#[source] Arc<TelemetryError>),

    /// The descriptor names a type no registered factory builds.
    #[error("no {family} driver is registered for component type '{component_type}'")]
    UnknownComponentType {
        /// Family being run.
        family: CapabilityFamily,
        /// Type named by the descriptor.
        component_type: String,
    },

    /// The descriptor's type belongs to a different family.
    #[error("component type '{component_type}' is not a {expected} component")]
    FamilyMismatch {
        /// Family being run.
        expected: CapabilityFamily,
        /// Type named by the descriptor.
        component_type: String,
    },

    /// A factory was registered twice for the same type.
    #[error("a {family} driver is already registered for component type '{component_type}'")]
    DuplicateFactory {
        /// Family of the registration.
        family: CapabilityFamily,
        /// Duplicated type.
        component_type: String,
    },
}

impl From<TelemetryError> for SetupError {
    fn from(error: TelemetryError) -> Self {
        Self::Telemetry(Arc::new(error))
    }
}
