//! Family runners: the fixed phase sequence for each capability family.
//!
//! Every family exposes an entry point taking a descriptor path, a driver
//! factory, and the family's test configuration. Loading the descriptor and
//! checking that its type belongs to the family happen before the factory
//! is called; failures there are [`SetupError`]s.

pub mod pubsub;
pub mod secret;
pub mod state;

use std::path::Path;

use conformance_contracts::CapabilityFamily;
use conformance_descriptor::{ResolvedComponent, load_component_descriptor};
use tracing::error;

use crate::error::SetupError;

/// Loads the single descriptor under `path` and checks its family.
///
/// # Errors
///
/// Returns a [`SetupError`] when the descriptor cannot be loaded or its
/// type belongs to another family.
pub fn load_component(
    family: CapabilityFamily,
    path: &Path,
) -> Result<ResolvedComponent, SetupError> {
    load_component_descriptor(path)
        .map_err(SetupError::from)
        .and_then(|component| ensure_family(family, &component).map(|()| component))
        .inspect_err(|err| {
            error!(
                target: "conformance",
                %family,
                path = %path.display(),
                error = %err,
                "conformance setup failed"
            );
        })
}

/// Checks that `component`'s type belongs to `expected`.
///
/// # Errors
///
/// Returns [`SetupError::FamilyMismatch`] otherwise.
pub fn ensure_family(
    expected: CapabilityFamily,
    component: &ResolvedComponent,
) -> Result<(), SetupError> {
    if CapabilityFamily::from_component_type(component.component_type()) == Some(expected) {
        Ok(())
    } else {
        Err(SetupError::FamilyMismatch {
            expected,
            component_type: component.component_type().to_owned(),
        })
    }
}
