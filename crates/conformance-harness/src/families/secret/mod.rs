//! Secret store conformance.
//!
//! Phases: `init`, `get_secret` (the response must equal the expected
//! values exactly), and `bulk_get_secret` (compared exactly or by
//! containment, per [`SecretMatch`]), followed by `close`. Mismatch
//! messages name the differing keys but never echo secret values.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use conformance_config::{SecretMatch, SecretTestConfig};
use conformance_contracts::{
    BulkGetSecretRequest, CapabilityFamily, GetSecretRequest, PropertyMap, SecretDriver,
};
use conformance_descriptor::ResolvedComponent;

use crate::budget::LatencyBudget;
use crate::error::SetupError;
use crate::phase::{Phase, Probe};
use crate::report::ConformanceReport;
use crate::runner::ConformanceRunner;
use crate::session::DriverSession;

/// Phase name for driver initialisation.
pub const INIT: &str = "init";
/// Phase name for the single lookup.
pub const GET_SECRET: &str = "get_secret";
/// Phase name for the bulk lookup.
pub const BULK_GET_SECRET: &str = "bulk_get_secret";

/// Runs the secret family against the component described under
/// `config_path`.
///
/// # Errors
///
/// Returns a [`SetupError`] when the descriptor is missing, malformed, or
/// not a secret store component.
pub fn run_secret_conformance<D, F>(
    config_path: &Path,
    factory: F,
    config: &SecretTestConfig,
) -> Result<ConformanceReport, SetupError>
where
    D: SecretDriver + 'static,
    F: FnOnce() -> D,
{
    let component = super::load_component(CapabilityFamily::SecretStore, config_path)?;
    Ok(run_secret_component(&component, factory(), config))
}

/// Runs the secret family against an already loaded component.
#[must_use]
pub fn run_secret_component<D>(
    component: &ResolvedComponent,
    driver: D,
    config: &SecretTestConfig,
) -> ConformanceReport
where
    D: SecretDriver + 'static,
{
    ConformanceRunner::new(
        CapabilityFamily::SecretStore,
        component.name(),
        component.component_type(),
    )
    .phases(secret_phases(component.properties().clone(), config))
    .run(DriverSession::new(
        driver,
        <D as SecretDriver>::close,
        component.name(),
    ))
}

/// Builds the secret phase list.
#[must_use]
pub fn secret_phases<D>(properties: PropertyMap, config: &SecretTestConfig) -> Vec<Phase<D>>
where
    D: SecretDriver + 'static,
{
    let request = GetSecretRequest::new(config.secret_name())
        .with_metadata(config.request_metadata().clone());
    let bulk_request = BulkGetSecretRequest::new(config.bulk_metadata().clone());
    let expected = config.expected_secret().clone();
    let expected_bulk = config.expected_bulk().clone();
    let mode = config.bulk_match();
    let budget = config.max_get().map(LatencyBudget::singular);

    vec![
        Phase::new(INIT, move |driver: &mut D, probe: &mut Probe| {
            probe.time(|| driver.init(&properties))
        })
        .with_optional_budget(config.max_init().map(LatencyBudget::singular)),
        Phase::new(GET_SECRET, move |driver: &mut D, probe: &mut Probe| {
            let actual = probe.time(|| driver.get_secret(&request))?;
            if let Some(difference) = compare(&expected, &actual, SecretMatch::Exact) {
                probe.mismatch(format!("secret '{}' {difference}", request.name()));
            }
            Ok(())
        })
        .with_optional_budget(budget),
        Phase::new(BULK_GET_SECRET, move |driver: &mut D, probe: &mut Probe| {
            let actual = probe.time(|| driver.bulk_get_secret(&bulk_request))?;
            if let Some(difference) = compare(&expected_bulk, &actual, mode) {
                probe.mismatch(format!("bulk secrets {difference}"));
            }
            Ok(())
        })
        .with_optional_budget(budget),
    ]
}

/// Describes how `actual` departs from `expected`, by key.
fn compare<V: PartialEq>(
    expected: &HashMap<String, V>,
    actual: &HashMap<String, V>,
    mode: SecretMatch,
) -> Option<String> {
    let missing: BTreeSet<&str> = expected
        .keys()
        .filter(|key| !actual.contains_key(key.as_str()))
        .map(String::as_str)
        .collect();
    let differing: BTreeSet<&str> = expected
        .iter()
        .filter(|(key, value)| actual.get(key.as_str()).is_some_and(|found| found != *value))
        .map(|(key, _)| key.as_str())
        .collect();
    let unexpected: BTreeSet<&str> = match mode {
        SecretMatch::Exact => actual
            .keys()
            .filter(|key| !expected.contains_key(key.as_str()))
            .map(String::as_str)
            .collect(),
        SecretMatch::Contains => BTreeSet::new(),
    };

    let mut problems = Vec::new();
    if !missing.is_empty() {
        problems.push(format!("missing keys {missing:?}"));
    }
    if !differing.is_empty() {
        problems.push(format!("different values for {differing:?}"));
    }
    if !unexpected.is_empty() {
        problems.push(format!("unexpected keys {unexpected:?}"));
    }
    if problems.is_empty() {
        None
    } else {
        Some(problems.join("; "))
    }
}

#[cfg(test)]
mod tests;
