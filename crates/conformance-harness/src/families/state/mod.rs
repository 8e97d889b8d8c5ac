//! State store conformance.
//!
//! Phases: `init`, `set`, `get`, `delete` (then a get must report absence),
//! `bulk_set` (then each record must read back), `bulk_delete` (then each
//! record must be absent), followed by `close`. Every record uses a fresh
//! random key; bulk records derive `<key>-<index>` from it.

use std::path::Path;

use conformance_config::StateTestConfig;
use conformance_contracts::{
    CapabilityFamily, DeleteRequest, DriverError, GetRequest, PropertyMap, SetRequest, StateDriver,
};
use conformance_descriptor::ResolvedComponent;

use crate::budget::LatencyBudget;
use crate::error::SetupError;
use crate::keys::{bulk_key, random_key};
use crate::phase::{Phase, Probe};
use crate::report::ConformanceReport;
use crate::runner::ConformanceRunner;
use crate::session::DriverSession;

/// Phase name for driver initialisation.
pub const INIT: &str = "init";
/// Phase name for the single write.
pub const SET: &str = "set";
/// Phase name for the single read.
pub const GET: &str = "get";
/// Phase name for the single delete.
pub const DELETE: &str = "delete";
/// Phase name for the bulk write.
pub const BULK_SET: &str = "bulk_set";
/// Phase name for the bulk delete.
pub const BULK_DELETE: &str = "bulk_delete";

/// Value written for every record.
pub const TEST_VALUE: &[u8] = br#"{"message":"test"}"#;

/// Runs the state family against the component described under
/// `config_path`.
///
/// # Errors
///
/// Returns a [`SetupError`] when the descriptor is missing, malformed, or
/// not a state component. Driver failures are reported, not returned.
pub fn run_state_conformance<D, F>(
    config_path: &Path,
    factory: F,
    config: &StateTestConfig,
) -> Result<ConformanceReport, SetupError>
where
    D: StateDriver + 'static,
    F: FnOnce() -> D,
{
    let component = super::load_component(CapabilityFamily::State, config_path)?;
    Ok(run_state_component(&component, factory(), config))
}

/// Runs the state family against an already loaded component.
#[must_use]
pub fn run_state_component<D>(
    component: &ResolvedComponent,
    driver: D,
    config: &StateTestConfig,
) -> ConformanceReport
where
    D: StateDriver + 'static,
{
    let key = random_key();
    ConformanceRunner::new(
        CapabilityFamily::State,
        component.name(),
        component.component_type(),
    )
    .phases(state_phases(component.properties().clone(), config, &key))
    .run(DriverSession::new(
        driver,
        <D as StateDriver>::close,
        component.name(),
    ))
}

/// Builds the state phase list for records keyed from `key`.
#[must_use]
pub fn state_phases<D>(properties: PropertyMap, config: &StateTestConfig, key: &str) -> Vec<Phase<D>>
where
    D: StateDriver + 'static,
{
    let count = config.bulk_requests();
    let bulk_sets: Vec<SetRequest> = (0..count)
        .map(|index| SetRequest::new(bulk_key(key, index), TEST_VALUE.to_vec()))
        .collect();
    let bulk_deletes: Vec<DeleteRequest> = bulk_sets
        .iter()
        .map(|request| DeleteRequest::new(request.key()))
        .collect();
    let bulk_keys: Vec<String> = bulk_sets
        .iter()
        .map(|request| request.key().to_owned())
        .collect();
    let verify_keys = bulk_keys.clone();

    let set = SetRequest::new(key, TEST_VALUE.to_vec());
    let get = GetRequest::new(key);
    let delete = DeleteRequest::new(key);
    let get_key = key.to_owned();
    let delete_key = key.to_owned();

    vec![
        Phase::new(INIT, move |driver: &mut D, probe: &mut Probe| {
            probe.time(|| driver.init(&properties))
        })
        .with_budget(LatencyBudget::singular(config.max_init())),
        Phase::new(SET, move |driver: &mut D, probe: &mut Probe| {
            probe.time(|| driver.set(&set))
        })
        .with_budget(LatencyBudget::singular(config.max_set())),
        Phase::new(GET, move |driver: &mut D, probe: &mut Probe| {
            let actual = probe.time(|| driver.get(&get))?;
            expect_value(probe, &get_key, actual.as_deref());
            Ok(())
        })
        .with_budget(LatencyBudget::singular(config.max_get())),
        Phase::new(DELETE, move |driver: &mut D, probe: &mut Probe| {
            probe.time(|| driver.delete(&delete))?;
            expect_absent(&*driver, probe, &[delete_key])
        })
        .with_budget(LatencyBudget::singular(config.max_delete())),
        Phase::new(BULK_SET, move |driver: &mut D, probe: &mut Probe| {
            probe.time(|| driver.bulk_set(&bulk_sets))?;
            for key in &bulk_keys {
                let actual = driver.get(&GetRequest::new(key.as_str()))?;
                expect_value(probe, key, actual.as_deref());
            }
            Ok(())
        })
        .with_budget(LatencyBudget::scaled(config.max_set(), count)),
        Phase::new(BULK_DELETE, move |driver: &mut D, probe: &mut Probe| {
            probe.time(|| driver.bulk_delete(&bulk_deletes))?;
            expect_absent(&*driver, probe, &verify_keys)
        })
        .with_budget(LatencyBudget::scaled(config.max_delete(), count)),
    ]
}

fn expect_value(probe: &mut Probe, key: &str, actual: Option<&[u8]>) {
    if actual != Some(TEST_VALUE) {
        probe.mismatch(format!(
            "get '{key}' returned {}, expected {}",
            describe(actual),
            describe(Some(TEST_VALUE))
        ));
    }
}

fn expect_absent<D: StateDriver + ?Sized>(
    driver: &D,
    probe: &mut Probe,
    keys: &[String],
) -> Result<(), DriverError> {
    for key in keys {
        if let Some(value) = driver.get(&GetRequest::new(key.as_str()))? {
            probe.mismatch(format!(
                "'{key}' is still present after delete with {}",
                describe(Some(&value))
            ));
        }
    }
    Ok(())
}

fn describe(value: Option<&[u8]>) -> String {
    value.map_or_else(
        || String::from("absence"),
        |bytes| format!("{:?}", String::from_utf8_lossy(bytes)),
    )
}
