//! End-to-end family runs against the fixture drivers.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use conformance_config::{PubSubTestConfig, SecretMatch, SecretTestConfig, StateTestConfig, WaitStrategy};
use conformance_fixtures::{
    EnvSecretStore, FaultInjector, LocalFileSecretStore, MemoryPubSub, MemoryStateStore,
};
use conformance_harness::families::{pubsub, secret, state};
use conformance_harness::runner::CLOSE_PHASE;
use conformance_harness::{
    PhaseFailure, PhaseStatus, run_pubsub_conformance, run_secret_conformance,
    run_state_conformance,
};
use once_cell::sync::Lazy;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const STATE_DIR: &str = "tests/config/state/memory";
const PUBSUB_DIR: &str = "tests/config/pubsub/memory";
const FILE_SECRETS_DIR: &str = "tests/config/secretstores/file";
const ENV_SECRETS_DIR: &str = "tests/config/secretstores/env";

struct EnvOverride {
    key: &'static str,
    guard: Option<MutexGuard<'static, ()>>,
}

impl EnvOverride {
    fn set_var(key: &'static str, value: &str) -> Self {
        let guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        // SAFETY: ENV_MUTEX serialises environment mutation in this test binary.
        unsafe { std::env::set_var(key, value) };
        Self {
            key,
            guard: Some(guard),
        }
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        // SAFETY: the guard is released only after the variable is removed.
        unsafe { std::env::remove_var(self.key) };
        drop(self.guard.take());
    }
}

fn quick_pubsub() -> PubSubTestConfig {
    PubSubTestConfig::default().with_wait_strategy(WaitStrategy::UntilExpected)
}

#[test]
fn memory_state_store_passes_every_phase() {
    let report = run_state_conformance(
        Path::new(STATE_DIR),
        MemoryStateStore::new,
        &StateTestConfig::default(),
    )
    .expect("setup");

    assert!(report.all_passed(), "{report}");
    assert_eq!(report.component(), "statestore");
    assert_eq!(report.component_type(), "state.in-memory");
    let names: Vec<&str> = report.phases().iter().map(|phase| phase.name()).collect();
    assert_eq!(
        names,
        vec![
            state::INIT,
            state::SET,
            state::GET,
            state::DELETE,
            state::BULK_SET,
            state::BULK_DELETE,
            CLOSE_PHASE
        ]
    );
}

#[test]
fn slow_writes_are_budget_violations_not_functional_failures() {
    let faults = FaultInjector::new();
    faults.delay("set", Duration::from_millis(40));
    let report = run_state_conformance(
        Path::new(STATE_DIR),
        || MemoryStateStore::new().with_faults(Arc::clone(&faults)),
        &StateTestConfig::default().with_max_set(Duration::from_millis(20)),
    )
    .expect("setup");

    assert!(!report.all_passed());
    let violations = report.budget_violations();
    assert_eq!(violations.len(), 1, "{report}");
    assert_eq!(violations.first().map(|(name, _)| *name), Some(state::SET));
    assert!(report.functional_failures().is_empty(), "{report}");
}

#[test]
fn failing_reads_fail_the_get_phase() {
    let faults = FaultInjector::new();
    faults.fail_always("get");
    let report = run_state_conformance(
        Path::new(STATE_DIR),
        || MemoryStateStore::new().with_faults(Arc::clone(&faults)),
        &StateTestConfig::default(),
    )
    .expect("setup");

    let get = report.phase(state::GET).expect("get phase");
    assert_eq!(get.status(), PhaseStatus::Failed);
    assert!(
        get.failures()
            .iter()
            .any(|failure| matches!(failure, PhaseFailure::Driver { .. })),
        "{report}"
    );
    assert_eq!(
        report.phase(state::SET).map(|phase| phase.status()),
        Some(PhaseStatus::Passed)
    );
}

#[test]
fn memory_broker_delivers_every_message() {
    let report =
        run_pubsub_conformance(Path::new(PUBSUB_DIR), MemoryPubSub::new, &quick_pubsub())
            .expect("setup");
    assert!(report.all_passed(), "{report}");
    assert_eq!(
        report.phase(pubsub::VERIFY_DELIVERY).map(|phase| phase.status()),
        Some(PhaseStatus::Passed)
    );
}

#[test]
fn refused_subscription_skips_the_dependent_phases() {
    let faults = FaultInjector::new();
    faults.fail_next("subscribe", 1);
    let report = run_pubsub_conformance(
        Path::new(PUBSUB_DIR),
        || MemoryPubSub::new().with_faults(Arc::clone(&faults)),
        &quick_pubsub(),
    )
    .expect("setup");

    assert_eq!(
        report.phase(pubsub::INIT_SUBSCRIBE).map(|phase| phase.status()),
        Some(PhaseStatus::Failed)
    );
    for name in [pubsub::PUBLISH, pubsub::VERIFY_DELIVERY] {
        assert_eq!(
            report.phase(name).map(|phase| phase.status()),
            Some(PhaseStatus::Skipped),
            "{report}"
        );
    }
    assert_eq!(report.summary().skipped, 2);
}

#[test]
fn failing_publishes_leave_deliveries_short() {
    let faults = FaultInjector::new();
    faults.fail_always("publish");
    let report = run_pubsub_conformance(
        Path::new(PUBSUB_DIR),
        || MemoryPubSub::new().with_faults(Arc::clone(&faults)),
        &quick_pubsub().with_observation_window(Duration::from_millis(100)),
    )
    .expect("setup");

    assert_eq!(
        report.phase(pubsub::PUBLISH).map(|phase| phase.status()),
        Some(PhaseStatus::Failed)
    );
    let verify = report.phase(pubsub::VERIFY_DELIVERY).expect("verify phase");
    assert!(
        verify
            .failures()
            .iter()
            .any(|failure| matches!(failure, PhaseFailure::Mismatch { .. })),
        "{report}"
    );
}

#[test]
fn file_secret_store_matches_exactly() {
    let config = SecretTestConfig::new("mysecret")
        .expect_value("mysecret", "abcd")
        .expect_bulk_secret("mysecret", [("mysecret", "abcd")])
        .expect_bulk_secret("secondsecret", [("secondsecret", "efgh")]);
    let report = run_secret_conformance(
        Path::new(FILE_SECRETS_DIR),
        LocalFileSecretStore::new,
        &config,
    )
    .expect("setup");

    assert!(report.all_passed(), "{report}");
    assert_eq!(
        report.phase(secret::BULK_GET_SECRET).map(|phase| phase.status()),
        Some(PhaseStatus::Passed)
    );
}

#[test]
fn file_secret_store_reports_a_wrong_expectation() {
    let config = SecretTestConfig::new("mysecret").expect_value("mysecret", "wxyz");
    let report = run_secret_conformance(
        Path::new(FILE_SECRETS_DIR),
        LocalFileSecretStore::new,
        &config.with_bulk_match(SecretMatch::Contains),
    )
    .expect("setup");

    let get = report.phase(secret::GET_SECRET).expect("get phase");
    assert_eq!(get.status(), PhaseStatus::Failed);
    let rendered = report.to_string();
    assert!(!rendered.contains("abcd"), "secret value leaked: {rendered}");
}

#[test]
fn env_secret_store_contains_the_set_variable() {
    const NAME: &str = "CONFORMANCE_FIXTURE_TOKEN";
    let _env = EnvOverride::set_var(NAME, "abcd");
    let config = SecretTestConfig::new(NAME)
        .expect_value(NAME, "abcd")
        .expect_bulk_secret(NAME, [(NAME, "abcd")])
        .with_bulk_match(SecretMatch::Contains);
    let report =
        run_secret_conformance(Path::new(ENV_SECRETS_DIR), EnvSecretStore::new, &config)
            .expect("setup");

    assert!(report.all_passed(), "{report}");
}
