//! Unit tests for suite runs.

use std::fs;

use camino::Utf8PathBuf;
use conformance_contracts::CapabilityFamily;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::tests::support::{FixedSecrets, LoopbackBroker, MemoryStore, write_descriptor};

const MATRIX: &str = r"
state:
  - component: memory
    config:
      max_init_ms: 5000
      max_set_ms: 5000
      max_get_ms: 5000
      max_delete_ms: 5000
      bulk_requests: 3
pubsub:
  - component: loopback
    config:
      message_count: 5
      observation_window_ms: 2000
      wait_strategy: until_expected
secretstores:
  - component: fixed
    config:
      expected_secret:
        mysecret: abcd
      expected_bulk:
        mysecret:
          mysecret: abcd
      bulk_match: contains
";

struct Workspace {
    _dir: TempDir,
    matrix: Utf8PathBuf,
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
    let config = root.join("config");
    write_descriptor(config.join("state/memory").as_std_path(), "statestore.yaml", "state.memory");
    write_descriptor(config.join("pubsub/loopback").as_std_path(), "pubsub.yaml", "pubsub.loopback");
    write_descriptor(
        config.join("secretstores/fixed").as_std_path(),
        "secretstore.yaml",
        "secretstores.local.fixed",
    );
    let matrix = root.join("matrix.yaml");
    fs::write(&matrix, MATRIX).expect("write matrix");
    Workspace { _dir: dir, matrix }
}

#[fixture]
fn registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new();
    registry
        .register_state("state.memory", || Box::new(MemoryStore::default()))
        .expect("register state");
    registry
        .register_pubsub("pubsub.loopback", || Box::new(LoopbackBroker::default()))
        .expect("register pubsub");
    registry
        .register_secret("secretstores.local.fixed", || {
            Box::new(FixedSecrets::new([("mysecret", "abcd"), ("secondsecret", "efgh")]))
        })
        .expect("register secret");
    registry
}

#[rstest]
fn every_listed_component_runs(workspace: Workspace, registry: DriverRegistry) {
    let suite = run_suite_file(&workspace.matrix, &registry).expect("matrix loads");

    assert!(suite.all_passed(), "{suite}");
    assert_eq!(suite.reports().len(), 3);
    assert!(suite.report(CapabilityFamily::State, "statestore").is_some());
    assert!(suite.report(CapabilityFamily::PubSub, "pubsub").is_some());
    assert!(suite.report(CapabilityFamily::SecretStore, "secretstore").is_some());
    assert!(suite.to_string().ends_with("suite: 3/3 components passed"));
}

#[rstest]
fn unregistered_type_is_recorded_and_others_still_run(workspace: Workspace) {
    let mut partial = DriverRegistry::new();
    partial
        .register_state("state.memory", || Box::new(MemoryStore::default()))
        .expect("register state");

    let suite = run_suite_file(&workspace.matrix, &partial).expect("matrix loads");

    assert_eq!(suite.reports().len(), 1);
    let failed: Vec<CapabilityFamily> = suite
        .setup_failures()
        .iter()
        .map(SetupFailure::family)
        .collect();
    assert_eq!(failed, [CapabilityFamily::PubSub, CapabilityFamily::SecretStore]);
    assert!(
        suite
            .setup_failures()
            .iter()
            .all(|failure| failure.message().contains("is registered"))
    );
    assert!(!suite.all_passed());
}

#[rstest]
fn missing_descriptor_directory_is_a_setup_failure(registry: DriverRegistry) {
    let matrix = TestMatrix {
        config_root: Utf8PathBuf::from("/nonexistent/conformance"),
        state: vec![conformance_config::ComponentEntry::new("memory")],
        ..TestMatrix::default()
    };
    let suite = run_suite(&matrix, &registry);
    assert!(suite.reports().is_empty());
    assert_eq!(suite.setup_failures().len(), 1);
    assert_eq!(
        suite.setup_failures().first().map(SetupFailure::component),
        Some("memory")
    );
}

#[rstest]
fn unreadable_matrix_is_a_config_error(registry: DriverRegistry) {
    let err = run_suite_file(Utf8Path::new("/nonexistent/matrix.yaml"), &registry)
        .expect_err("missing matrix");
    assert!(matches!(err, SetupError::Config(_)), "got {err}");
}

#[rstest]
fn bad_log_filter_in_matrix_is_a_setup_error(workspace: Workspace, registry: DriverRegistry) {
    let matrix = format!("log:\n  filter: conformance=loudest\n{MATRIX}");
    fs::write(&workspace.matrix, matrix).expect("rewrite matrix");

    let err = run_suite_file(&workspace.matrix, &registry).expect_err("bad filter");
    assert!(matches!(err, SetupError::Telemetry(_)), "got {err}");
}

#[rstest]
fn suite_serialises_reports_and_failures(workspace: Workspace) {
    let suite = run_suite_file(&workspace.matrix, &DriverRegistry::new()).expect("matrix loads");
    let value: serde_json::Value =
        serde_json::from_str(&suite.to_json().expect("serialise")).expect("parse");
    assert_eq!(value["setup_failures"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["setup_failures"][0]["family"], "state");
}
