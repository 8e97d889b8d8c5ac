//! Unit tests for the secret family runner.

use std::collections::HashMap;

use conformance_config::{SecretMatch, SecretTestConfig};
use conformance_contracts::{
    BulkGetSecretRequest, BulkSecretData, DriverError, GetSecretRequest, PropertyMap,
    SecretData, SecretDriver,
};
use conformance_descriptor::{ComponentDescriptor, ResolvedComponent};
use mockall::mock;
use rstest::{fixture, rstest};

use super::*;
use crate::report::{PhaseFailure, PhaseStatus};
use crate::tests::support::FixedSecrets;

mock! {
    Vault {}
    impl SecretDriver for Vault {
        fn init(&mut self, properties: &PropertyMap) -> Result<(), DriverError>;
        fn get_secret(&self, request: &GetSecretRequest) -> Result<SecretData, DriverError>;
        fn bulk_get_secret(
            &self,
            request: &BulkGetSecretRequest,
        ) -> Result<BulkSecretData, DriverError>;
        fn close(&mut self) -> Result<(), DriverError>;
    }
}

#[fixture]
fn component() -> ResolvedComponent {
    ResolvedComponent::from(&ComponentDescriptor::new(
        "localsecretstore",
        "secretstores.local.fixed",
        "v1",
    ))
}

#[fixture]
fn secrets() -> FixedSecrets {
    FixedSecrets::new([("mysecret", "abcd"), ("secondsecret", "efgh")])
}

fn expectations(mode: SecretMatch) -> SecretTestConfig {
    SecretTestConfig::new("mysecret")
        .expect_value("mysecret", "abcd")
        .expect_bulk_secret("mysecret", [("mysecret", "abcd")])
        .expect_bulk_secret("secondsecret", [("secondsecret", "efgh")])
        .with_bulk_match(mode)
}

#[rstest]
#[case::exact(SecretMatch::Exact)]
#[case::contains(SecretMatch::Contains)]
fn matching_store_passes(
    component: ResolvedComponent,
    secrets: FixedSecrets,
    #[case] mode: SecretMatch,
) {
    let report = run_secret_component(&component, secrets, &expectations(mode));
    assert!(report.all_passed(), "{report}");
}

#[rstest]
fn extra_bulk_secrets_only_pass_with_containment(component: ResolvedComponent) {
    let store = || FixedSecrets::new([("mysecret", "abcd"), ("secondsecret", "efgh"), ("PATH", "/bin")]);

    let exact = run_secret_component(&component, store(), &expectations(SecretMatch::Exact));
    let bulk = exact.phase(BULK_GET_SECRET).expect("bulk phase");
    assert!(matches!(
        bulk.failures(),
        [PhaseFailure::Mismatch { message }] if message.contains("unexpected keys {\"PATH\"}")
    ));

    let contains =
        run_secret_component(&component, store(), &expectations(SecretMatch::Contains));
    assert!(contains.all_passed(), "{contains}");
}

#[rstest]
fn wrong_value_is_reported_without_echoing_it(component: ResolvedComponent) {
    let store = FixedSecrets::new([("mysecret", "zzzz"), ("secondsecret", "efgh")]);
    let report = run_secret_component(&component, store, &expectations(SecretMatch::Exact));

    let get = report.phase(GET_SECRET).expect("get phase");
    assert_eq!(get.status(), PhaseStatus::Failed);
    let rendered = report.to_string();
    assert!(rendered.contains("different values for {\"mysecret\"}"), "{rendered}");
    assert!(!rendered.contains("zzzz"));
}

#[rstest]
fn missing_secret_is_a_driver_error(component: ResolvedComponent) {
    let store = FixedSecrets::new([("secondsecret", "efgh")]);
    let report = run_secret_component(&component, store, &expectations(SecretMatch::Contains));

    let get = report.phase(GET_SECRET).expect("get phase");
    assert!(matches!(
        get.failures(),
        [PhaseFailure::Driver { error: DriverError::SecretNotFound { .. } }]
    ));
    let bulk = report.phase(BULK_GET_SECRET).expect("bulk phase");
    assert!(matches!(
        bulk.failures(),
        [PhaseFailure::Mismatch { message }] if message.contains("missing keys {\"mysecret\"}")
    ));
}

#[rstest]
fn requests_carry_configured_name_and_metadata(component: ResolvedComponent) {
    let config = SecretTestConfig::new("dbpassword")
        .with_request_metadata("version_id", "2")
        .with_bulk_metadata("namespace", "prod");
    let mut vault = MockVault::new();
    vault.expect_init().once().returning(|_| Ok(()));
    vault
        .expect_get_secret()
        .withf(|request| {
            request.name() == "dbpassword"
                && request.metadata().get("version_id").map(String::as_str) == Some("2")
        })
        .once()
        .returning(|_| Ok(HashMap::new()));
    vault
        .expect_bulk_get_secret()
        .withf(|request| request.metadata().get("namespace").map(String::as_str) == Some("prod"))
        .once()
        .returning(|_| Ok(HashMap::new()));
    vault.expect_close().once().returning(|| Ok(()));

    let report = run_secret_component(&component, vault, &config);
    assert!(report.all_passed(), "{report}");
}

#[test]
fn compare_lists_every_problem() {
    let expected = HashMap::from([
        (String::from("a"), 1),
        (String::from("b"), 2),
    ]);
    let actual = HashMap::from([
        (String::from("b"), 3),
        (String::from("c"), 4),
    ]);
    assert_eq!(
        compare(&expected, &actual, SecretMatch::Exact).as_deref(),
        Some("missing keys {\"a\"}; different values for {\"b\"}; unexpected keys {\"c\"}")
    );
    assert_eq!(
        compare(&expected, &actual, SecretMatch::Contains).as_deref(),
        Some("missing keys {\"a\"}; different values for {\"b\"}")
    );
}
