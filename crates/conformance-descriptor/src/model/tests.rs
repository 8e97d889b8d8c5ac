//! Unit tests for the descriptor model.

use rstest::rstest;

use super::ComponentDescriptor;
use crate::loader::parse_descriptor;

const REDIS_STATE: &str = r#"apiVersion: dapr.io/v1alpha1
kind: Component
metadata:
  name: statestore
spec:
  type: state.redis
  version: v1
  metadata:
  - name: redisHost
    value: localhost:6379
  - name: redisPassword
    value: ""
  - name: maxRetries
    value: 3
  - name: enableTLS
    value: false
"#;

#[test]
fn parses_envelope_and_spec() {
    let descriptor = parse_descriptor("statestore.yaml", REDIS_STATE).expect("parse");
    assert_eq!(descriptor.api_version(), "dapr.io/v1alpha1");
    assert_eq!(descriptor.kind(), "Component");
    assert_eq!(descriptor.name(), "statestore");
    assert_eq!(descriptor.component_type(), "state.redis");
    assert_eq!(descriptor.spec().version(), "v1");
    assert_eq!(descriptor.spec().metadata().len(), 4);
}

#[test]
fn non_string_scalars_keep_their_text() {
    let descriptor = parse_descriptor("statestore.yaml", REDIS_STATE).expect("parse");
    let values: Vec<(&str, &str)> = descriptor
        .spec()
        .metadata()
        .iter()
        .map(|item| (item.name(), item.value()))
        .collect();
    assert_eq!(
        values,
        vec![
            ("redisHost", "localhost:6379"),
            ("redisPassword", ""),
            ("maxRetries", "3"),
            ("enableTLS", "false"),
        ]
    );
}

#[rstest]
#[case::wrong_kind(
    ComponentDescriptor {
        kind: String::from("Configuration"),
        ..ComponentDescriptor::new("s", "state.redis", "v1")
    },
    "kind must be"
)]
#[case::blank_type(ComponentDescriptor::new("s", "  ", "v1"), "spec.type")]
#[case::blank_property(
    ComponentDescriptor::new("s", "state.redis", "v1").with_property(" ", "x"),
    "spec.metadata[0]"
)]
fn validate_rejects_broken_descriptors(
    #[case] descriptor: ComponentDescriptor,
    #[case] needle: &str,
) {
    let message = descriptor.validate().expect_err("should be invalid");
    assert!(message.contains(needle), "expected '{needle}' in: {message}");
}

#[rstest]
#[case::escapes(
    ComponentDescriptor::new("statestore", "state.azure.cosmosdb", "v1")
        .with_property("url", "https://acct.documents.azure.com:443")
        .with_property("masterKey", "a\"b\\c==")
        .with_property("collection", "test-coll-1")
)]
#[case::comment_marker_in_type(
    ComponentDescriptor::new("statestore", "state.x #ns", "v1").with_property("masterKey", "k")
)]
#[case::control_characters(
    ComponentDescriptor::new("statestore", "state.redis", "v1")
        .with_property("masterKey", "ab\rcd")
        .with_property("banner", "bell\u{7}\ttab")
)]
#[case::scalar_lookalikes(
    ComponentDescriptor::new("statestore", "state.redis", "v1")
        .with_property("enableTLS", "true")
        .with_property("maxRetries", "3")
        .with_property("empty", "")
)]
#[case::no_metadata(ComponentDescriptor::new("env", "secretstores.local.env", "v1"))]
fn rendered_yaml_parses_back_verbatim(#[case] descriptor: ComponentDescriptor) {
    let yaml = descriptor.to_yaml().expect("render");
    let parsed = parse_descriptor("rendered.yaml", &yaml).expect("parse rendered");
    assert_eq!(parsed, descriptor, "rendered yaml:\n{yaml}");
}
