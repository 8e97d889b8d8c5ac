//! Unit tests for descriptor loading and property resolution.

use std::fs;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::resolve;

const STATE_YAML: &str = r"apiVersion: dapr.io/v1alpha1
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
    value: ''
";

#[fixture]
fn config_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write descriptor");
    path
}

#[rstest]
fn loads_single_descriptor_from_directory(config_dir: TempDir) {
    write(&config_dir, "statestore.yaml", STATE_YAML);
    write(&config_dir, "README.md", "not a descriptor");

    let descriptor = load_single(config_dir.path()).expect("load");
    assert_eq!(descriptor.component_type(), "state.redis");
}

#[rstest]
fn loads_descriptor_from_file_path(config_dir: TempDir) {
    let file = write(&config_dir, "statestore.yml", STATE_YAML);
    let descriptor = load_single(&file).expect("load");
    assert_eq!(descriptor.name(), "statestore");
}

#[rstest]
fn empty_directory_is_a_count_error(config_dir: TempDir) {
    let err = load_single(config_dir.path()).expect_err("no descriptors");
    assert!(matches!(err, DescriptorError::UnexpectedCount { found: 0, .. }));
}

#[rstest]
fn two_descriptors_is_a_count_error(config_dir: TempDir) {
    write(&config_dir, "a.yaml", STATE_YAML);
    write(&config_dir, "b.yaml", STATE_YAML);
    let err = load_single(config_dir.path()).expect_err("too many descriptors");
    assert!(matches!(err, DescriptorError::UnexpectedCount { found: 2, .. }));

    let all = load_components(config_dir.path()).expect("load all");
    assert_eq!(all.len(), 2);
}

#[rstest]
fn missing_path_is_an_io_error(config_dir: TempDir) {
    let err = load_single(&config_dir.path().join("absent")).expect_err("missing");
    assert!(matches!(err, DescriptorError::Io { .. }));
}

#[rstest]
fn malformed_yaml_is_a_parse_error(config_dir: TempDir) {
    write(&config_dir, "broken.yaml", "kind: Component\nspec: [unterminated\n");
    let err = load_single(config_dir.path()).expect_err("malformed");
    assert!(matches!(err, DescriptorError::Parse { .. }), "got {err}");
}

#[rstest]
fn descriptor_without_type_is_rejected(config_dir: TempDir) {
    write(
        &config_dir,
        "untyped.yaml",
        "kind: Component\nmetadata:\n  name: x\nspec:\n  type: ''\n",
    );
    let err = load_single(config_dir.path()).expect_err("invalid");
    assert!(matches!(err, DescriptorError::Invalid { .. }), "got {err}");
}

#[rstest]
fn resolves_one_property_per_metadata_entry(config_dir: TempDir) {
    write(&config_dir, "statestore.yaml", STATE_YAML);
    let component = load_component_descriptor(config_dir.path()).expect("load");

    assert_eq!(component.component_type(), "state.redis");
    assert_eq!(component.name(), "statestore");
    let props = component.properties();
    assert_eq!(props.len(), 2);
    assert_eq!(props.get("redisHost"), Some("localhost:6379"));
    assert_eq!(props.get("redisPassword"), Some(""));
}

#[test]
fn resolve_keeps_last_duplicate() {
    let descriptor = ComponentDescriptor::new("s", "state.redis", "v1")
        .with_property("redisHost", "first")
        .with_property("redisHost", "second");
    let props = resolve(&descriptor);
    assert_eq!(props.len(), 1);
    assert_eq!(props.get("redisHost"), Some("second"));
}
