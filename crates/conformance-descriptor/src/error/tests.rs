//! Unit tests for descriptor errors.

use std::path::PathBuf;

use rstest::rstest;

use super::DescriptorError;

#[rstest]
#[case::count(
    DescriptorError::UnexpectedCount { path: PathBuf::from("config/state/redis"), found: 2 },
    "found 2"
)]
#[case::parse(
    DescriptorError::Parse { path: PathBuf::from("a.yaml"), message: "bad indent".into() },
    "bad indent"
)]
#[case::invalid(
    DescriptorError::Invalid { path: PathBuf::from("a.yaml"), message: "empty type".into() },
    "a.yaml"
)]
#[case::render(
    DescriptorError::Render { name: "statestore".into(), message: "bad scalar".into() },
    "statestore"
)]
fn messages_include_context(#[case] error: DescriptorError, #[case] needle: &str) {
    let message = error.to_string();
    assert!(message.contains(needle), "expected '{needle}' in: {message}");
}

#[test]
fn io_error_names_path() {
    let error = DescriptorError::io(
        "config/pubsub/redis",
        std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    );
    assert!(error.to_string().contains("config/pubsub/redis"));
}
