use std::time::Duration;

use camino::Utf8PathBuf;

/// Default log filter expression used by conformance runs.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Directory, relative to the matrix file, holding descriptor directories.
pub const DEFAULT_CONFIG_ROOT: &str = "config";

/// Default number of items written and deleted by bulk state phases.
pub const DEFAULT_BULK_REQUESTS: usize = 10;

/// Default number of messages published by the pub/sub family.
pub const DEFAULT_MESSAGE_COUNT: usize = 10;

/// Default pub/sub component name attached to publish requests.
pub const DEFAULT_PUBSUB_NAME: &str = "pubsub";

/// Default topic used by the pub/sub family.
pub const DEFAULT_TOPIC: &str = "testtopic";

/// Default secret requested by the secret family.
pub const DEFAULT_SECRET_NAME: &str = "mysecret";

/// Default pub/sub observation window.
pub const DEFAULT_OBSERVATION_WINDOW: Duration = Duration::from_millis(2000);

/// Default init and set ceiling for state drivers.
///
/// Initial connections and first writes run slower than follow-up requests.
pub const DEFAULT_STATE_WRITE_BUDGET: Duration = Duration::from_millis(20);

/// Default get and delete ceiling for state drivers.
pub const DEFAULT_STATE_READ_BUDGET: Duration = Duration::from_millis(10);

/// Default log filter expression.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}

/// Default descriptor root directory.
pub fn default_config_root() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_CONFIG_ROOT)
}

pub(crate) const fn default_bulk_requests() -> usize {
    DEFAULT_BULK_REQUESTS
}

pub(crate) const fn default_message_count() -> usize {
    DEFAULT_MESSAGE_COUNT
}

pub(crate) fn default_pubsub_name() -> String {
    DEFAULT_PUBSUB_NAME.to_owned()
}

pub(crate) fn default_topic() -> String {
    DEFAULT_TOPIC.to_owned()
}

pub(crate) fn default_secret_name() -> String {
    DEFAULT_SECRET_NAME.to_owned()
}

pub(crate) const fn default_observation_window() -> Duration {
    DEFAULT_OBSERVATION_WINDOW
}

pub(crate) const fn default_state_write_budget() -> Duration {
    DEFAULT_STATE_WRITE_BUDGET
}

pub(crate) const fn default_state_read_budget() -> Duration {
    DEFAULT_STATE_READ_BUDGET
}
