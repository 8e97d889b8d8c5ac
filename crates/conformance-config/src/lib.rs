//! Configuration for conformance runs.
//!
//! Each capability family has a test configuration holding its latency
//! budgets and workload sizes. Defaults reproduce the reference scenarios:
//! ten bulk state records under 10 to 20 ms budgets, and ten pub/sub
//! messages on `testtopic` observed for two seconds. A [`TestMatrix`]
//! collects those configurations per component for a whole suite, and
//! [`required_env`] resolves credentials for drivers that talk to real
//! backends.

mod credentials;
mod defaults;
mod duration;
mod error;
mod logging;
mod matrix;
mod pubsub;
mod secret;
mod state;

pub use credentials::{collect_required, required_env};
pub use defaults::{
    DEFAULT_BULK_REQUESTS, DEFAULT_CONFIG_ROOT, DEFAULT_LOG_FILTER, DEFAULT_MESSAGE_COUNT,
    DEFAULT_OBSERVATION_WINDOW, DEFAULT_PUBSUB_NAME, DEFAULT_SECRET_NAME,
    DEFAULT_STATE_READ_BUDGET, DEFAULT_STATE_WRITE_BUDGET, DEFAULT_TOPIC, default_config_root,
    default_log_filter, default_log_format,
};
pub use error::{ConfigError, CredentialError};
pub use logging::{LogFormat, LogFormatParseError, LogSettings};
pub use matrix::{ComponentEntry, TestMatrix};
pub use pubsub::{PubSubTestConfig, WaitStrategy};
pub use secret::{SecretMatch, SecretTestConfig};
pub use state::StateTestConfig;
