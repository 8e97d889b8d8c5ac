//! Tunables and expectations for the secret family.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::defaults::default_secret_name;
use crate::duration::option_millis;

/// How a bulk secret response is compared with the expectation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SecretMatch {
    /// The response must equal the expectation.
    #[default]
    Exact,
    /// Every expected entry must be present with equal values; extra
    /// entries are ignored.
    Contains,
}

/// Settings and expected values for a secret conformance run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretTestConfig {
    #[serde(default = "default_secret_name")]
    secret_name: String,
    #[serde(default)]
    request_metadata: HashMap<String, String>,
    #[serde(default)]
    bulk_metadata: HashMap<String, String>,
    #[serde(default)]
    expected_secret: HashMap<String, String>,
    #[serde(default)]
    expected_bulk: HashMap<String, HashMap<String, String>>,
    #[serde(default)]
    bulk_match: SecretMatch,
    #[serde(
        rename = "max_init_ms",
        with = "option_millis",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    max_init: Option<Duration>,
    #[serde(
        rename = "max_get_ms",
        with = "option_millis",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    max_get: Option<Duration>,
}

impl Default for SecretTestConfig {
    fn default() -> Self {
        Self {
            secret_name: default_secret_name(),
            request_metadata: HashMap::new(),
            bulk_metadata: HashMap::new(),
            expected_secret: HashMap::new(),
            expected_bulk: HashMap::new(),
            bulk_match: SecretMatch::default(),
            max_init: None,
            max_get: None,
        }
    }
}

impl SecretTestConfig {
    /// Creates a configuration requesting `secret_name`.
    #[must_use]
    pub fn new(secret_name: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            ..Self::default()
        }
    }

    /// Adds an expected key/value to the single-secret response.
    #[must_use]
    pub fn expect_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.expected_secret.insert(key.into(), value.into());
        self
    }

    /// Adds an expected secret to the bulk response.
    #[must_use]
    pub fn expect_bulk_secret<I, K, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entry = values
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.expected_bulk.insert(name.into(), entry);
        self
    }

    /// Overrides the bulk comparison mode.
    #[must_use]
    pub const fn with_bulk_match(mut self, mode: SecretMatch) -> Self {
        self.bulk_match = mode;
        self
    }

    /// Adds a metadata entry to the single-secret request.
    #[must_use]
    pub fn with_request_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_metadata.insert(key.into(), value.into());
        self
    }

    /// Adds a metadata entry to the bulk request.
    #[must_use]
    pub fn with_bulk_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.bulk_metadata.insert(key.into(), value.into());
        self
    }

    /// Sets an init ceiling.
    #[must_use]
    pub const fn with_max_init(mut self, budget: Duration) -> Self {
        self.max_init = Some(budget);
        self
    }

    /// Sets a ceiling for each secret lookup.
    #[must_use]
    pub const fn with_max_get(mut self, budget: Duration) -> Self {
        self.max_get = Some(budget);
        self
    }

    /// Secret requested by the get phase.
    #[must_use]
    pub const fn secret_name(&self) -> &str {
        self.secret_name.as_str()
    }

    /// Metadata sent with the get request.
    #[must_use]
    pub const fn request_metadata(&self) -> &HashMap<String, String> {
        &self.request_metadata
    }

    /// Metadata sent with the bulk request.
    #[must_use]
    pub const fn bulk_metadata(&self) -> &HashMap<String, String> {
        &self.bulk_metadata
    }

    /// Expected single-secret response.
    #[must_use]
    pub const fn expected_secret(&self) -> &HashMap<String, String> {
        &self.expected_secret
    }

    /// Expected bulk response.
    #[must_use]
    pub const fn expected_bulk(&self) -> &HashMap<String, HashMap<String, String>> {
        &self.expected_bulk
    }

    /// Bulk comparison mode.
    #[must_use]
    pub const fn bulk_match(&self) -> SecretMatch {
        self.bulk_match
    }

    /// Optional init ceiling.
    #[must_use]
    pub const fn max_init(&self) -> Option<Duration> {
        self.max_init
    }

    /// Optional lookup ceiling.
    #[must_use]
    pub const fn max_get(&self) -> Option<Duration> {
        self.max_get
    }
}
