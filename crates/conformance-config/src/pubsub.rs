//! Tunables for the pub/sub family.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::defaults::{
    default_message_count, default_observation_window, default_pubsub_name, default_topic,
};
use crate::duration::{millis, option_millis};

/// How the delivery verifier spends its observation window.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WaitStrategy {
    /// Sleep for the whole window before counting.
    #[default]
    FixedWindow,
    /// Return as soon as the expected count is reached, or when the window
    /// elapses.
    UntilExpected,
}

/// Settings for a pub/sub conformance run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubSubTestConfig {
    #[serde(default = "default_pubsub_name")]
    pubsub_name: String,
    #[serde(default = "default_topic")]
    topic: String,
    #[serde(default)]
    publish_metadata: HashMap<String, String>,
    #[serde(default)]
    subscribe_metadata: HashMap<String, String>,
    #[serde(default = "default_message_count")]
    message_count: usize,
    #[serde(
        rename = "observation_window_ms",
        with = "millis",
        default = "default_observation_window"
    )]
    observation_window: Duration,
    #[serde(default)]
    wait_strategy: WaitStrategy,
    #[serde(
        rename = "max_init_ms",
        with = "option_millis",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    max_init: Option<Duration>,
    #[serde(
        rename = "max_publish_ms",
        with = "option_millis",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    max_publish: Option<Duration>,
}

impl Default for PubSubTestConfig {
    fn default() -> Self {
        Self {
            pubsub_name: default_pubsub_name(),
            topic: default_topic(),
            publish_metadata: HashMap::new(),
            subscribe_metadata: HashMap::new(),
            message_count: default_message_count(),
            observation_window: default_observation_window(),
            wait_strategy: WaitStrategy::default(),
            max_init: None,
            max_publish: None,
        }
    }
}

impl PubSubTestConfig {
    /// Overrides the pub/sub component name sent with each publish.
    #[must_use]
    pub fn with_pubsub_name(mut self, name: impl Into<String>) -> Self {
        self.pubsub_name = name.into();
        self
    }

    /// Overrides the topic.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Adds a metadata entry sent with every publish.
    #[must_use]
    pub fn with_publish_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.publish_metadata.insert(key.into(), value.into());
        self
    }

    /// Adds a metadata entry sent with the subscription.
    #[must_use]
    pub fn with_subscribe_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.subscribe_metadata.insert(key.into(), value.into());
        self
    }

    /// Overrides the number of messages published.
    #[must_use]
    pub const fn with_message_count(mut self, count: usize) -> Self {
        self.message_count = count;
        self
    }

    /// Overrides the observation window.
    #[must_use]
    pub const fn with_observation_window(mut self, window: Duration) -> Self {
        self.observation_window = window;
        self
    }

    /// Overrides the wait strategy.
    #[must_use]
    pub const fn with_wait_strategy(mut self, strategy: WaitStrategy) -> Self {
        self.wait_strategy = strategy;
        self
    }

    /// Sets a ceiling on the init and subscribe phase.
    #[must_use]
    pub const fn with_max_init(mut self, budget: Duration) -> Self {
        self.max_init = Some(budget);
        self
    }

    /// Sets a per-message publish ceiling; the phase budget scales with the
    /// message count.
    #[must_use]
    pub const fn with_max_publish(mut self, budget: Duration) -> Self {
        self.max_publish = Some(budget);
        self
    }

    /// Pub/sub component name.
    #[must_use]
    pub const fn pubsub_name(&self) -> &str {
        self.pubsub_name.as_str()
    }

    /// Topic used for publish and subscribe.
    #[must_use]
    pub const fn topic(&self) -> &str {
        self.topic.as_str()
    }

    /// Metadata attached to each publish.
    #[must_use]
    pub const fn publish_metadata(&self) -> &HashMap<String, String> {
        &self.publish_metadata
    }

    /// Metadata attached to the subscription.
    #[must_use]
    pub const fn subscribe_metadata(&self) -> &HashMap<String, String> {
        &self.subscribe_metadata
    }

    /// Messages published, and the minimum expected deliveries.
    #[must_use]
    pub const fn message_count(&self) -> usize {
        self.message_count
    }

    /// Observation window after publishing.
    #[must_use]
    pub const fn observation_window(&self) -> Duration {
        self.observation_window
    }

    /// Wait strategy for the delivery verifier.
    #[must_use]
    pub const fn wait_strategy(&self) -> WaitStrategy {
        self.wait_strategy
    }

    /// Optional init and subscribe ceiling.
    #[must_use]
    pub const fn max_init(&self) -> Option<Duration> {
        self.max_init
    }

    /// Optional per-message publish ceiling.
    #[must_use]
    pub const fn max_publish(&self) -> Option<Duration> {
        self.max_publish
    }
}
