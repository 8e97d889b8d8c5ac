//! Publish/subscribe messaging contract.
//!
//! A [`PubSubDriver`] publishes payloads to topics and delivers them to
//! handlers registered with `subscribe`. Delivery is asynchronous: the
//! handler may run on a driver-owned thread after `publish` has returned.
//! For a single subscription the handler is never invoked concurrently with
//! itself unless the driver documents otherwise. Ordering across separate
//! subscriptions is not guaranteed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::DriverError;
use crate::properties::PropertyMap;

/// Callback invoked once per delivered message.
///
/// Returning an error tells the driver the message was not processed; how
/// the driver reacts (retry, dead-letter, drop) is backend-specific.
pub type MessageHandler = Arc<dyn Fn(&Message) -> Result<(), DriverError> + Send + Sync>;

/// Request to publish one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pubsub_name: String,
    topic: String,
    data: Vec<u8>,
    metadata: HashMap<String, String>,
}

impl PublishRequest {
    /// Creates a publish request with no metadata.
    #[must_use]
    pub fn new(pubsub_name: impl Into<String>, topic: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            pubsub_name: pubsub_name.into(),
            topic: topic.into(),
            data,
            metadata: HashMap::new(),
        }
    }

    /// Attaches per-message metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the logical pub/sub component name.
    #[must_use]
    pub const fn pubsub_name(&self) -> &str {
        self.pubsub_name.as_str()
    }

    /// Returns the topic.
    #[must_use]
    pub const fn topic(&self) -> &str {
        self.topic.as_str()
    }

    /// Returns the payload.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}

/// Request to register a handler for a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeRequest {
    topic: String,
    metadata: HashMap<String, String>,
}

impl SubscribeRequest {
    /// Creates a subscribe request with no metadata.
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attaches subscription metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the topic.
    #[must_use]
    pub const fn topic(&self) -> &str {
        self.topic.as_str()
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}

/// A message handed to a subscriber.
#[derive(Clone, PartialEq, Eq)]
pub struct Message {
    topic: String,
    data: Vec<u8>,
    metadata: HashMap<String, String>,
}

impl Message {
    /// Creates a delivered message.
    #[must_use]
    pub fn new(
        topic: impl Into<String>,
        data: Vec<u8>,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            data,
            metadata,
        }
    }

    /// Returns the topic the message arrived on.
    #[must_use]
    pub const fn topic(&self) -> &str {
        self.topic.as_str()
    }

    /// Returns the payload.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("topic", &self.topic)
            .field("len", &self.data.len())
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Contract for publish/subscribe drivers.
pub trait PubSubDriver {
    /// Connects the driver using the resolved descriptor properties.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the properties are invalid or the
    /// backend cannot be reached.
    fn init(&mut self, properties: &PropertyMap) -> Result<(), DriverError>;

    /// Publishes one payload. Ownership of the payload passes to the driver.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the backend rejects the message.
    fn publish(&self, request: &PublishRequest) -> Result<(), DriverError>;

    /// Registers `handler` for messages on the requested topic.
    ///
    /// Once this returns `Ok`, every later publish to the topic must reach
    /// the handler at least once.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the subscription cannot be created.
    fn subscribe(
        &self,
        request: &SubscribeRequest,
        handler: MessageHandler,
    ) -> Result<(), DriverError>;

    /// Stops deliveries and releases backend resources.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the backend fails to shut down cleanly.
    fn close(&mut self) -> Result<(), DriverError>;
}

impl<T: PubSubDriver + ?Sized> PubSubDriver for Box<T> {
    fn init(&mut self, properties: &PropertyMap) -> Result<(), DriverError> {
        (**self).init(properties)
    }

    fn publish(&self, request: &PublishRequest) -> Result<(), DriverError> {
        (**self).publish(request)
    }

    fn subscribe(
        &self,
        request: &SubscribeRequest,
        handler: MessageHandler,
    ) -> Result<(), DriverError> {
        (**self).subscribe(request, handler)
    }

    fn close(&mut self) -> Result<(), DriverError> {
        (**self).close()
    }
}
