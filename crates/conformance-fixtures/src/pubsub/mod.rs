//! In-process publish/subscribe broker.
//!
//! Each subscription owns a delivery thread fed by a channel, so handlers run
//! off the publishing thread and serially per subscription. A handler error
//! triggers redelivery up to [`MAX_DELIVERY_ATTEMPTS_PROPERTY`] attempts;
//! with [`REDELIVER_PROPERTY`] set, every message is delivered twice to
//! mimic at-least-once backends.

use std::collections::HashMap;
use std::mem;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use conformance_contracts::{
    DriverError, Message, MessageHandler, PropertyMap, PubSubDriver, PublishRequest,
    SubscribeRequest,
};
use tracing::{debug, warn};

use crate::fault::FaultInjector;

/// Component type the broker registers under.
pub const MEMORY_PUBSUB_TYPE: &str = "pubsub.in-memory";

/// Property bounding delivery attempts per message (default 1).
pub const MAX_DELIVERY_ATTEMPTS_PROPERTY: &str = "maxDeliveryAttempts";

/// Boolean property that duplicates every delivery.
pub const REDELIVER_PROPERTY: &str = "redeliver";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeliveryPolicy {
    max_attempts: usize,
    duplicate: bool,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            duplicate: false,
        }
    }
}

/// Channel-backed [`PubSubDriver`].
#[derive(Debug, Default)]
pub struct MemoryPubSub {
    topics: Mutex<HashMap<String, Vec<Sender<Message>>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    faults: Arc<FaultInjector>,
    policy: DeliveryPolicy,
    initialised: bool,
    closed: bool,
}

impl MemoryPubSub {
    /// Creates a broker with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares `faults` with the broker.
    #[must_use]
    pub fn with_faults(mut self, faults: Arc<FaultInjector>) -> Self {
        self.faults = faults;
        self
    }

    /// Returns the broker's fault injector.
    #[must_use]
    pub const fn faults(&self) -> &Arc<FaultInjector> {
        &self.faults
    }

    /// Returns the number of live subscriptions on `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        lock(&self.topics).get(topic).map_or(0, Vec::len)
    }

    fn ready(&self, operation: &str) -> Result<(), DriverError> {
        if self.closed {
            return Err(DriverError::Closed {
                driver: String::from(MEMORY_PUBSUB_TYPE),
            });
        }
        if !self.initialised {
            return Err(DriverError::NotInitialised {
                driver: String::from(MEMORY_PUBSUB_TYPE),
            });
        }
        self.faults.check(operation)
    }
}

impl PubSubDriver for MemoryPubSub {
    fn init(&mut self, properties: &PropertyMap) -> Result<(), DriverError> {
        self.faults.check("init")?;
        self.faults.configure(properties)?;
        let max_attempts = properties
            .parse::<usize>(MAX_DELIVERY_ATTEMPTS_PROPERTY)?
            .unwrap_or(1);
        if max_attempts == 0 {
            return Err(DriverError::InvalidProperty {
                name: String::from(MAX_DELIVERY_ATTEMPTS_PROPERTY),
                message: String::from("must be at least 1"),
            });
        }
        self.policy = DeliveryPolicy {
            max_attempts,
            duplicate: properties.parse::<bool>(REDELIVER_PROPERTY)?.unwrap_or(false),
        };
        self.initialised = true;
        self.closed = false;
        debug!(
            target: "conformance::fixtures",
            max_attempts,
            duplicate = self.policy.duplicate,
            "memory broker initialised"
        );
        Ok(())
    }

    fn publish(&self, request: &PublishRequest) -> Result<(), DriverError> {
        self.ready("publish")?;
        let mut topics = lock(&self.topics);
        if let Some(senders) = topics.get_mut(request.topic()) {
            senders.retain(|sender| {
                sender
                    .send(Message::new(
                        request.topic(),
                        request.data().to_vec(),
                        request.metadata().clone(),
                    ))
                    .is_ok()
            });
        }
        Ok(())
    }

    fn subscribe(
        &self,
        request: &SubscribeRequest,
        handler: MessageHandler,
    ) -> Result<(), DriverError> {
        self.ready("subscribe")?;
        let (sender, receiver) = mpsc::channel();
        let policy = self.policy;
        let worker = thread::Builder::new()
            .name(format!("pubsub-{}", request.topic()))
            .spawn(move || deliver_all(&receiver, &handler, policy))
            .map_err(|source| DriverError::io("spawning delivery thread", source))?;
        lock(&self.workers).push(worker);
        lock(&self.topics)
            .entry(request.topic().to_owned())
            .or_default()
            .push(sender);
        debug!(target: "conformance::fixtures", topic = request.topic(), "subscribed");
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.closed = true;
        lock(&self.topics).clear();
        let workers = mem::take(&mut *lock(&self.workers));
        let panicked = workers
            .into_iter()
            .map(JoinHandle::join)
            .filter(Result::is_err)
            .count();
        if panicked > 0 {
            return Err(DriverError::operation(
                "close",
                format!("{panicked} delivery thread(s) panicked"),
            ));
        }
        self.faults.check("close")
    }
}

fn deliver_all(receiver: &Receiver<Message>, handler: &MessageHandler, policy: DeliveryPolicy) {
    for message in receiver {
        deliver(&message, handler, policy.max_attempts);
        if policy.duplicate {
            deliver(&message, handler, policy.max_attempts);
        }
    }
}

fn deliver(message: &Message, handler: &MessageHandler, max_attempts: usize) {
    for attempt in 1..=max_attempts {
        match handler(message) {
            Ok(()) => return,
            Err(error) => warn!(
                target: "conformance::fixtures",
                topic = message.topic(),
                attempt,
                max_attempts,
                %error,
                "handler rejected message"
            ),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
