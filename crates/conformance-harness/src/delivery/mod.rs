//! Asynchronous delivery verification for pub/sub runs.
//!
//! Each run creates its own [`DeliveryCounter`] and moves a handle into the
//! subscription handler. The handler increments the counter once per
//! invocation, from whatever thread the driver delivers on. After
//! publishing, [`DeliveryCounter::wait`] observes the counter for a bounded
//! window and the run passes when at least the expected number of
//! deliveries arrived. Payload contents are never inspected.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use conformance_config::WaitStrategy;
use conformance_contracts::MessageHandler;

/// Counts handler invocations for one run.
#[derive(Debug, Default)]
pub struct DeliveryCounter {
    count: Mutex<usize>,
    delivered: Condvar,
}

impl DeliveryCounter {
    /// Creates a shared counter starting at zero.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records one delivery.
    pub fn record(&self) {
        let mut count = self.lock();
        *count = count.saturating_add(1);
        drop(count);
        self.delivered.notify_all();
    }

    /// Deliveries recorded so far.
    #[must_use]
    pub fn count(&self) -> usize {
        *self.lock()
    }

    /// Builds a subscription handler that records each delivery.
    #[must_use]
    pub fn handler(self: &Arc<Self>) -> MessageHandler {
        let counter = Arc::clone(self);
        Arc::new(move |_message| {
            counter.record();
            Ok(())
        })
    }

    /// Observes the counter for up to `window` and reports the outcome.
    ///
    /// [`WaitStrategy::FixedWindow`] always sleeps the whole window.
    /// [`WaitStrategy::UntilExpected`] returns as soon as `expected`
    /// deliveries have been recorded.
    #[must_use]
    pub fn wait(&self, expected: usize, window: Duration, strategy: WaitStrategy) -> DeliveryOutcome {
        let started = Instant::now();
        let delivered = match strategy {
            WaitStrategy::FixedWindow => {
                thread::sleep(window);
                self.count()
            }
            WaitStrategy::UntilExpected => {
                let guard = self.lock();
                let (guard, _timeout) = self
                    .delivered
                    .wait_timeout_while(guard, window, |count| *count < expected)
                    .unwrap_or_else(PoisonError::into_inner);
                *guard
            }
        };
        DeliveryOutcome {
            expected,
            delivered,
            waited: started.elapsed(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Result of observing deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryOutcome {
    expected: usize,
    delivered: usize,
    waited: Duration,
}

impl DeliveryOutcome {
    /// Minimum deliveries required.
    #[must_use]
    pub const fn expected(&self) -> usize {
        self.expected
    }

    /// Deliveries observed when the wait ended.
    #[must_use]
    pub const fn delivered(&self) -> usize {
        self.delivered
    }

    /// Time spent waiting.
    #[must_use]
    pub const fn waited(&self) -> Duration {
        self.waited
    }

    /// Reports whether at least the expected number arrived.
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        self.delivered >= self.expected
    }
}
