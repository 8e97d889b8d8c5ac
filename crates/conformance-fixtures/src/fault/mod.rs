//! Failure and latency injection for fixture drivers.
//!
//! A [`FaultInjector`] is shared between a test and the driver it controls.
//! Drivers call [`FaultInjector::check`] at the top of every contract
//! operation; the injector sleeps for any configured latency and then either
//! lets the call through or hands back a [`DriverError`].
//!
//! Faults can also be requested from a descriptor through the
//! [`FAIL_OPERATIONS_PROPERTY`] and [`LATENCY_PROPERTY`] properties, so a
//! test matrix can exercise error paths without code changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use conformance_contracts::{DriverError, PropertyMap};
use tracing::debug;

/// Comma-separated operation names that always fail.
pub const FAIL_OPERATIONS_PROPERTY: &str = "failOperations";

/// Milliseconds of latency added to every operation.
pub const LATENCY_PROPERTY: &str = "injectLatencyMs";

/// Operation name matching every operation.
pub const ANY_OPERATION: &str = "*";

#[derive(Debug, Clone)]
struct Failure {
    remaining: Option<usize>,
    message: String,
}

#[derive(Debug, Default)]
struct Faults {
    failures: HashMap<String, Failure>,
    latency: HashMap<String, Duration>,
    injected: usize,
}

/// Shared controller for injected failures and latency.
#[derive(Debug, Default)]
pub struct FaultInjector {
    faults: Mutex<Faults>,
}

impl FaultInjector {
    /// Creates an injector with no faults, ready to share.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fails the next `times` calls of `operation`.
    pub fn fail_next(&self, operation: &str, times: usize) {
        self.insert_failure(operation, Some(times));
    }

    /// Fails every call of `operation` until [`FaultInjector::clear`].
    pub fn fail_always(&self, operation: &str) {
        self.insert_failure(operation, None);
    }

    /// Adds `latency` before every call of `operation`.
    pub fn delay(&self, operation: &str, latency: Duration) {
        self.lock().latency.insert(operation.to_owned(), latency);
    }

    /// Removes every configured fault.
    pub fn clear(&self) {
        let mut faults = self.lock();
        faults.failures.clear();
        faults.latency.clear();
    }

    /// Returns how many failures have been injected so far.
    #[must_use]
    pub fn injected_failures(&self) -> usize {
        self.lock().injected
    }

    /// Applies faults described by descriptor properties.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidProperty`] when [`LATENCY_PROPERTY`] is
    /// not an integer.
    pub fn configure(&self, properties: &PropertyMap) -> Result<(), DriverError> {
        if let Some(operations) = properties.get(FAIL_OPERATIONS_PROPERTY) {
            for operation in operations
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
            {
                self.fail_always(operation);
            }
        }
        if let Some(millis) = properties.parse::<u64>(LATENCY_PROPERTY)? {
            self.delay(ANY_OPERATION, Duration::from_millis(millis));
        }
        Ok(())
    }

    /// Runs the faults configured for `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Operation`] when a failure is armed for
    /// `operation` or for [`ANY_OPERATION`].
    pub fn check(&self, operation: &str) -> Result<(), DriverError> {
        let (latency, failure) = {
            let mut faults = self.lock();
            let latency = faults
                .latency
                .get(operation)
                .or_else(|| faults.latency.get(ANY_OPERATION))
                .copied();
            let failure = take_failure(&mut faults, operation)
                .or_else(|| take_failure(&mut faults, ANY_OPERATION));
            if failure.is_some() {
                faults.injected += 1;
            }
            (latency, failure)
        };
        if let Some(pause) = latency {
            thread::sleep(pause);
        }
        match failure {
            Some(message) => {
                debug!(target: "conformance::fixtures", operation, "injecting failure");
                Err(DriverError::operation(operation, message))
            }
            None => Ok(()),
        }
    }

    fn insert_failure(&self, operation: &str, remaining: Option<usize>) {
        self.lock().failures.insert(
            operation.to_owned(),
            Failure {
                remaining,
                message: format!("injected fault for {operation}"),
            },
        );
    }

    fn lock(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn take_failure(faults: &mut Faults, operation: &str) -> Option<String> {
    let failure = faults.failures.get_mut(operation)?;
    let message = failure.message.clone();
    match failure.remaining {
        None => Some(message),
        Some(0) => None,
        Some(count) => {
            failure.remaining = Some(count - 1);
            if count == 1 {
                faults.failures.remove(operation);
            }
            Some(message)
        }
    }
}
