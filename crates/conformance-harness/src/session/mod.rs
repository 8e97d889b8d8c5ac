//! Driver ownership for one run.
//!
//! A [`DriverSession`] owns the driver under test and guarantees that its
//! `close` runs exactly once: explicitly through [`DriverSession::close`]
//! on the normal path, or from `Drop` when the run unwinds out of a
//! panicking driver call.

use std::time::{Duration, Instant};

use conformance_contracts::DriverError;
use tracing::warn;

/// Function that shuts a driver down.
pub type CloseFn<D> = fn(&mut D) -> Result<(), DriverError>;

/// Owns a driver and closes it exactly once.
pub struct DriverSession<D> {
    driver: D,
    close: CloseFn<D>,
    component: String,
    closed: bool,
}

impl<D> DriverSession<D> {
    /// Takes ownership of `driver`; `close` is its family's close method.
    #[must_use]
    pub fn new(driver: D, close: CloseFn<D>, component: impl Into<String>) -> Self {
        Self {
            driver,
            close,
            component: component.into(),
            closed: false,
        }
    }

    /// Mutable access to the driver.
    pub const fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Closes the driver, returning the time taken and the driver's
    /// outcome. The driver is not closed again on drop.
    #[must_use]
    pub fn close(mut self) -> (Duration, Result<(), DriverError>) {
        self.closed = true;
        let started = Instant::now();
        let outcome = (self.close)(&mut self.driver);
        (started.elapsed(), outcome)
    }
}

impl<D> Drop for DriverSession<D> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(error) = (self.close)(&mut self.driver) {
            warn!(
                target: "conformance",
                component = %self.component,
                %error,
                "driver close failed during teardown"
            );
        }
    }
}
