//! Latency budgets.
//!
//! A budget is a wall-clock ceiling for one phase. Bulk phases scale the
//! singular ceiling linearly by the number of items, saturating rather than
//! overflowing. Elapsed time is compared at microsecond resolution and a
//! phase passes when `elapsed_us <= ceiling_us`.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Converts a duration to whole microseconds, saturating at `u64::MAX`.
#[must_use]
pub fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// A latency ceiling for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyBudget {
    ceiling: Duration,
}

impl LatencyBudget {
    /// Budget for a single operation.
    #[must_use]
    pub const fn singular(ceiling: Duration) -> Self {
        Self { ceiling }
    }

    /// Budget for `count` operations, each allowed `per_item`.
    #[must_use]
    pub fn scaled(per_item: Duration, count: usize) -> Self {
        let factor = u32::try_from(count).unwrap_or(u32::MAX);
        Self {
            ceiling: per_item.saturating_mul(factor),
        }
    }

    /// The ceiling.
    #[must_use]
    pub const fn ceiling(&self) -> Duration {
        self.ceiling
    }

    /// The ceiling in microseconds.
    #[must_use]
    pub fn ceiling_us(&self) -> u64 {
        micros(self.ceiling)
    }

    /// Compares an elapsed time with the ceiling.
    ///
    /// # Errors
    ///
    /// Returns a [`BudgetViolation`] when `elapsed` exceeds the ceiling.
    pub fn check(&self, elapsed: Duration) -> Result<(), BudgetViolation> {
        let elapsed_us = micros(elapsed);
        let ceiling_us = self.ceiling_us();
        if elapsed_us <= ceiling_us {
            Ok(())
        } else {
            Err(BudgetViolation {
                elapsed_us,
                ceiling_us,
            })
        }
    }
}

/// A phase that took longer than its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetViolation {
    elapsed_us: u64,
    ceiling_us: u64,
}

impl BudgetViolation {
    /// Measured time in microseconds.
    #[must_use]
    pub const fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }

    /// Allowed time in microseconds.
    #[must_use]
    pub const fn ceiling_us(&self) -> u64 {
        self.ceiling_us
    }

    /// Microseconds over budget.
    #[must_use]
    pub const fn overrun_us(&self) -> u64 {
        self.elapsed_us.saturating_sub(self.ceiling_us)
    }
}

impl fmt::Display for BudgetViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "took {}us, budget {}us",
            self.elapsed_us, self.ceiling_us
        )
    }
}
