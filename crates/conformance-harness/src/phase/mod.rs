//! Phases: the unit of work a conformance run executes.
//!
//! A [`Phase`] wraps one action against the driver under test. The action
//! receives a [`Probe`] and must route the driver call it is judged on
//! through [`Probe::time`]; follow-up reads that verify the outcome run
//! outside the probe so they do not count against the budget. Functional
//! mismatches are recorded on the probe, while a returned [`DriverError`]
//! marks a driver failure.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use conformance_contracts::DriverError;

use crate::budget::LatencyBudget;

/// Boxed phase action.
pub type PhaseAction<C> = Box<dyn FnOnce(&mut C, &mut Probe) -> Result<(), DriverError>>;

/// Measures driver calls and collects mismatches for a single phase.
#[derive(Debug, Default)]
pub struct Probe {
    elapsed: Duration,
    mismatches: Vec<String>,
}

impl Probe {
    /// Creates an empty probe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `operation`, adding its wall-clock time to the phase total.
    pub fn time<T>(&mut self, operation: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let output = operation();
        self.elapsed = self.elapsed.saturating_add(started.elapsed());
        output
    }

    /// Records a functional mismatch.
    pub fn mismatch(&mut self, message: impl Into<String>) {
        self.mismatches.push(message.into());
    }

    /// Records a mismatch unless `actual == expected`.
    pub fn expect_eq<T: PartialEq + Debug + ?Sized>(&mut self, what: &str, expected: &T, actual: &T) {
        if expected != actual {
            self.mismatch(format!("{what}: expected {expected:?}, got {actual:?}"));
        }
    }

    /// Total time spent in timed operations.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Mismatches recorded so far.
    #[must_use]
    pub fn mismatches(&self) -> &[String] {
        &self.mismatches
    }

    pub(crate) fn into_parts(self) -> (Duration, Vec<String>) {
        (self.elapsed, self.mismatches)
    }
}

/// One named step of a conformance run.
pub struct Phase<C> {
    name: String,
    budget: Option<LatencyBudget>,
    prerequisites: Vec<String>,
    action: PhaseAction<C>,
}

impl<C> Phase<C> {
    /// Creates an unbudgeted phase.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: FnOnce(&mut C, &mut Probe) -> Result<(), DriverError> + 'static,
    {
        Self {
            name: name.into(),
            budget: None,
            prerequisites: Vec::new(),
            action: Box::new(action),
        }
    }

    /// Attaches a latency budget.
    #[must_use]
    pub const fn with_budget(mut self, budget: LatencyBudget) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Attaches an optional latency budget.
    #[must_use]
    pub const fn with_optional_budget(mut self, budget: Option<LatencyBudget>) -> Self {
        self.budget = budget;
        self
    }

    /// Skips this phase unless the named earlier phase passed.
    #[must_use]
    pub fn requires(mut self, phase: impl Into<String>) -> Self {
        self.prerequisites.push(phase.into());
        self
    }

    /// Phase name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latency budget, if any.
    #[must_use]
    pub const fn budget(&self) -> Option<LatencyBudget> {
        self.budget
    }

    /// Names of phases that must pass first.
    #[must_use]
    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    pub(crate) fn into_action(self) -> PhaseAction<C> {
        self.action
    }
}

impl<C> std::fmt::Debug for Phase<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Phase")
            .field("name", &self.name)
            .field("budget", &self.budget)
            .field("prerequisites", &self.prerequisites)
            .finish_non_exhaustive()
    }
}
