//! Conformance reports.
//!
//! A [`ConformanceReport`] records the outcome of every phase of one family
//! run against one component. Failures are categorised so that callers can
//! separate driver errors and functional mismatches from budget violations,
//! which usually point at an overloaded backend rather than a broken driver.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use conformance_contracts::{CapabilityFamily, DriverError};
use serde::{Serialize, Serializer};

use crate::budget::{BudgetViolation, micros};

/// Final state of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    /// Every check held.
    Passed,
    /// At least one failure was recorded.
    Failed,
    /// The phase did not run because a prerequisite did not pass.
    Skipped,
}

impl PhaseStatus {
    /// Lower-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reason a phase did not pass.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseFailure {
    /// A driver call returned an error.
    Driver {
        /// The error returned by the driver.
        #[serde(serialize_with = "serialize_display")]
        error: DriverError,
    },
    /// The driver answered, but not with the expected result.
    Mismatch {
        /// What differed.
        message: String,
    },
    /// The timed call exceeded its budget.
    BudgetViolation(BudgetViolation),
    /// The phase was not run.
    Skipped {
        /// Why the phase was not run.
        reason: String,
    },
}

impl PhaseFailure {
    /// Reports whether the failure is a driver error or a mismatch.
    #[must_use]
    pub const fn is_functional(&self) -> bool {
        matches!(self, Self::Driver { .. } | Self::Mismatch { .. })
    }
}

impl fmt::Display for PhaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driver { error } => write!(f, "driver error: {error}"),
            Self::Mismatch { message } => write!(f, "mismatch: {message}"),
            Self::BudgetViolation(violation) => write!(f, "budget exceeded: {violation}"),
            Self::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Outcome of one phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    name: String,
    status: PhaseStatus,
    elapsed_us: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    budget_us: Option<u64>,
    failures: Vec<PhaseFailure>,
}

impl PhaseReport {
    /// Builds a report for a phase that ran; passes when `failures` is
    /// empty.
    #[must_use]
    pub fn completed(
        name: impl Into<String>,
        elapsed: Duration,
        budget_us: Option<u64>,
        failures: Vec<PhaseFailure>,
    ) -> Self {
        let status = if failures.is_empty() {
            PhaseStatus::Passed
        } else {
            PhaseStatus::Failed
        };
        Self {
            name: name.into(),
            status,
            elapsed_us: micros(elapsed),
            budget_us,
            failures,
        }
    }

    /// Builds a report for a phase that did not run.
    #[must_use]
    pub fn skipped(name: impl Into<String>, budget_us: Option<u64>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: PhaseStatus::Skipped,
            elapsed_us: 0,
            budget_us,
            failures: vec![PhaseFailure::Skipped {
                reason: reason.into(),
            }],
        }
    }

    /// Phase name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Final status.
    #[must_use]
    pub const fn status(&self) -> PhaseStatus {
        self.status
    }

    /// Time spent in timed calls, in microseconds.
    #[must_use]
    pub const fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }

    /// Budget in microseconds, if the phase had one.
    #[must_use]
    pub const fn budget_us(&self) -> Option<u64> {
        self.budget_us
    }

    /// Recorded failures.
    #[must_use]
    pub fn failures(&self) -> &[PhaseFailure] {
        &self.failures
    }

    /// Reports whether the phase passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == PhaseStatus::Passed
    }
}

/// Phase counts for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Phases recorded.
    pub total: usize,
    /// Phases that passed.
    pub passed: usize,
    /// Phases that failed.
    pub failed: usize,
    /// Phases that were skipped.
    pub skipped: usize,
}

impl ReportSummary {
    fn tally(phases: &[PhaseReport]) -> Self {
        phases.iter().fold(
            Self {
                total: phases.len(),
                ..Self::default()
            },
            |mut summary, phase| {
                match phase.status {
                    PhaseStatus::Passed => summary.passed += 1,
                    PhaseStatus::Failed => summary.failed += 1,
                    PhaseStatus::Skipped => summary.skipped += 1,
                }
                summary
            },
        )
    }
}

/// Outcome of one family run against one component.
#[derive(Debug, Clone, Serialize)]
pub struct ConformanceReport {
    family: CapabilityFamily,
    component: String,
    component_type: String,
    phases: Vec<PhaseReport>,
    summary: ReportSummary,
    started_at_ms: u64,
    duration_us: u64,
}

impl ConformanceReport {
    /// Assembles a report from phase outcomes.
    #[must_use]
    pub fn new(
        family: CapabilityFamily,
        component: impl Into<String>,
        component_type: impl Into<String>,
        started_at: SystemTime,
        phases: Vec<PhaseReport>,
        duration: Duration,
    ) -> Self {
        let started_at_ms = started_at
            .duration_since(UNIX_EPOCH)
            .map(|since| u64::try_from(since.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        let summary = ReportSummary::tally(&phases);
        Self {
            family,
            component: component.into(),
            component_type: component_type.into(),
            phases,
            summary,
            started_at_ms,
            duration_us: micros(duration),
        }
    }

    /// Capability family exercised.
    #[must_use]
    pub const fn family(&self) -> CapabilityFamily {
        self.family
    }

    /// Component name from the descriptor.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Component type from the descriptor.
    #[must_use]
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    /// Phase outcomes in execution order.
    #[must_use]
    pub fn phases(&self) -> &[PhaseReport] {
        &self.phases
    }

    /// Looks up a phase by name.
    #[must_use]
    pub fn phase(&self, name: &str) -> Option<&PhaseReport> {
        self.phases.iter().find(|phase| phase.name == name)
    }

    /// Phase counts.
    #[must_use]
    pub const fn summary(&self) -> ReportSummary {
        self.summary
    }

    /// Run start as milliseconds since the Unix epoch.
    #[must_use]
    pub const fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    /// Total run time in microseconds.
    #[must_use]
    pub const fn duration_us(&self) -> u64 {
        self.duration_us
    }

    /// Reports whether every phase passed. Skipped phases count as failures.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.phases.iter().all(PhaseReport::passed)
    }

    /// Budget violations keyed by phase name.
    #[must_use]
    pub fn budget_violations(&self) -> Vec<(&str, &BudgetViolation)> {
        self.failures()
            .filter_map(|(phase, failure)| match failure {
                PhaseFailure::BudgetViolation(violation) => Some((phase, violation)),
                _ => None,
            })
            .collect()
    }

    /// Driver errors and mismatches keyed by phase name.
    #[must_use]
    pub fn functional_failures(&self) -> Vec<(&str, &PhaseFailure)> {
        self.failures()
            .filter(|(_, failure)| failure.is_functional())
            .collect()
    }

    /// Renders the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn failures(&self) -> impl Iterator<Item = (&str, &PhaseFailure)> {
        self.phases.iter().flat_map(|phase| {
            phase
                .failures
                .iter()
                .map(move |failure| (phase.name.as_str(), failure))
        })
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.all_passed() { "PASSED" } else { "FAILED" };
        writeln!(
            f,
            "{} conformance for '{}' ({}): {verdict}",
            self.family, self.component, self.component_type
        )?;
        writeln!(f, "  {:<18} {:<8} {:>12} {:>12}", "phase", "status", "elapsed", "budget")?;
        for phase in &self.phases {
            let budget = phase
                .budget_us
                .map_or_else(|| String::from("-"), |us| format!("{us}us"));
            writeln!(
                f,
                "  {:<18} {:<8} {:>12} {:>12}",
                phase.name,
                phase.status,
                format!("{}us", phase.elapsed_us),
                budget
            )?;
            for failure in &phase.failures {
                writeln!(f, "      - {failure}")?;
            }
        }
        write!(
            f,
            "  {} passed, {} failed, {} skipped in {}us",
            self.summary.passed, self.summary.failed, self.summary.skipped, self.duration_us
        )
    }
}
