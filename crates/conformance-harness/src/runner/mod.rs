//! The generic phase engine.
//!
//! A [`ConformanceRunner`] executes a family's phases strictly in order
//! against one driver session. A failing phase never stops the run; only a
//! phase with an unmet prerequisite is skipped. Once every phase has been
//! attempted the session is closed and the close is recorded as a final
//! `close` phase.

use std::time::{Instant, SystemTime};

use conformance_contracts::CapabilityFamily;
use tracing::{debug, info, warn};

use crate::budget::LatencyBudget;
use crate::phase::{Phase, Probe};
use crate::report::{ConformanceReport, PhaseFailure, PhaseReport};
use crate::session::DriverSession;

/// Name of the teardown phase appended to every run.
pub const CLOSE_PHASE: &str = "close";

/// Executes an ordered phase list and assembles the report.
#[derive(Debug)]
pub struct ConformanceRunner<C> {
    family: CapabilityFamily,
    component: String,
    component_type: String,
    phases: Vec<Phase<C>>,
}

impl<C> ConformanceRunner<C> {
    /// Creates a runner with no phases.
    #[must_use]
    pub fn new(
        family: CapabilityFamily,
        component: impl Into<String>,
        component_type: impl Into<String>,
    ) -> Self {
        Self {
            family,
            component: component.into(),
            component_type: component_type.into(),
            phases: Vec::new(),
        }
    }

    /// Appends one phase.
    #[must_use]
    pub fn phase(mut self, phase: Phase<C>) -> Self {
        self.phases.push(phase);
        self
    }

    /// Appends several phases in order.
    #[must_use]
    pub fn phases(mut self, phases: impl IntoIterator<Item = Phase<C>>) -> Self {
        self.phases.extend(phases);
        self
    }

    /// Runs every phase, closes the session, and returns the report.
    #[must_use]
    pub fn run(self, mut session: DriverSession<C>) -> ConformanceReport {
        let started_at = SystemTime::now();
        let clock = Instant::now();
        info!(
            target: "conformance",
            family = %self.family,
            component = %self.component,
            component_type = %self.component_type,
            phases = self.phases.len(),
            "conformance run started"
        );

        let mut reports: Vec<PhaseReport> = Vec::with_capacity(self.phases.len() + 1);
        for phase in self.phases {
            let report = execute(session.driver_mut(), phase, &reports);
            reports.push(report);
        }

        let (elapsed, outcome) = session.close();
        let mut failures = Vec::new();
        if let Err(error) = outcome {
            warn!(target: "conformance", phase = CLOSE_PHASE, %error, "driver error");
            failures.push(PhaseFailure::Driver { error });
        }
        reports.push(PhaseReport::completed(CLOSE_PHASE, elapsed, None, failures));

        let report = ConformanceReport::new(
            self.family,
            self.component,
            self.component_type,
            started_at,
            reports,
            clock.elapsed(),
        );
        info!(
            target: "conformance",
            family = %report.family(),
            component = %report.component(),
            passed = report.summary().passed,
            failed = report.summary().failed,
            skipped = report.summary().skipped,
            "conformance run finished"
        );
        report
    }
}

fn execute<C>(driver: &mut C, phase: Phase<C>, earlier: &[PhaseReport]) -> PhaseReport {
    let name = phase.name().to_owned();
    let budget = phase.budget();
    let budget_us = budget.as_ref().map(LatencyBudget::ceiling_us);

    let unmet = phase.prerequisites().iter().find(|required| {
        !earlier
            .iter()
            .any(|report| report.name() == required.as_str() && report.passed())
    });
    if let Some(required) = unmet {
        let reason = format!("prerequisite '{required}' did not pass");
        warn!(target: "conformance", phase = %name, %reason, "phase skipped");
        return PhaseReport::skipped(name, budget_us, reason);
    }

    debug!(target: "conformance", phase = %name, "phase started");
    let mut probe = Probe::new();
    let result = (phase.into_action())(driver, &mut probe);
    let (elapsed, mismatches) = probe.into_parts();

    let mut failures = Vec::new();
    if let Err(error) = result {
        warn!(target: "conformance", phase = %name, %error, "driver error");
        failures.push(PhaseFailure::Driver { error });
    }
    for message in mismatches {
        warn!(target: "conformance", phase = %name, %message, "functional mismatch");
        failures.push(PhaseFailure::Mismatch { message });
    }
    if let Some(violation) = budget.and_then(|ceiling| ceiling.check(elapsed).err()) {
        warn!(target: "conformance", phase = %name, %violation, "budget violation");
        failures.push(PhaseFailure::BudgetViolation(violation));
    }

    let report = PhaseReport::completed(name, elapsed, budget_us, failures);
    info!(
        target: "conformance",
        phase = %report.name(),
        status = %report.status(),
        elapsed_us = report.elapsed_us(),
        "phase finished"
    );
    report
}
