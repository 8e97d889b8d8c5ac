//! Suite runs across a whole test matrix.
//!
//! For every component the matrix lists, the suite loads the descriptor
//! from `<config_root>/<family-dir>/<component>`, asks the registry for a
//! driver matching the descriptor's type, and runs the family. A setup
//! failure for one component is recorded and the suite moves on to the
//! next.

use std::fmt;

use camino::Utf8Path;
use conformance_config::TestMatrix;
use conformance_contracts::CapabilityFamily;
use conformance_descriptor::ResolvedComponent;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SetupError;
use crate::families::load_component;
use crate::families::pubsub::run_pubsub_component;
use crate::families::secret::run_secret_component;
use crate::families::state::run_state_component;
use crate::registry::DriverRegistry;
use crate::report::ConformanceReport;
use crate::telemetry;

/// A component that never reached its first phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupFailure {
    family: CapabilityFamily,
    component: String,
    message: String,
}

impl SetupFailure {
    /// Family of the component.
    #[must_use]
    pub const fn family(&self) -> CapabilityFamily {
        self.family
    }

    /// Component entry name from the matrix.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Rendered setup error.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of a suite run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    reports: Vec<ConformanceReport>,
    setup_failures: Vec<SetupFailure>,
}

impl SuiteReport {
    /// Family reports in matrix order: state, then pub/sub, then secrets.
    #[must_use]
    pub fn reports(&self) -> &[ConformanceReport] {
        &self.reports
    }

    /// Components that failed setup.
    #[must_use]
    pub fn setup_failures(&self) -> &[SetupFailure] {
        &self.setup_failures
    }

    /// Finds the report for a component by descriptor name.
    #[must_use]
    pub fn report(&self, family: CapabilityFamily, component: &str) -> Option<&ConformanceReport> {
        self.reports
            .iter()
            .find(|report| report.family() == family && report.component() == component)
    }

    /// Reports whether every component set up and passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.setup_failures.is_empty() && self.reports.iter().all(ConformanceReport::all_passed)
    }

    /// Renders the suite as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn record(&mut self, family: CapabilityFamily, component: &str, outcome: Result<ConformanceReport, SetupError>) {
        match outcome {
            Ok(report) => self.reports.push(report),
            Err(error) => self.setup_failures.push(SetupFailure {
                family,
                component: component.to_owned(),
                message: error.to_string(),
            }),
        }
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            writeln!(f, "{report}")?;
        }
        for failure in &self.setup_failures {
            writeln!(
                f,
                "{} conformance for '{}': SETUP FAILED: {}",
                failure.family, failure.component, failure.message
            )?;
        }
        let passed = self
            .reports
            .iter()
            .filter(|report| report.all_passed())
            .count();
        write!(
            f,
            "suite: {passed}/{} components passed",
            self.reports.len() + self.setup_failures.len()
        )
    }
}

/// Runs every component listed in `matrix`.
#[must_use]
pub fn run_suite(matrix: &TestMatrix, registry: &DriverRegistry) -> SuiteReport {
    let mut suite = SuiteReport::default();
    info!(
        target: "conformance",
        components = matrix.len(),
        config_root = %matrix.config_root,
        "conformance suite started"
    );

    for entry in &matrix.state {
        let outcome = prepare(matrix, CapabilityFamily::State, &entry.component).and_then(|component| {
            let driver = registry.state_driver(component.component_type())?;
            Ok(run_state_component(&component, driver, &entry.config))
        });
        suite.record(CapabilityFamily::State, &entry.component, outcome);
    }
    for entry in &matrix.pubsub {
        let outcome = prepare(matrix, CapabilityFamily::PubSub, &entry.component).and_then(|component| {
            let driver = registry.pubsub_driver(component.component_type())?;
            Ok(run_pubsub_component(&component, driver, &entry.config))
        });
        suite.record(CapabilityFamily::PubSub, &entry.component, outcome);
    }
    for entry in &matrix.secret_stores {
        let outcome =
            prepare(matrix, CapabilityFamily::SecretStore, &entry.component).and_then(|component| {
                let driver = registry.secret_driver(component.component_type())?;
                Ok(run_secret_component(&component, driver, &entry.config))
            });
        suite.record(CapabilityFamily::SecretStore, &entry.component, outcome);
    }

    info!(
        target: "conformance",
        reports = suite.reports.len(),
        setup_failures = suite.setup_failures.len(),
        passed = suite.all_passed(),
        "conformance suite finished"
    );
    suite
}

/// Loads the matrix at `path`, applies its log settings, and runs it.
///
/// The first successful call installs the global subscriber described by
/// the matrix's `log` block. Later calls keep that subscriber.
///
/// # Errors
///
/// Returns [`SetupError::Config`] when the matrix cannot be loaded and
/// [`SetupError::Telemetry`] when its log settings cannot be applied.
pub fn run_suite_file(path: &Utf8Path, registry: &DriverRegistry) -> Result<SuiteReport, SetupError> {
    let matrix = TestMatrix::load(path)?;
    let _telemetry = telemetry::initialise(&matrix.log)?;
    debug!(
        target: "conformance",
        matrix = %path,
        filter = %matrix.log.filter,
        format = %matrix.log.format,
        "telemetry configured from matrix"
    );
    Ok(run_suite(&matrix, registry))
}

fn prepare(
    matrix: &TestMatrix,
    family: CapabilityFamily,
    component: &str,
) -> Result<ResolvedComponent, SetupError> {
    let path = matrix.descriptor_path(family, component);
    load_component(family, path.as_std_path())
}

#[cfg(test)]
mod tests;
