//! Conformance harness for state, pub/sub, and secret store drivers.
//!
//! The harness loads a component descriptor, builds the driver under test
//! through a caller-supplied factory, and walks it through a fixed phase
//! sequence for its capability family. Each phase is timed against a
//! [`LatencyBudget`] and checked for the expected outcome; every phase runs
//! even when earlier ones fail, and the results are collected into a
//! [`ConformanceReport`].
//!
//! Entry points:
//!
//! - [`run_state_conformance`]
//! - [`run_pubsub_conformance`]
//! - [`run_secret_conformance`]
//! - [`run_suite`] and [`run_suite_file`] for a whole [`TestMatrix`](conformance_config::TestMatrix)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use conformance_config::StateTestConfig;
//! use conformance_contracts::{
//!     DeleteRequest, DriverError, GetRequest, PropertyMap, SetRequest, StateDriver,
//! };
//! use conformance_harness::run_state_conformance;
//!
//! struct Null;
//!
//! impl StateDriver for Null {
//!     fn init(&mut self, _: &PropertyMap) -> Result<(), DriverError> { Ok(()) }
//!     fn get(&self, _: &GetRequest) -> Result<Option<Vec<u8>>, DriverError> { Ok(None) }
//!     fn set(&self, _: &SetRequest) -> Result<(), DriverError> { Ok(()) }
//!     fn delete(&self, _: &DeleteRequest) -> Result<(), DriverError> { Ok(()) }
//! }
//!
//! let report = run_state_conformance(
//!     Path::new("tests/config/state/null"),
//!     || Null,
//!     &StateTestConfig::default(),
//! )?;
//! println!("{report}");
//! # Ok::<(), conformance_harness::SetupError>(())
//! ```

pub mod budget;
pub mod delivery;
pub mod error;
pub mod families;
pub mod keys;
pub mod phase;
pub mod registry;
pub mod report;
pub mod runner;
pub mod session;
pub mod suite;
pub mod telemetry;

pub use self::budget::{BudgetViolation, LatencyBudget};
pub use self::delivery::{DeliveryCounter, DeliveryOutcome};
pub use self::error::SetupError;
pub use self::families::pubsub::{run_pubsub_component, run_pubsub_conformance};
pub use self::families::secret::{run_secret_component, run_secret_conformance};
pub use self::families::state::{run_state_component, run_state_conformance};
pub use self::phase::{Phase, Probe};
pub use self::registry::DriverRegistry;
pub use self::report::{ConformanceReport, PhaseFailure, PhaseReport, PhaseStatus, ReportSummary};
pub use self::runner::ConformanceRunner;
pub use self::session::DriverSession;
pub use self::suite::{SetupFailure, SuiteReport, run_suite, run_suite_file};
pub use self::telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
