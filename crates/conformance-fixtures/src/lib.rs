//! In-process drivers for exercising the conformance harness.
//!
//! These drivers need no external services, so they double as reference
//! implementations of the capability contracts and as the targets of the
//! harness's own end-to-end tests:
//!
//! - [`MemoryStateStore`] for the state family
//! - [`MemoryPubSub`] for the pub/sub family
//! - [`LocalFileSecretStore`] and [`EnvSecretStore`] for secret stores
//!
//! [`FaultInjector`] makes the state store and broker fail or slow down on
//! demand. [`CosmosCollection`] renders descriptors for a hosted backend
//! from environment credentials.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use conformance_config::StateTestConfig;
//! use conformance_fixtures::MemoryStateStore;
//! use conformance_harness::run_state_conformance;
//!
//! let report = run_state_conformance(
//!     Path::new("tests/config/state/memory"),
//!     MemoryStateStore::new,
//!     &StateTestConfig::default(),
//! )?;
//! assert!(report.all_passed());
//! # Ok::<(), conformance_harness::SetupError>(())
//! ```

pub mod builtin;
pub mod fault;
pub mod provision;
pub mod pubsub;
pub mod secret;
pub mod state;

pub use self::builtin::{fixture_registry, register_fixtures};
pub use self::fault::FaultInjector;
pub use self::provision::CosmosCollection;
pub use self::pubsub::MemoryPubSub;
pub use self::secret::{EnvSecretStore, LocalFileSecretStore};
pub use self::state::MemoryStateStore;
