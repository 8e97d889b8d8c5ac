//! Tunables for the state family.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::{default_bulk_requests, default_state_read_budget, default_state_write_budget};
use crate::duration::millis;

/// Latency ceilings and bulk size for a state conformance run.
///
/// Bulk phases are budgeted as the singular ceiling multiplied by
/// [`bulk_requests`](Self::bulk_requests).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use conformance_config::StateTestConfig;
///
/// let config = StateTestConfig::default()
///     .with_max_get(Duration::from_millis(5))
///     .with_bulk_requests(4);
/// assert_eq!(config.max_get(), Duration::from_millis(5));
/// assert_eq!(config.bulk_requests(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTestConfig {
    #[serde(rename = "max_init_ms", with = "millis", default = "default_state_write_budget")]
    max_init: Duration,
    #[serde(rename = "max_set_ms", with = "millis", default = "default_state_write_budget")]
    max_set: Duration,
    #[serde(rename = "max_get_ms", with = "millis", default = "default_state_read_budget")]
    max_get: Duration,
    #[serde(rename = "max_delete_ms", with = "millis", default = "default_state_read_budget")]
    max_delete: Duration,
    #[serde(default = "default_bulk_requests")]
    bulk_requests: usize,
}

impl Default for StateTestConfig {
    fn default() -> Self {
        Self {
            max_init: default_state_write_budget(),
            max_set: default_state_write_budget(),
            max_get: default_state_read_budget(),
            max_delete: default_state_read_budget(),
            bulk_requests: default_bulk_requests(),
        }
    }
}

impl StateTestConfig {
    /// Sets the same ceiling for every singular operation.
    #[must_use]
    pub const fn uniform(budget: Duration, bulk_requests: usize) -> Self {
        Self {
            max_init: budget,
            max_set: budget,
            max_get: budget,
            max_delete: budget,
            bulk_requests,
        }
    }

    /// Overrides the init ceiling.
    #[must_use]
    pub const fn with_max_init(mut self, budget: Duration) -> Self {
        self.max_init = budget;
        self
    }

    /// Overrides the set ceiling.
    #[must_use]
    pub const fn with_max_set(mut self, budget: Duration) -> Self {
        self.max_set = budget;
        self
    }

    /// Overrides the get ceiling.
    #[must_use]
    pub const fn with_max_get(mut self, budget: Duration) -> Self {
        self.max_get = budget;
        self
    }

    /// Overrides the delete ceiling.
    #[must_use]
    pub const fn with_max_delete(mut self, budget: Duration) -> Self {
        self.max_delete = budget;
        self
    }

    /// Overrides the bulk request count.
    #[must_use]
    pub const fn with_bulk_requests(mut self, bulk_requests: usize) -> Self {
        self.bulk_requests = bulk_requests;
        self
    }

    /// Ceiling for `init`.
    #[must_use]
    pub const fn max_init(&self) -> Duration {
        self.max_init
    }

    /// Ceiling for `set`.
    #[must_use]
    pub const fn max_set(&self) -> Duration {
        self.max_set
    }

    /// Ceiling for `get`.
    #[must_use]
    pub const fn max_get(&self) -> Duration {
        self.max_get
    }

    /// Ceiling for `delete`.
    #[must_use]
    pub const fn max_delete(&self) -> Duration {
        self.max_delete
    }

    /// Number of items in each bulk phase.
    #[must_use]
    pub const fn bulk_requests(&self) -> usize {
        self.bulk_requests
    }
}
