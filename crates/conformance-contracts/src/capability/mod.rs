//! Capability families a driver can be certified against.
//!
//! Each family is identified by a [`CapabilityFamily`]. Descriptors name the
//! family through the prefix of their component type (`state.redis`,
//! `pubsub.redis`, `secretstores.local.file`), and descriptor directories are
//! grouped by the family's directory name.


use serde::{Deserialize, Serialize};

/// Identifies one of the standardized capability contracts.
///
/// # Example
///
/// ```
/// use conformance_contracts::CapabilityFamily;
///
/// let family = CapabilityFamily::SecretStore;
/// assert_eq!(family.as_str(), "secretstore");
/// assert_eq!(family.config_dir(), "secretstores");
/// assert_eq!(
///     CapabilityFamily::from_component_type("secretstores.local.file"),
///     Some(CapabilityFamily::SecretStore)
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityFamily {
    /// Key-value state storage.
    State,
    /// Publish/subscribe messaging.
    PubSub,
    /// Secret retrieval.
    SecretStore,
}

impl CapabilityFamily {
    /// All families in the order suites run them.
    pub const ALL: [Self; 3] = [Self::State, Self::PubSub, Self::SecretStore];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::PubSub => "pubsub",
            Self::SecretStore => "secretstore",
        }
    }

    /// Returns the directory holding this family's component descriptors.
    #[must_use]
    pub const fn config_dir(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::PubSub => "pubsub",
            Self::SecretStore => "secretstores",
        }
    }

    /// Returns the component-type prefix, without the trailing dot.
    #[must_use]
    pub const fn type_prefix(self) -> &'static str {
        self.config_dir()
    }

    /// Infers the family from a descriptor component type such as
    /// `state.redis`.
    #[must_use]
    pub fn from_component_type(component_type: &str) -> Option<Self> {
        let (prefix, rest) = component_type.split_once('.')?;
        if rest.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|family| family.type_prefix() == prefix)
    }
}

impl std::fmt::Display for CapabilityFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
