//! The test matrix: which components each family runs against.
//!
//! A matrix is a YAML document listing component entries per family:
//!
//! ```yaml
//! config_root: config
//! log:
//!   filter: conformance=debug
//! state:
//!   - component: memory
//!     config:
//!       bulk_requests: 5
//! pubsub:
//!   - component: memory
//! secretstores:
//!   - component: file
//! ```
//!
//! Descriptors live at `<config_root>/<family-dir>/<component>`. A relative
//! `config_root` is resolved against the directory holding the matrix file.

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use conformance_contracts::CapabilityFamily;
use serde::{Deserialize, Serialize};

use crate::defaults::default_config_root;
use crate::error::ConfigError;
use crate::logging::LogSettings;
use crate::pubsub::PubSubTestConfig;
use crate::secret::SecretTestConfig;
use crate::state::StateTestConfig;

/// One component under test together with its family tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEntry<C> {
    /// Directory name of the component under the family directory.
    pub component: String,
    /// Family tunables; defaults apply when omitted.
    #[serde(default)]
    pub config: C,
}

impl<C: Default> ComponentEntry<C> {
    /// Creates an entry with default tunables.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            config: C::default(),
        }
    }
}

/// The full set of conformance runs for a suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMatrix {
    /// Root directory holding the per-family descriptor directories.
    #[serde(default = "default_config_root")]
    pub config_root: Utf8PathBuf,
    /// Logging settings for the run.
    #[serde(default)]
    pub log: LogSettings,
    /// State store components.
    #[serde(default)]
    pub state: Vec<ComponentEntry<StateTestConfig>>,
    /// Pub/sub components.
    #[serde(default)]
    pub pubsub: Vec<ComponentEntry<PubSubTestConfig>>,
    /// Secret store components.
    #[serde(default, rename = "secretstores")]
    pub secret_stores: Vec<ComponentEntry<SecretTestConfig>>,
}

impl Default for TestMatrix {
    fn default() -> Self {
        Self {
            config_root: default_config_root(),
            log: LogSettings::default(),
            state: Vec::new(),
            pubsub: Vec::new(),
            secret_stores: Vec::new(),
        }
    }
}

impl TestMatrix {
    /// Parses and validates a matrix document.
    ///
    /// `origin` only labels errors. `config_root` is left as written.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_yaml_str(origin: &str, text: &str) -> Result<Self, ConfigError> {
        let matrix: Self = serde_saphyr::from_str(text).map_err(|error| ConfigError::Parse {
            origin: origin.to_owned(),
            message: error.to_string(),
        })?;
        matrix.validate()?;
        Ok(matrix)
    }

    /// Loads a matrix file, anchoring a relative `config_root` at the
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, plus any
    /// error from [`TestMatrix::from_yaml_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        let mut matrix = Self::from_yaml_str(path.as_str(), &text)?;
        if matrix.config_root.is_relative() {
            let base = path.parent().unwrap_or_else(|| Utf8Path::new("."));
            matrix.config_root = base.join(&matrix.config_root);
        }
        Ok(matrix)
    }

    /// Returns the descriptor path for a component of `family`.
    #[must_use]
    pub fn descriptor_path(&self, family: CapabilityFamily, component: &str) -> Utf8PathBuf {
        self.config_root.join(family.config_dir()).join(component)
    }

    /// Number of component runs listed across all families.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len() + self.pubsub.len() + self.secret_stores.len()
    }

    /// Reports whether the matrix lists no component runs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks entry names and tunables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for blank or duplicate component
    /// names within a family, a zero bulk size, or a zero message count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_names(
            CapabilityFamily::State,
            self.state.iter().map(|entry| entry.component.as_str()),
        )?;
        check_names(
            CapabilityFamily::PubSub,
            self.pubsub.iter().map(|entry| entry.component.as_str()),
        )?;
        check_names(
            CapabilityFamily::SecretStore,
            self.secret_stores.iter().map(|entry| entry.component.as_str()),
        )?;

        if let Some(entry) = self.state.iter().find(|entry| entry.config.bulk_requests() == 0) {
            return Err(invalid(format!(
                "state component '{}' must use at least one bulk request",
                entry.component
            )));
        }
        if let Some(entry) = self.pubsub.iter().find(|entry| entry.config.message_count() == 0) {
            return Err(invalid(format!(
                "pubsub component '{}' must publish at least one message",
                entry.component
            )));
        }
        Ok(())
    }
}

fn check_names<'a>(
    family: CapabilityFamily,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(invalid(format!("{family} entry has an empty component name")));
        }
        if !seen.insert(name) {
            return Err(invalid(format!(
                "{family} component '{name}' is listed more than once"
            )));
        }
    }
    Ok(())
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid { message }
}
