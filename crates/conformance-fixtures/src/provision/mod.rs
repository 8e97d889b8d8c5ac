//! Descriptors for externally hosted backends, built from credentials.
//!
//! Cloud-hosted components cannot ship a static descriptor because their
//! credentials live in the environment of the machine running the suite.
//! [`CosmosCollection`] reads those credentials, picks a fresh collection
//! name per run, and writes a descriptor the family runners can load.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use conformance_config::{CredentialError, StateTestConfig, collect_required};
use conformance_contracts::DriverError;
use conformance_descriptor::ComponentDescriptor;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::info;

/// Variable holding the Cosmos DB account name.
pub const COSMOS_ACCOUNT_ENV: &str = "COSMODB_ACCOUNT_NAME";

/// Variable holding the Cosmos DB master key.
pub const COSMOS_MASTER_KEY_ENV: &str = "COSMODB_MASTER_KEY";

/// Variable holding the Cosmos DB database name.
pub const COSMOS_DATABASE_ENV: &str = "COSMODB_NAME";

/// Component type of the rendered descriptor.
pub const COSMOS_STATE_TYPE: &str = "state.azure.cosmosdb";

const COLLECTION_PREFIX: &str = "test-coll-";
const COLLECTION_SUFFIX_LENGTH: usize = 12;
const DESCRIPTOR_FILE: &str = "statestore.yaml";

/// A throwaway Cosmos DB collection for one state run.
#[derive(Clone, PartialEq, Eq)]
pub struct CosmosCollection {
    account: String,
    master_key: String,
    database: String,
    collection: String,
}

impl CosmosCollection {
    /// Reads credentials from the environment and names a new collection.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Missing`] listing every unset variable.
    pub fn from_env() -> Result<Self, CredentialError> {
        let mut found =
            collect_required([COSMOS_ACCOUNT_ENV, COSMOS_MASTER_KEY_ENV, COSMOS_DATABASE_ENV])?;
        let mut take = |name: &str| found.remove(name).unwrap_or_default();
        Ok(Self::new(
            take(COSMOS_ACCOUNT_ENV),
            take(COSMOS_MASTER_KEY_ENV),
            take(COSMOS_DATABASE_ENV),
        ))
    }

    /// Creates a collection handle from explicit credentials.
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        master_key: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            master_key: master_key.into(),
            database: database.into(),
            collection: collection_name(),
        }
    }

    /// Returns the account name.
    #[must_use]
    pub const fn account(&self) -> &str {
        self.account.as_str()
    }

    /// Returns the database name.
    #[must_use]
    pub const fn database(&self) -> &str {
        self.database.as_str()
    }

    /// Returns the generated collection name.
    #[must_use]
    pub const fn collection(&self) -> &str {
        self.collection.as_str()
    }

    /// Returns the account endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("https://{}.documents.azure.com:443", self.account)
    }

    /// Builds the component descriptor for this collection.
    #[must_use]
    pub fn descriptor(&self) -> ComponentDescriptor {
        ComponentDescriptor::new("statestore", COSMOS_STATE_TYPE, "v1")
            .with_property("url", self.endpoint())
            .with_property("masterKey", self.master_key.as_str())
            .with_property("database", self.database.as_str())
            .with_property("collection", self.collection.as_str())
    }

    /// Writes the descriptor into `dir` and returns the file path.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Io`] when the directory or file cannot be
    /// written, and [`DriverError::Operation`] when rendering fails.
    pub fn write_descriptor(&self, dir: &Path) -> Result<PathBuf, DriverError> {
        fs::create_dir_all(dir).map_err(|source| {
            DriverError::io(format!("creating '{}'", dir.display()), source)
        })?;
        let path = dir.join(DESCRIPTOR_FILE);
        let yaml = self
            .descriptor()
            .to_yaml()
            .map_err(|error| DriverError::operation("write_descriptor", error.to_string()))?;
        fs::write(&path, yaml).map_err(|source| {
            DriverError::io(format!("writing '{}'", path.display()), source)
        })?;
        info!(
            target: "conformance::fixtures",
            account = %self.account,
            collection = %self.collection,
            path = %path.display(),
            "rendered cosmos descriptor"
        );
        Ok(path)
    }

    /// Returns the tunables used against a remote Cosmos DB account.
    #[must_use]
    pub const fn state_config() -> StateTestConfig {
        StateTestConfig::uniform(Duration::from_millis(1000), 10)
    }
}

impl std::fmt::Debug for CosmosCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmosCollection")
            .field("account", &self.account)
            .field("master_key", &"<redacted>")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

fn collection_name() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(COLLECTION_SUFFIX_LENGTH)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();
    format!("{COLLECTION_PREFIX}{suffix}")
}

#[cfg(test)]
mod tests;
