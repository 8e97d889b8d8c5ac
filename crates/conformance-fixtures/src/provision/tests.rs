//! Unit tests for credential-driven descriptors.

use std::env;
use std::sync::{Mutex, MutexGuard};

use conformance_descriptor::load_component_descriptor;
use once_cell::sync::Lazy;
use tempfile::TempDir;

use super::*;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const COSMOS_VARS: [&str; 3] = [COSMOS_ACCOUNT_ENV, COSMOS_MASTER_KEY_ENV, COSMOS_DATABASE_ENV];

struct CosmosEnv {
    _guard: MutexGuard<'static, ()>,
}

impl CosmosEnv {
    fn with(values: &[(&str, &str)]) -> Self {
        let guard = ENV_MUTEX.lock().expect("env mutex");
        for name in COSMOS_VARS {
            // SAFETY: ENV_MUTEX serialises every environment mutation in this module.
            unsafe { env::remove_var(name) };
        }
        for (name, value) in values {
            // SAFETY: as above.
            unsafe { env::set_var(name, value) };
        }
        Self { _guard: guard }
    }
}

impl Drop for CosmosEnv {
    fn drop(&mut self) {
        for name in COSMOS_VARS {
            // SAFETY: the guard is still held while variables are removed.
            unsafe { env::remove_var(name) };
        }
    }
}

#[test]
fn from_env_reads_all_credentials() {
    let _env = CosmosEnv::with(&[
        (COSMOS_ACCOUNT_ENV, "acct"),
        (COSMOS_MASTER_KEY_ENV, "key=="),
        (COSMOS_DATABASE_ENV, "db"),
    ]);
    let collection = CosmosCollection::from_env().expect("credentials present");
    assert_eq!(collection.account(), "acct");
    assert_eq!(collection.database(), "db");
    assert_eq!(collection.endpoint(), "https://acct.documents.azure.com:443");
}

#[test]
fn from_env_names_every_missing_variable() {
    let _env = CosmosEnv::with(&[(COSMOS_ACCOUNT_ENV, "acct")]);
    let err = CosmosCollection::from_env().expect_err("credentials missing");
    assert_eq!(
        err,
        CredentialError::Missing {
            names: vec![
                String::from(COSMOS_MASTER_KEY_ENV),
                String::from(COSMOS_DATABASE_ENV)
            ],
        }
    );
}

#[test]
fn collection_names_are_prefixed_and_fresh() {
    let first = CosmosCollection::new("a", "k", "d");
    let second = CosmosCollection::new("a", "k", "d");
    assert!(first.collection().starts_with("test-coll-"));
    assert_eq!(first.collection().len(), "test-coll-".len() + 12);
    assert_ne!(first.collection(), second.collection());
}

#[test]
fn written_descriptor_loads_with_all_properties() {
    let dir = TempDir::new().expect("temp dir");
    let collection = CosmosCollection::new("acct", "a\"b\\c== #\r", "db");
    collection
        .write_descriptor(&dir.path().join("cosmosdb"))
        .expect("write");

    let component = load_component_descriptor(&dir.path().join("cosmosdb")).expect("load");
    assert_eq!(component.component_type(), COSMOS_STATE_TYPE);
    let props = component.properties();
    assert_eq!(props.get("url"), Some("https://acct.documents.azure.com:443"));
    assert_eq!(props.get("masterKey"), Some("a\"b\\c== #\r"));
    assert_eq!(props.get("database"), Some("db"));
    assert_eq!(props.get("collection"), Some(collection.collection()));
}

#[test]
fn debug_output_redacts_the_master_key() {
    let rendered = format!("{:?}", CosmosCollection::new("acct", "hunter2", "db"));
    assert!(!rendered.contains("hunter2"), "leaked: {rendered}");
}

#[test]
fn remote_budgets_are_one_second() {
    let config = CosmosCollection::state_config();
    assert_eq!(config.max_set(), std::time::Duration::from_secs(1));
    assert_eq!(config.bulk_requests(), 10);
}
