//! Local secret stores.
//!
//! Both stores answer `get_secret(name)` with a single-entry map
//! `{name: value}` and `bulk_get_secret` with one such map per secret.

mod env;
mod file;

pub use self::env::{ENV_SECRET_TYPE, EnvSecretStore};
pub use self::file::{
    DEFAULT_NESTED_SEPARATOR, FILE_SECRET_TYPE, LocalFileSecretStore, NESTED_SEPARATOR_PROPERTY,
    SECRETS_FILE_PROPERTY,
};

use conformance_contracts::{BulkSecretData, SecretData};

fn single(name: &str, value: String) -> SecretData {
    SecretData::from([(name.to_owned(), value)])
}

fn bulk<I>(entries: I) -> BulkSecretData
where
    I: IntoIterator<Item = (String, String)>,
{
    entries
        .into_iter()
        .map(|(name, value)| {
            let data = single(&name, value);
            (name, data)
        })
        .collect()
}
