//! Secret store backed by a JSON file.
//!
//! The file holds one JSON object. Nested objects and arrays are flattened
//! into a single level, joining keys with the nested separator, so
//! `{"db": {"user": "u"}}` exposes the secret `db:user`. Scalars other than
//! strings keep their JSON text; `null` entries are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use conformance_contracts::{
    BulkGetSecretRequest, BulkSecretData, DriverError, GetSecretRequest, PropertyMap,
    SecretData, SecretDriver,
};
use serde_json::Value;
use tracing::debug;

use super::{bulk, single};

/// Component type the store registers under.
pub const FILE_SECRET_TYPE: &str = "secretstores.local.file";

/// Required property naming the JSON secrets file.
pub const SECRETS_FILE_PROPERTY: &str = "secretsFile";

/// Optional property overriding the key separator for nested values.
pub const NESTED_SEPARATOR_PROPERTY: &str = "nestedSeparator";

/// Separator used when [`NESTED_SEPARATOR_PROPERTY`] is absent.
pub const DEFAULT_NESTED_SEPARATOR: &str = ":";

/// [`SecretDriver`] reading a flattened JSON document.
#[derive(Debug, Default)]
pub struct LocalFileSecretStore {
    secrets: Option<HashMap<String, String>>,
}

impl LocalFileSecretStore {
    /// Creates an uninitialised store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn secrets(&self) -> Result<&HashMap<String, String>, DriverError> {
        self.secrets
            .as_ref()
            .ok_or_else(|| DriverError::NotInitialised {
                driver: String::from(FILE_SECRET_TYPE),
            })
    }
}

impl SecretDriver for LocalFileSecretStore {
    fn init(&mut self, properties: &PropertyMap) -> Result<(), DriverError> {
        let path = PathBuf::from(properties.require(SECRETS_FILE_PROPERTY)?);
        let separator = properties
            .get(NESTED_SEPARATOR_PROPERTY)
            .unwrap_or(DEFAULT_NESTED_SEPARATOR);
        let text = fs::read_to_string(&path).map_err(|source| {
            DriverError::io(format!("reading secrets file '{}'", path.display()), source)
        })?;
        let document: Value =
            serde_json::from_str(&text).map_err(|error| DriverError::InvalidProperty {
                name: String::from(SECRETS_FILE_PROPERTY),
                message: format!("'{}' is not valid JSON: {error}", path.display()),
            })?;
        let Value::Object(root) = document else {
            return Err(DriverError::InvalidProperty {
                name: String::from(SECRETS_FILE_PROPERTY),
                message: format!("'{}' must hold a JSON object", path.display()),
            });
        };

        let mut secrets = HashMap::new();
        for (key, value) in root {
            flatten(key, value, separator, &mut secrets);
        }
        debug!(
            target: "conformance::fixtures",
            path = %path.display(),
            secrets = secrets.len(),
            "loaded secrets file"
        );
        self.secrets = Some(secrets);
        Ok(())
    }

    fn get_secret(&self, request: &GetSecretRequest) -> Result<SecretData, DriverError> {
        let value = self
            .secrets()?
            .get(request.name())
            .cloned()
            .ok_or_else(|| DriverError::SecretNotFound {
                name: request.name().to_owned(),
            })?;
        Ok(single(request.name(), value))
    }

    fn bulk_get_secret(
        &self,
        _request: &BulkGetSecretRequest,
    ) -> Result<BulkSecretData, DriverError> {
        Ok(bulk(self.secrets()?.clone()))
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.secrets = None;
        Ok(())
    }
}

fn flatten(prefix: String, value: Value, separator: &str, out: &mut HashMap<String, String>) {
    match value {
        Value::Null => {}
        Value::String(text) => {
            out.insert(prefix, text);
        }
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(format!("{prefix}{separator}{key}"), nested, separator, out);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.into_iter().enumerate() {
                flatten(format!("{prefix}{separator}{index}"), nested, separator, out);
            }
        }
        scalar @ (Value::Bool(_) | Value::Number(_)) => {
            out.insert(prefix, scalar.to_string());
        }
    }
}
