//! Shared in-process drivers and fixtures for harness tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use conformance_contracts::{
    BulkGetSecretRequest, BulkSecretData, DeleteRequest, DriverError, GetRequest,
    GetSecretRequest, Message, MessageHandler, PropertyMap, PubSubDriver, PublishRequest,
    SecretData, SecretDriver, SetRequest, StateDriver, SubscribeRequest,
};

/// Writes one descriptor file into `dir` and returns its path.
pub(crate) fn write_descriptor(dir: &Path, file: &str, component_type: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("create descriptor dir");
    let path = dir.join(file);
    let yaml = format!(
        "apiVersion: dapr.io/v1alpha1\nkind: Component\nmetadata:\n  name: {stem}\nspec:\n  type: {component_type}\n  version: v1\n  metadata:\n  - name: endpoint\n    value: local\n",
        stem = file.trim_end_matches(".yaml")
    );
    fs::write(&path, yaml).expect("write descriptor");
    path
}

/// A map-backed state driver with knobs for misbehaviour.
#[derive(Default)]
pub(crate) struct MemoryStore {
    pub(crate) entries: Mutex<HashMap<String, Vec<u8>>>,
    pub(crate) set_delay: Duration,
    pub(crate) ignore_deletes: bool,
    pub(crate) initialised_with: Arc<Mutex<Option<PropertyMap>>>,
    pub(crate) closes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub(crate) fn with_closes(closes: &Arc<AtomicUsize>) -> Self {
        Self {
            closes: Arc::clone(closes),
            ..Self::default()
        }
    }
}

impl StateDriver for MemoryStore {
    fn init(&mut self, properties: &PropertyMap) -> Result<(), DriverError> {
        *self.initialised_with.lock().expect("init lock") = Some(properties.clone());
        Ok(())
    }

    fn get(&self, request: &GetRequest) -> Result<Option<Vec<u8>>, DriverError> {
        let entries = self.entries.lock().expect("store lock");
        Ok(entries.get(request.key()).cloned())
    }

    fn set(&self, request: &SetRequest) -> Result<(), DriverError> {
        if !self.set_delay.is_zero() {
            thread::sleep(self.set_delay);
        }
        self.entries
            .lock()
            .expect("store lock")
            .insert(request.key().to_owned(), request.value().to_vec());
        Ok(())
    }

    fn delete(&self, request: &DeleteRequest) -> Result<(), DriverError> {
        if !self.ignore_deletes {
            self.entries.lock().expect("store lock").remove(request.key());
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A broker that delivers each publish on a fresh thread.
#[derive(Default)]
pub(crate) struct LoopbackBroker {
    pub(crate) handlers: Arc<Mutex<HashMap<String, Vec<MessageHandler>>>>,
    pub(crate) drop_every_other: bool,
    pub(crate) refuse_subscribe: bool,
    pub(crate) publishes: Arc<AtomicUsize>,
    pub(crate) closes: Arc<AtomicUsize>,
}

impl PubSubDriver for LoopbackBroker {
    fn init(&mut self, _properties: &PropertyMap) -> Result<(), DriverError> {
        Ok(())
    }

    fn publish(&self, request: &PublishRequest) -> Result<(), DriverError> {
        let sequence = self.publishes.fetch_add(1, Ordering::SeqCst);
        if self.drop_every_other && sequence & 1 == 1 {
            return Ok(());
        }
        let handlers = self
            .handlers
            .lock()
            .expect("broker lock")
            .get(request.topic())
            .cloned()
            .unwrap_or_default();
        let message = Message::new(
            request.topic(),
            request.data().to_vec(),
            request.metadata().clone(),
        );
        thread::spawn(move || {
            for handler in handlers {
                if handler(&message).is_err() {
                    break;
                }
            }
        });
        Ok(())
    }

    fn subscribe(
        &self,
        request: &SubscribeRequest,
        handler: MessageHandler,
    ) -> Result<(), DriverError> {
        if self.refuse_subscribe {
            return Err(DriverError::operation("subscribe", "topic does not exist"));
        }
        self.handlers
            .lock()
            .expect("broker lock")
            .entry(request.topic().to_owned())
            .or_default()
            .push(handler);
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.handlers.lock().expect("broker lock").clear();
        Ok(())
    }
}

/// A secret store over a fixed map.
pub(crate) struct FixedSecrets {
    secrets: HashMap<String, String>,
}

impl FixedSecrets {
    pub(crate) fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            secrets: entries
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .collect(),
        }
    }
}

impl SecretDriver for FixedSecrets {
    fn init(&mut self, _properties: &PropertyMap) -> Result<(), DriverError> {
        Ok(())
    }

    fn get_secret(&self, request: &GetSecretRequest) -> Result<SecretData, DriverError> {
        self.secrets
            .get(request.name())
            .map(|value| SecretData::from([(request.name().to_owned(), value.clone())]))
            .ok_or_else(|| DriverError::SecretNotFound {
                name: request.name().to_owned(),
            })
    }

    fn bulk_get_secret(
        &self,
        _request: &BulkGetSecretRequest,
    ) -> Result<BulkSecretData, DriverError> {
        Ok(self
            .secrets
            .iter()
            .map(|(key, value)| (key.clone(), SecretData::from([(key.clone(), value.clone())])))
            .collect())
    }
}
