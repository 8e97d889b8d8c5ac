//! Capability contracts that backend drivers implement.
//!
//! A driver is a backend-specific client for exactly one capability family:
//! key-value state storage ([`StateDriver`]), publish/subscribe messaging
//! ([`PubSubDriver`]), or secret retrieval ([`SecretDriver`]). The conformance
//! harness only ever talks to drivers through these traits, so any backend
//! that implements one of them can be certified without the harness knowing
//! anything about the backend itself.
//!
//! Every driver is initialised from a [`PropertyMap`] resolved from the
//! operator's component descriptor. Fallible calls report a [`DriverError`].
//!
//! # Example
//!
//! ```
//! use conformance_contracts::{
//!     DeleteRequest, DriverError, GetRequest, PropertyMap, SetRequest, StateDriver,
//! };
//! use std::collections::HashMap;
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct TinyStore(Mutex<HashMap<String, Vec<u8>>>);
//!
//! impl StateDriver for TinyStore {
//!     fn init(&mut self, _properties: &PropertyMap) -> Result<(), DriverError> {
//!         Ok(())
//!     }
//!
//!     fn get(&self, request: &GetRequest) -> Result<Option<Vec<u8>>, DriverError> {
//!         Ok(self.0.lock().unwrap().get(request.key()).cloned())
//!     }
//!
//!     fn set(&self, request: &SetRequest) -> Result<(), DriverError> {
//!         self.0
//!             .lock()
//!             .unwrap()
//!             .insert(request.key().to_owned(), request.value().to_vec());
//!         Ok(())
//!     }
//!
//!     fn delete(&self, request: &DeleteRequest) -> Result<(), DriverError> {
//!         self.0.lock().unwrap().remove(request.key());
//!         Ok(())
//!     }
//! }
//!
//! let mut store = TinyStore::default();
//! store.init(&PropertyMap::new()).unwrap();
//! store.set(&SetRequest::new("k", b"v".to_vec())).unwrap();
//! assert_eq!(store.get(&GetRequest::new("k")).unwrap(), Some(b"v".to_vec()));
//! ```

pub mod capability;
pub mod error;
pub mod properties;
pub mod pubsub;
pub mod secret;
pub mod state;

pub use self::capability::CapabilityFamily;
pub use self::error::DriverError;
pub use self::properties::PropertyMap;
pub use self::pubsub::{Message, MessageHandler, PubSubDriver, PublishRequest, SubscribeRequest};
pub use self::secret::{
    BulkGetSecretRequest, BulkSecretData, GetSecretRequest, SecretData, SecretDriver,
};
pub use self::state::{DeleteRequest, GetRequest, SetRequest, StateDriver};
