//! Component descriptors and the property resolver.
//!
//! Operators describe the driver under test with a YAML component
//! descriptor:
//!
//! ```yaml
//! apiVersion: dapr.io/v1alpha1
//! kind: Component
//! metadata:
//!   name: statestore
//! spec:
//!   type: state.redis
//!   version: v1
//!   metadata:
//!   - name: redisHost
//!     value: localhost:6379
//! ```
//!
//! Only `spec.type` and `spec.metadata` matter to a conformance run. The
//! loader reads a config path (a directory of descriptor files, or a single
//! file) and [`load_single`] insists that exactly one descriptor is found.
//! [`resolve`] then flattens `spec.metadata` into the
//! [`PropertyMap`](conformance_contracts::PropertyMap) handed to the driver.
//!
//! # Example
//!
//! ```
//! use conformance_descriptor::{ComponentDescriptor, resolve};
//!
//! let descriptor = ComponentDescriptor::new("statestore", "state.redis", "v1")
//!     .with_property("redisHost", "localhost:6379");
//! let props = resolve(&descriptor);
//! assert_eq!(props.get("redisHost"), Some("localhost:6379"));
//! ```

pub mod error;
pub mod loader;
pub mod model;

pub use self::error::DescriptorError;
pub use self::loader::{
    ResolvedComponent, load_component_descriptor, load_components, load_single, parse_descriptor,
};
pub use self::model::{ComponentDescriptor, ComponentSpec, DescriptorMetadata, MetadataItem};

use conformance_contracts::PropertyMap;

/// Flattens a descriptor's `spec.metadata` into a property map.
///
/// One entry is produced per metadata item; if a name repeats, the later
/// item wins.
#[must_use]
pub fn resolve(descriptor: &ComponentDescriptor) -> PropertyMap {
    descriptor
        .spec()
        .metadata()
        .iter()
        .map(|item| (item.name(), item.value()))
        .collect()
}
