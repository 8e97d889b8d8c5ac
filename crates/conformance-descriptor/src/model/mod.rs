//! Descriptor document model.
//!
//! The shape mirrors the component documents operators already write for
//! their runtime: an envelope (`apiVersion`, `kind`, `metadata.name`) and a
//! `spec` naming the component type, its version, and an ordered list of
//! `{name, value}` metadata entries.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;

const DEFAULT_API_VERSION: &str = "dapr.io/v1alpha1";
const COMPONENT_KIND: &str = "Component";

/// A parsed component descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    #[serde(default = "default_api_version")]
    api_version: String,
    #[serde(default = "default_kind")]
    kind: String,
    metadata: DescriptorMetadata,
    spec: ComponentSpec,
}

fn default_api_version() -> String {
    String::from(DEFAULT_API_VERSION)
}

fn default_kind() -> String {
    String::from(COMPONENT_KIND)
}

/// The `metadata` envelope block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorMetadata {
    name: String,
}

impl DescriptorMetadata {
    /// Returns the component name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// The `spec` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    #[serde(rename = "type")]
    component_type: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    metadata: Vec<MetadataItem>,
}

impl ComponentSpec {
    /// Returns the component type, e.g. `state.redis`.
    #[must_use]
    pub const fn component_type(&self) -> &str {
        self.component_type.as_str()
    }

    /// Returns the component version, e.g. `v1`.
    #[must_use]
    pub const fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Returns the metadata entries in document order.
    #[must_use]
    pub fn metadata(&self) -> &[MetadataItem] {
        &self.metadata
    }
}

/// One `{name, value}` entry from `spec.metadata`.
///
/// Scalar values of any YAML type are accepted and kept in their textual
/// form, so `value: 10` and `value: "10"` resolve identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataItem {
    name: String,
    #[serde(default, deserialize_with = "scalar_as_string")]
    value: String,
}

impl MetadataItem {
    /// Creates an entry.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the property name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the property value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.value.as_str()
    }
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarVisitor;

    impl Visitor<'_> for ScalarVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a scalar metadata value")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value.to_owned())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(value)
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}

impl ComponentDescriptor {
    /// Creates a descriptor with no metadata entries.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        component_type: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: DescriptorMetadata { name: name.into() },
            spec: ComponentSpec {
                component_type: component_type.into(),
                version: version.into(),
                metadata: Vec::new(),
            },
        }
    }

    /// Appends a metadata entry.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.metadata.push(MetadataItem::new(name, value));
        self
    }

    /// Returns the `apiVersion` field.
    #[must_use]
    pub const fn api_version(&self) -> &str {
        self.api_version.as_str()
    }

    /// Returns the `kind` field.
    #[must_use]
    pub const fn kind(&self) -> &str {
        self.kind.as_str()
    }

    /// Returns the component name from `metadata.name`.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.metadata.name()
    }

    /// Returns the component type from `spec.type`.
    #[must_use]
    pub const fn component_type(&self) -> &str {
        self.spec.component_type()
    }

    /// Returns the `spec` block.
    #[must_use]
    pub const fn spec(&self) -> &ComponentSpec {
        &self.spec
    }

    /// Checks the fields a run depends on.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when the kind is not `Component`,
    /// the type is blank, or a metadata entry has a blank name.
    pub fn validate(&self) -> Result<(), String> {
        if self.kind != COMPONENT_KIND {
            return Err(format!(
                "kind must be '{COMPONENT_KIND}', got '{}'",
                self.kind
            ));
        }
        if self.spec.component_type.trim().is_empty() {
            return Err(String::from("spec.type must not be empty"));
        }
        if let Some(position) = self
            .spec
            .metadata
            .iter()
            .position(|item| item.name.trim().is_empty())
        {
            return Err(format!("spec.metadata[{position}] has an empty name"));
        }
        Ok(())
    }

    /// Renders the descriptor as a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Render`] when the serialiser rejects the
    /// document.
    pub fn to_yaml(&self) -> Result<String, DescriptorError> {
        serde_saphyr::to_string(self).map_err(|error| DescriptorError::Render {
            name: self.metadata.name.clone(),
            message: error.to_string(),
        })
    }
}

#[cfg(test)]
mod tests;
