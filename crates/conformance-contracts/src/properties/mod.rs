//! Flat property maps used to initialise drivers.
//!
//! A [`PropertyMap`] is what a driver's `init` receives: every
//! `spec.metadata` entry from the component descriptor, keyed by name.

use std::collections::HashMap;
use std::collections::hash_map;
use std::hash::BuildHasher;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DriverError;

/// Mapping from property name to string value.
///
/// Insertion order is irrelevant; inserting a name twice keeps the last
/// value.
///
/// # Example
///
/// ```
/// use conformance_contracts::PropertyMap;
///
/// let props: PropertyMap = [("redisHost", "localhost:6379"), ("redeliver", "2")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(props.get("redisHost"), Some("localhost:6379"));
/// assert_eq!(props.parse::<u32>("redeliver").unwrap(), Some(2));
/// assert!(props.require("redisPassword").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap {
    entries: HashMap<String, String>,
}

impl PropertyMap {
    /// Creates an empty property map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a property, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    /// Looks up a property value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Looks up a property that the driver cannot work without.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::MissingProperty`] when the property is absent.
    pub fn require(&self, name: &str) -> Result<&str, DriverError> {
        self.get(name).ok_or_else(|| DriverError::MissingProperty {
            name: name.to_owned(),
        })
    }

    /// Parses an optional property into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidProperty`] when the property is present
    /// but does not parse.
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>, DriverError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(name)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|error| DriverError::InvalidProperty {
                        name: name.to_owned(),
                        message: error.to_string(),
                    })
            })
            .transpose()
    }

    /// Returns `true` when the property is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no properties are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Consumes the map, returning the underlying entries.
    #[must_use]
    pub fn into_inner(self) -> HashMap<String, String> {
        self.entries
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for PropertyMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.entries.insert(name.into(), value.into());
        }
    }
}

impl IntoIterator for PropertyMap {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<S: BuildHasher> From<HashMap<String, String, S>> for PropertyMap {
    fn from(entries: HashMap<String, String, S>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}
