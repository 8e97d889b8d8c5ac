//! Serde adapters storing durations as whole milliseconds.
//!
//! Test authors write budgets as `max_set_ms: 20`; the structs hold
//! [`Duration`] values.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

fn to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Adapter for required durations.
pub mod millis {
    use super::{Deserialize, Deserializer, Duration, Serializer, to_millis};

    /// Serialises a duration as milliseconds.
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(to_millis(*duration))
    }

    /// Deserialises milliseconds into a duration.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Adapter for optional durations.
pub mod option_millis {
    use super::{Deserialize, Deserializer, Duration, Serializer, to_millis};

    /// Serialises an optional duration as milliseconds.
    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match duration {
            Some(value) => serializer.serialize_some(&to_millis(*value)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialises optional milliseconds into a duration.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|value| value.map(Duration::from_millis))
    }
}
