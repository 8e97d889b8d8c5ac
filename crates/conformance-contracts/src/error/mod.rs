//! Errors raised by drivers through the capability contracts.
//!
//! Driver errors are values the harness stores in its reports, so the enum is
//! `Clone`; I/O errors are wrapped in `Arc` to allow that.

use std::sync::Arc;

use thiserror::Error;

/// Errors a driver returns from a fallible contract call.
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    /// An operation was attempted before `init` succeeded.
    #[error("driver '{driver}' is not initialised")]
    NotInitialised {
        /// Driver name.
        driver: String,
    },

    /// The driver was used after `close`.
    #[error("driver '{driver}' is closed")]
    Closed {
        /// Driver name.
        driver: String,
    },

    /// A property the driver requires was absent from the property map.
    #[error("missing required property '{name}'")]
    MissingProperty {
        /// Property name.
        name: String,
    },

    /// A property was present but could not be interpreted.
    #[error("invalid value for property '{name}': {message}")]
    InvalidProperty {
        /// Property name.
        name: String,
        /// Description of the problem.
        message: String,
    },

    /// The backend rejected or failed an operation.
    #[error("{operation} failed: {message}")]
    Operation {
        /// Contract operation, e.g. `set` or `publish`.
        operation: String,
        /// Backend-specific failure description.
        message: String,
    },

    /// The requested secret does not exist.
    #[error("secret '{name}' not found")]
    SecretNotFound {
        /// Secret name.
        name: String,
    },

    /// A subscriber's message handler rejected a delivered message.
    #[error("handler for topic '{topic}' rejected message: {message}")]
    Handler {
        /// Topic the message was delivered on.
        topic: String,
        /// Handler failure description.
        message: String,
    },

    /// An I/O error occurred inside the driver.
    #[error("I/O error while {context}: {source}")]
    Io {
        /// What the driver was doing.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl DriverError {
    /// Builds an [`DriverError::Operation`] error.
    #[must_use]
    pub fn operation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Operation {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Builds an [`DriverError::Io`] error.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source: Arc::new(source),
        }
    }
}
