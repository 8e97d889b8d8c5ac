//! Errors raised while loading a test matrix.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising from test matrix loading and validation.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The matrix file could not be read.
    #[error("failed to read test matrix '{path}': {source}")]
    Io {
        /// Path being read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The matrix file was not valid YAML or did not match the schema.
    #[error("failed to parse test matrix '{origin}': {message}")]
    Parse {
        /// Label of the document being parsed.
        origin: String,
        /// Parser message.
        message: String,
    },

    /// The matrix parsed but holds contradictory or unusable values.
    #[error("invalid test matrix: {message}")]
    Invalid {
        /// Description of the problem.
        message: String,
    },
}

/// Errors raised while resolving environment credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// One or more required variables are unset or empty.
    #[error("missing required environment variables: {}", .names.join(", "))]
    Missing {
        /// Names of the missing variables, in request order.
        names: Vec<String>,
    },
}
