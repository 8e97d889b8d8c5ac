//! Errors raised while loading component descriptors.
//!
//! Every variant is a setup failure: a run that cannot load its descriptor
//! never starts executing phases.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising from descriptor loading and validation.
#[derive(Debug, Clone, Error)]
pub enum DescriptorError {
    /// The config path could not be read.
    #[error("failed to read descriptor path '{}': {source}", .path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A descriptor file was not valid YAML or did not match the schema.
    #[error("failed to parse descriptor '{}': {message}", .path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The descriptor parsed but is semantically invalid.
    #[error("invalid descriptor '{}': {message}", .path.display())]
    Invalid {
        /// File holding the descriptor.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// The config path held a number of descriptors other than one.
    #[error("expected exactly one descriptor under '{}', found {found}", .path.display())]
    UnexpectedCount {
        /// Config path that was loaded.
        path: PathBuf,
        /// Number of descriptors found.
        found: usize,
    },

    /// A descriptor could not be rendered as YAML.
    #[error("failed to render descriptor '{name}': {message}")]
    Render {
        /// Component name from `metadata.name`.
        name: String,
        /// Serialiser message.
        message: String,
    },
}

impl DescriptorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }
}

#[cfg(test)]
mod tests;
