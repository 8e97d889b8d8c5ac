//! Descriptor loading from the filesystem.
//!
//! A config path is either a directory, in which case every `.yaml`/`.yml`
//! file inside it (non-recursively, in file-name order) holds one
//! descriptor, or a path to a single descriptor file.

use std::fs;
use std::path::{Path, PathBuf};

use conformance_contracts::PropertyMap;
use tracing::debug;

use crate::error::DescriptorError;
use crate::model::ComponentDescriptor;

/// A loaded descriptor reduced to what a conformance run consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedComponent {
    name: String,
    component_type: String,
    properties: PropertyMap,
}

impl ResolvedComponent {
    /// Returns the component name from `metadata.name`.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the component type from `spec.type`.
    #[must_use]
    pub const fn component_type(&self) -> &str {
        self.component_type.as_str()
    }

    /// Returns the resolved properties.
    #[must_use]
    pub const fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Consumes the component, returning its properties.
    #[must_use]
    pub fn into_properties(self) -> PropertyMap {
        self.properties
    }
}

impl From<&ComponentDescriptor> for ResolvedComponent {
    fn from(descriptor: &ComponentDescriptor) -> Self {
        Self {
            name: descriptor.name().to_owned(),
            component_type: descriptor.component_type().to_owned(),
            properties: crate::resolve(descriptor),
        }
    }
}

/// Parses and validates one descriptor document.
///
/// `origin` only labels errors.
///
/// # Errors
///
/// Returns [`DescriptorError::Parse`] for malformed YAML and
/// [`DescriptorError::Invalid`] when validation fails.
pub fn parse_descriptor(
    origin: impl AsRef<Path>,
    text: &str,
) -> Result<ComponentDescriptor, DescriptorError> {
    let source_path = origin.as_ref();
    let descriptor: ComponentDescriptor =
        serde_saphyr::from_str(text).map_err(|error| DescriptorError::Parse {
            path: source_path.to_path_buf(),
            message: error.to_string(),
        })?;
    descriptor
        .validate()
        .map_err(|message| DescriptorError::Invalid {
            path: source_path.to_path_buf(),
            message,
        })?;
    Ok(descriptor)
}

/// Loads every descriptor under a config path.
///
/// # Errors
///
/// Returns [`DescriptorError::Io`] when the path cannot be read, or a parse
/// or validation error for the first bad file.
pub fn load_components(path: &Path) -> Result<Vec<ComponentDescriptor>, DescriptorError> {
    let files = descriptor_files(path)?;
    debug!(
        target: "conformance::descriptor",
        path = %path.display(),
        files = files.len(),
        "loading component descriptors"
    );
    files
        .iter()
        .map(|file| {
            let text = fs::read_to_string(file).map_err(|source| DescriptorError::io(file, source))?;
            parse_descriptor(file, &text)
        })
        .collect()
}

/// Loads the single descriptor a config path must hold.
///
/// # Errors
///
/// Returns [`DescriptorError::UnexpectedCount`] when zero or several
/// descriptors are found, plus any error from [`load_components`].
pub fn load_single(path: &Path) -> Result<ComponentDescriptor, DescriptorError> {
    let mut components = load_components(path)?;
    if components.len() != 1 {
        return Err(DescriptorError::UnexpectedCount {
            path: path.to_path_buf(),
            found: components.len(),
        });
    }
    components
        .pop()
        .ok_or_else(|| DescriptorError::UnexpectedCount {
            path: path.to_path_buf(),
            found: 0,
        })
}

/// Loads the single descriptor under `path` and resolves its properties.
///
/// # Errors
///
/// Propagates any error from [`load_single`].
pub fn load_component_descriptor(path: &Path) -> Result<ResolvedComponent, DescriptorError> {
    load_single(path).map(|descriptor| ResolvedComponent::from(&descriptor))
}

fn descriptor_files(path: &Path) -> Result<Vec<PathBuf>, DescriptorError> {
    let metadata = fs::metadata(path).map_err(|source| DescriptorError::io(path, source))?;
    if metadata.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path).map_err(|source| DescriptorError::io(path, source))?;
    let mut files = Vec::new();
    for entry in entries {
        let candidate = entry
            .map_err(|source| DescriptorError::io(path, source))?
            .path();
        if candidate.is_file() && is_yaml(&candidate) {
            files.push(candidate);
        }
    }
    files.sort();
    Ok(files)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

#[cfg(test)]
mod tests;
