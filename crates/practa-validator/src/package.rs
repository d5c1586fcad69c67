//! Package contents under validation

use crate::error::PackageError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Component source file name
pub const ENTRY_FILE: &str = "index.tsx";

/// Descriptor file name
pub const METADATA_FILE: &str = "metadata.json";

/// Entry source text plus the raw descriptor
///
/// The descriptor is kept as text so malformed JSON becomes a validation
/// result instead of a load failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSource {
    entry: String,
    metadata: Option<String>,
}

impl PackageSource {
    /// Package with only entry source
    #[inline]
    #[must_use]
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            metadata: None,
        }
    }

    /// With descriptor text
    #[inline]
    #[must_use]
    pub fn with_metadata_json(mut self, raw: impl Into<String>) -> Self {
        self.metadata = Some(raw.into());
        self
    }

    /// Read `index.tsx` and, if present, `metadata.json` from a directory
    ///
    /// # Errors
    ///
    /// [`PackageError::MissingEntry`] without an entry file,
    /// [`PackageError::Io`] on any other read failure.
    pub fn load_dir(dir: &Path) -> Result<Self, PackageError> {
        let entry_path = dir.join(ENTRY_FILE);
        let entry = match fs::read_to_string(&entry_path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PackageError::MissingEntry { path: entry_path })
            }
            Err(source) => {
                return Err(PackageError::Io {
                    path: entry_path,
                    source,
                })
            }
        };

        let metadata_path = dir.join(METADATA_FILE);
        let metadata = match fs::read_to_string(&metadata_path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(source) => {
                return Err(PackageError::Io {
                    path: metadata_path,
                    source,
                })
            }
        };

        tracing::debug!(dir = %dir.display(), has_metadata = metadata.is_some(), "package loaded");
        Ok(Self { entry, metadata })
    }

    /// Entry source text
    #[inline]
    #[must_use]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Raw descriptor text
    #[inline]
    #[must_use]
    pub fn metadata_json(&self) -> Option<&str> {
        self.metadata.as_deref()
    }
}
