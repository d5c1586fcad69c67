//! Error types for package loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading a package from disk
#[derive(Debug, Error)]
pub enum PackageError {
    /// Entry file absent
    #[error("package entry not found: {path}")]
    MissingEntry {
        /// Expected location
        path: PathBuf,
    },

    /// Read failure
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}
