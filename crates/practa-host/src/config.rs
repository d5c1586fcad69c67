//! Layered host configuration
//!
//! ```toml
//! [storage]
//! max_value_bytes = 10000
//! max_namespace_bytes = 100000
//!
//! [engine]
//! event_capacity = 64
//!
//! [runner]
//! skip_policy = "skip_step"
//!
//! [validator]
//! min_id_len = 3
//! max_id_len = 50
//! ```
//!
//! Every table is optional.

use crate::runner::RunnerConfig;
use practa_flow::EngineConfig;
use practa_storage::StorageLimits;
use practa_validator::ValidatorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "PRACTA_CONFIG";

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this shape
    #[error("invalid config: {source}")]
    Parse {
        /// Config path, if read from disk
        path: Option<PathBuf>,
        /// Parser error
        #[source]
        source: toml::de::Error,
    },
}

/// Full host configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Storage quotas
    pub storage: StorageLimits,
    /// Engine settings
    pub engine: EngineConfig,
    /// Runner settings
    pub runner: RunnerConfig,
    /// Validator settings
    pub validator: ValidatorConfig,
}

impl HostConfig {
    /// Parse TOML text
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed input or unknown tables.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse { path: None, source })
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    ///
    /// # Errors
    ///
    /// As [`load`](Self::load).
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::SkipPolicy;

    #[test]
    fn empty_text_is_default() {
        let config = HostConfig::from_toml_str("").unwrap();
        assert_eq!(config.storage.max_value_bytes, 10_000);
        assert_eq!(config.storage.max_namespace_bytes, 100_000);
        assert_eq!(config.engine.event_capacity, 64);
        assert_eq!(config.runner.skip_policy, SkipPolicy::SkipStep);
        assert_eq!(config.validator.min_id_len, 3);
        assert_eq!(config.validator.max_id_len, 50);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = HostConfig::from_toml_str(
            r#"
            [storage]
            max_namespace_bytes = 2048

            [runner]
            skip_policy = "abort_flow"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.max_namespace_bytes, 2048);
        assert_eq!(config.storage.max_value_bytes, 10_000);
        assert_eq!(config.runner.skip_policy, SkipPolicy::AbortFlow);
        assert_eq!(config.engine.event_capacity, 64);
    }

    #[test]
    fn unknown_table_rejected() {
        let err = HostConfig::from_toml_str("[telemetry]\nenabled = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("practa.toml");
        std::fs::write(&path, "[engine]\nevent_capacity = 8\n").unwrap();

        let config = HostConfig::load(&path).unwrap();
        assert_eq!(config.engine.event_capacity, 8);

        let missing = HostConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
        assert!(HostConfig::load_or_default(None).is_ok());
    }
}
