//! Repository configuration loaded from a TOML file or environment variables.

use serde::Deserialize;
use std::env;
use std::path::Path;

use super::error::{RepositoryError, RepositoryResult};

/// Which repository backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-memory backend for tests and local development.
    #[default]
    Local,
}

/// Repository configuration.
///
/// Resolution order: explicit TOML file (`ATO_CONFIG`), then environment
/// variables, then defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryConfig {
    /// Backend selection, defaults to the in-memory backend.
    #[serde(default)]
    pub backend: BackendKind,
}

impl RepositoryConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns a configuration error when the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&raw).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load configuration from environment variables.
    ///
    /// - `ATO_REPOSITORY` (optional): `local` (default)
    pub fn from_env() -> RepositoryResult<Self> {
        let backend = match env::var("ATO_REPOSITORY").as_deref() {
            Ok("local") | Err(_) => BackendKind::Local,
            Ok(other) => {
                return Err(RepositoryError::configuration(format!(
                    "Unsupported ATO_REPOSITORY '{}'. Use 'local'.",
                    other
                )))
            }
        };
        Ok(Self { backend })
    }

    /// Resolve configuration: `ATO_CONFIG` file if set, otherwise env vars.
    pub fn load() -> RepositoryResult<Self> {
        match env::var("ATO_CONFIG") {
            Ok(path) => Self::from_toml_file(path),
            Err(_) => Self::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_config() {
        let config: RepositoryConfig = toml::from_str("backend = \"local\"").unwrap();
        assert_eq!(config.backend, BackendKind::Local);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: RepositoryConfig = toml::from_str("").unwrap();
        assert_eq!(config.backend, BackendKind::Local);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = RepositoryConfig::from_toml_file("/nonexistent/ato.toml").unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }
}
