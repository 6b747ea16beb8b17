//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{ApplicationConfig, AuditConfig, EngineConfig};

/// Loads and provides access to the engine configuration.
///
/// # Example
///
/// ```no_run
/// use leave_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/engine.yaml").unwrap();
/// println!("Audit level: {:?}", loader.audit().level);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file cannot be read (`ConfigNotFound`)
    /// - The file is not valid YAML for [`EngineConfig`] (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config = Self::load_yaml::<EngineConfig>(path.as_ref())?;
        Ok(Self { config })
    }

    /// Parses configuration from YAML text.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::config::{AuditLevel, ConfigLoader};
    ///
    /// let loader = ConfigLoader::from_yaml_str("audit:\n  level: debug\n")?;
    /// assert_eq!(loader.audit().level, AuditLevel::Debug);
    /// # Ok::<(), leave_engine::error::EngineError>(())
    /// ```
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        let config = serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the application section.
    pub fn application(&self) -> &ApplicationConfig {
        &self.config.application
    }

    /// Returns the audit section.
    pub fn audit(&self) -> &AuditConfig {
        &self.config.audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditLevel;

    fn config_path() -> &'static str {
        "./config/engine.yaml"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.application().name, "scheduler");
        assert_eq!(loader.application().default_site, "General");
        assert_eq!(loader.audit().level, AuditLevel::Minimal);
    }

    #[test]
    fn test_load_missing_file_returns_config_not_found() {
        let result = ConfigLoader::load("./config/missing.yaml");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("missing.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_from_yaml_str_rejects_unknown_level() {
        let result = ConfigLoader::from_yaml_str("audit:\n  level: verbose\n");
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_empty_sections_use_defaults() {
        let loader = ConfigLoader::from_yaml_str("application:\n  name: leave\n").unwrap();
        assert_eq!(loader.application().name, "leave");
        assert_eq!(loader.application().default_site, "General");
        assert_eq!(loader.audit().level, AuditLevel::Minimal);
    }
}
