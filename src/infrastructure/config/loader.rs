//! Hierarchical configuration loading.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Capability listed twice in sequential_order: {0}")]
    DuplicateSequentialCapability(String),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the default locations.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `grantflow.yaml` in the working directory
    /// 3. Environment variables (`GRANTFLOW_*` prefix)
    ///
    /// # Errors
    /// Returns an error if a source cannot be parsed or validation fails.
    pub fn load() -> Result<Config> {
        Self::load_from(Path::new("grantflow.yaml"))
    }

    /// Load configuration with an explicit file path.
    ///
    /// A missing file is not an error; defaults and environment variables
    /// still apply.
    ///
    /// # Errors
    /// Returns an error if a source cannot be parsed or validation fails.
    pub fn load_from(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("GRANTFLOW_").split("__"))
            .extract()
            .context("Failed to load configuration")?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &Config) -> Result<(), ConfigError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let mut seen = HashSet::new();
        for capability in &config.negotiation.sequential_order {
            if !seen.insert(capability) {
                return Err(ConfigError::DuplicateSequentialCapability(
                    capability.to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::domain::models::{Capability, LogFormat};

    #[test]
    fn defaults_apply_without_a_file() {
        let config = ConfigLoader::load_from(Path::new("does-not-exist.yaml")).unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(!config.negotiation.sequential_order.is_empty());
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "logging:\n  level: debug\n  format: json\nnegotiation:\n  sequential_order:\n    - coarse-location\n    - fine-location"
        )
        .unwrap();

        let config = ConfigLoader::load_from(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.negotiation.sequential_order,
            vec![Capability::coarse_location(), Capability::fine_location()]
        );
    }

    #[test]
    fn environment_overrides_file() {
        temp_env::with_var("GRANTFLOW_LOGGING__LEVEL", Some("warn"), || {
            let config = ConfigLoader::load_from(Path::new("does-not-exist.yaml")).unwrap();
            assert_eq!(config.logging.level, "warn");
        });
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        temp_env::with_var("GRANTFLOW_LOGGING__LEVEL", Some("loud"), || {
            let result = ConfigLoader::load_from(Path::new("does-not-exist.yaml"));
            assert!(result.is_err());
        });
    }

    #[test]
    fn duplicate_sequential_capability_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "negotiation:\n  sequential_order:\n    - fine-location\n    - fine-location"
        )
        .unwrap();

        let result = ConfigLoader::load_from(file.path());
        assert!(result.is_err());
    }
}
