//! Configuration loader implementation

use crate::schema::Config;
use crate::validation::ConfigValidator;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use std::path::Path;
use types::ConfigError;

/// Configuration loader that handles YAML files and environment variables
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Config> {
        let config_path = config_path.as_ref();

        if !config_path.exists() {
            return Err(ConfigError::FileNotFound {
                path: config_path.display().to_string(),
            }
            .into());
        }

        let config: Config = Figment::new()
            .merge(Yaml::file(config_path))
            // e.g. WEAVE_TRANSACTOR_NODE__URL overrides node.url
            .merge(Env::prefixed("WEAVE_TRANSACTOR_").split("__"))
            .extract()
            .context("Failed to parse configuration")?;

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn load_from_env() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Env::prefixed("WEAVE_TRANSACTOR_").split("__"))
            .extract()
            .context("Failed to parse configuration from environment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from string (for testing)
    pub fn load_from_str(yaml_content: &str) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Yaml::string(yaml_content))
            .extract()
            .context("Failed to parse configuration from string")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Reject configurations with validation errors, log warnings
    fn validate(config: &Config) -> Result<()> {
        let report = ConfigValidator::validate(config);

        for warning in &report.warnings {
            tracing::warn!(field = %warning.field, "{}", warning.message);
        }

        if let Some(issue) = report.errors.first() {
            return Err(ConfigError::ValidationError {
                field: issue.field.clone(),
                message: issue.message.clone(),
            }
            .into());
        }

        Ok(())
    }

    /// Get default configuration
    pub fn default() -> Config {
        Config::default()
    }

    /// Create example configuration file
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let yaml_content = serde_yaml::to_string(&config)
            .context("Failed to serialize default configuration")?;

        std::fs::write(path.as_ref(), yaml_content)
            .context("Failed to write example configuration file")?;

        Ok(())
    }
}
