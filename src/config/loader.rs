//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::config::validation::{describe, validate_config, ValidationError};

/// Environment variable that force-enables the loopback development
/// identity. The loopback host check in the resolver still applies.
pub const DEV_IDENTITY_ENV: &str = "VOCALIS_DEV_IDENTITY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", describe(.0))]
    Validation(Vec<ValidationError>),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ClientConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply process-environment overrides to a parsed configuration.
///
/// `VOCALIS_DEV_IDENTITY=1|true|yes` switches the development identity on;
/// any other value switches it off, overriding the file either way.
pub fn apply_env_overrides(config: &mut ClientConfig) {
    if let Ok(value) = std::env::var(DEV_IDENTITY_ENV) {
        config.identity.dev_identity = matches!(value.as_str(), "1" | "true" | "yes");
    }
}
