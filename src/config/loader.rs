//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_ENV_VAR: &str = "HTTP_SERVER_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Resolve the startup configuration.
///
/// Defaults, then the file named by [`CONFIG_ENV_VAR`] if set, then the
/// `--directory` flag when one was given.
pub fn resolve_config(directory: Option<String>) -> Result<ServerConfig, ConfigError> {
    let mut config = match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => load_config(Path::new(&path))?,
        None => ServerConfig::default(),
    };

    if let Some(directory) = directory {
        config.files.directory = directory;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
