//! Bootstrap configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::schema::BootstrapConfig;
use crate::config::validation::validate_config;

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> ConfigResult<BootstrapConfig> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: BootstrapConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the file when given, otherwise fall back to validated defaults.
pub fn load_or_default(path: Option<&Path>) -> ConfigResult<BootstrapConfig> {
    match path {
        Some(path) => {
            let config = load_config(path)?;
            tracing::info!(path = %path.display(), "Bootstrap configuration loaded");
            Ok(config)
        }
        None => Ok(BootstrapConfig::default()),
    }
}
