//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// The configuration file name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "vdoc.toml";

/// Loads and validates a `vdoc.toml` configuration from a project directory.
///
/// Reads `<project_dir>/vdoc.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(config_path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `vdoc.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.trim().is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.sources.dirs.is_empty() {
        return Err(ConfigError::ValidationError(
            "sources.dirs must list at least one directory".to_string(),
        ));
    }
    if let Some(dir) = config.sources.dirs.iter().find(|d| d.trim().is_empty()) {
        return Err(ConfigError::ValidationError(format!(
            "sources.dirs contains an empty entry: {dir:?}"
        )));
    }
    Ok(())
}
