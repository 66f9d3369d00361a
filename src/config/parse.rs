//! Configuration file parsing and discovery

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, Result};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["utask.yml", "utask.yaml"];

/// Find the configuration file by searching current and parent directories,
/// then the user configuration directory
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => break,
        }
    }

    // Fall back to the user-level configuration directory
    if let Some(dirs) = ProjectDirs::from("", "", "utask") {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = dirs.config_dir().join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }
    }

    Err(ConfigError::NotFound(searched_paths.join(", ")))
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_config(&contents)
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}
