//! Configuration validation

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    let mut task_ids = HashSet::new();
    for (position, task) in config.tasks.iter().enumerate() {
        if task.title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle(position));
        }
        if let Some(id) = &task.id {
            if !task_ids.insert(id.as_str()) {
                return Err(ConfigError::DuplicateTaskId(id.clone()));
            }
        }
    }

    let mut auto_ids = HashSet::new();
    for auto in &config.auto_tasks {
        if !auto_ids.insert(auto.id.as_str()) {
            return Err(ConfigError::DuplicateAutoTaskId(auto.id.clone()));
        }
    }

    Ok(())
}
