//! Configuration validation
//!
//! Structural checks that can be made on the file alone. Unknown dependencies and
//! cycles are reported by the planner when a run is requested.

use crate::config::types::{Config, Task};
use crate::error::{ConfigError, ConfigResult};

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if let Some(interpreter) = &config.interpreter {
        if interpreter.first().map_or(true, |program| program.is_empty()) {
            return Err(ConfigError::EmptyInterpreter);
        }
    }

    for (name, task) in &config.tasks {
        validate_task(name, task)?;
    }

    if let Some(default) = &config.default {
        if config.task(default).is_none() {
            return Err(ConfigError::UnknownDefault(default.clone()));
        }
    }

    Ok(())
}

/// Validate a single task
pub fn validate_task(name: &str, task: &Task) -> ConfigResult<()> {
    if name.is_empty() {
        return Err(ConfigError::EmptyTaskName);
    }

    if task.deps.iter().any(String::is_empty) {
        return Err(ConfigError::EmptyDependency(name.to_string()));
    }

    for when in &task.when {
        let count = when.condition_count();
        if count != 1 {
            return Err(ConfigError::InvalidWhen {
                task: name.to_string(),
                count,
            });
        }
    }

    Ok(())
}
