//! Error types for Tasklane

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Tasklane operations
pub type Result<T> = std::result::Result<T, TasklaneError>;

/// Main error type for Tasklane
#[derive(Error, Debug)]
pub enum TasklaneError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task registration errors
    #[error("Definition error: {0}")]
    Define(#[from] DefineError),

    /// Dependency graph errors
    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Task names must not be empty")]
    EmptyTaskName,

    #[error("Task '{0}' declares an empty dependency name")]
    EmptyDependency(String),

    #[error("Default task '{0}' is not defined")]
    UnknownDefault(String),

    #[error("Interpreter must name at least one program")]
    EmptyInterpreter,

    #[error("Task '{task}' has a when entry with {count} conditions (expected exactly one)")]
    InvalidWhen { task: String, count: usize },

    #[error("Invalid variable assignment '{0}' (expected KEY=VALUE)")]
    InvalidAssignment(String),

    #[error("Failed to load dotenv file '{path}': {error}")]
    Dotenv { path: PathBuf, error: String },
}

/// Errors raised synchronously by `Registry::define`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefineError {
    #[error("Task '{0}' is already defined")]
    Duplicate(String),

    #[error("Task names must not be empty")]
    EmptyName,

    #[error("Task '{0}' declares an empty dependency name")]
    EmptyDependency(String),
}

/// Structural errors in the dependency graph, reported before any task runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Task '{0}' is not defined")]
    UnknownTask(String),

    #[error("Task '{task}' depends on undefined task '{dep}'")]
    UnknownDep { task: String, dep: String },

    #[error("Circular dependency detected: {0}")]
    Cycle(String),
}

impl PlanError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::UnknownTask(_) => "unknown_task",
            PlanError::UnknownDep { .. } => "unknown_dep",
            PlanError::Cycle(_) => "cycle",
        }
    }
}

/// Shell command execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command failed with exit code {0:?}")]
    CommandFailed(Option<i32>),

    #[error("Failed to launch '{program}': {error}")]
    Spawn { program: String, error: String },

    #[error("Command output is not valid UTF-8")]
    InvalidOutput,

    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Variable '{0}' is not defined")]
    UndefinedVariable(String),

    #[error("Recursive interpolation detected")]
    RecursiveInterpolation,
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_error_codes() {
        assert_eq!(PlanError::UnknownTask("a".into()).code(), "unknown_task");
        assert_eq!(
            PlanError::UnknownDep {
                task: "a".into(),
                dep: "b".into()
            }
            .code(),
            "unknown_dep"
        );
        assert_eq!(PlanError::Cycle("a -> b -> a".into()).code(), "cycle");
    }

    #[test]
    fn test_unknown_dep_message_names_both_tasks() {
        let err = PlanError::UnknownDep {
            task: "build".into(),
            dep: "fetch".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("build"));
        assert!(msg.contains("fetch"));
    }
}
