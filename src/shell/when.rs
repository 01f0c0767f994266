//! When condition evaluation
//!
//! Turns the `when` entries of a task into a single predicate over the context.

use crate::config;
use crate::error::{ConfigError, ConfigResult, ExecutionResult};
use crate::shell::{check_command, interpolate, interpolate_strict, Context};
use std::env;

/// Types of when conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhenCondition {
    Equal { left: String, right: String },
    NotEqual { left: String, right: String },
    Command(String),
    Exists(String),
    EnvSet(String),
    EnvNotSet(String),
    VarSet(String),
    VarNotSet(String),
}

impl WhenCondition {
    /// Convert a config entry; exactly one kind must be set
    pub fn from_config(task: &str, config: &config::When) -> ConfigResult<Self> {
        let count = config.condition_count();
        if count != 1 {
            return Err(ConfigError::InvalidWhen {
                task: task.to_string(),
                count,
            });
        }

        let config = config.clone();
        let condition = if let Some(eq) = config.equal {
            WhenCondition::Equal {
                left: eq.left,
                right: eq.right,
            }
        } else if let Some(ne) = config.not_equal {
            WhenCondition::NotEqual {
                left: ne.left,
                right: ne.right,
            }
        } else if let Some(cmd) = config.command {
            WhenCondition::Command(cmd)
        } else if let Some(path) = config.exists {
            WhenCondition::Exists(path)
        } else if let Some(var) = config.env_set {
            WhenCondition::EnvSet(var)
        } else if let Some(var) = config.env_not_set {
            WhenCondition::EnvNotSet(var)
        } else if let Some(var) = config.var_set {
            WhenCondition::VarSet(var)
        } else if let Some(var) = config.var_not_set {
            WhenCondition::VarNotSet(var)
        } else {
            return Err(ConfigError::InvalidWhen {
                task: task.to_string(),
                count: 0,
            });
        };

        Ok(condition)
    }
}

/// Evaluate a list of when conditions (all must be true - AND logic)
pub fn evaluate_when_list(when_list: &[WhenCondition], ctx: &Context) -> ExecutionResult<bool> {
    for when in when_list {
        if !evaluate_when(when, ctx)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Evaluate a single when condition
pub fn evaluate_when(when: &WhenCondition, ctx: &Context) -> ExecutionResult<bool> {
    match when {
        WhenCondition::Equal { left, right } => {
            Ok(interpolate(left, &ctx.vars)? == interpolate(right, &ctx.vars)?)
        }

        WhenCondition::NotEqual { left, right } => {
            Ok(interpolate(left, &ctx.vars)? != interpolate(right, &ctx.vars)?)
        }

        WhenCondition::Command(cmd) => check_command(cmd, ctx),

        WhenCondition::Exists(path) => {
            let path_str = interpolate_strict(path, &ctx.vars)?;
            Ok(ctx.working_dir.join(path_str).exists())
        }

        WhenCondition::EnvSet(var_name) => {
            let var = interpolate(var_name, &ctx.vars)?;
            Ok(env::var_os(var).is_some())
        }

        WhenCondition::EnvNotSet(var_name) => {
            let var = interpolate(var_name, &ctx.vars)?;
            Ok(env::var_os(var).is_none())
        }

        WhenCondition::VarSet(name) => Ok(ctx.vars.contains_key(name)),

        WhenCondition::VarNotSet(name) => Ok(!ctx.vars.contains_key(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecutionError;
    use std::collections::HashMap;

    fn ctx_with(key: &str, value: &str) -> Context {
        let mut vars = HashMap::new();
        vars.insert(key.to_string(), value.to_string());
        Context::new().with_vars(vars)
    }

    #[test]
    fn test_from_config() {
        let when = config::When {
            env_set: Some("CI".to_string()),
            ..config::When::default()
        };
        assert_eq!(
            WhenCondition::from_config("t", &when).unwrap(),
            WhenCondition::EnvSet("CI".to_string())
        );

        let empty = config::When::default();
        assert!(WhenCondition::from_config("t", &empty).is_err());
    }

    #[test]
    fn test_evaluate_equal() {
        let ctx = ctx_with("env", "production");
        let when = WhenCondition::Equal {
            left: "${env}".to_string(),
            right: "production".to_string(),
        };
        assert!(evaluate_when(&when, &ctx).unwrap());

        let ctx = ctx_with("env", "development");
        assert!(!evaluate_when(&when, &ctx).unwrap());
    }

    #[test]
    fn test_evaluate_not_equal() {
        let ctx = ctx_with("env", "development");
        let when = WhenCondition::NotEqual {
            left: "${env}".to_string(),
            right: "production".to_string(),
        };
        assert!(evaluate_when(&when, &ctx).unwrap());
    }

    #[test]
    fn test_evaluate_command() {
        let ctx = Context::new();
        assert!(evaluate_when(&WhenCondition::Command("true".to_string()), &ctx).unwrap());
        assert!(!evaluate_when(&WhenCondition::Command("false".to_string()), &ctx).unwrap());
    }

    #[test]
    fn test_evaluate_exists() {
        use tempfile::TempDir;
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("test.txt"), "test").unwrap();

        let ctx = Context::new().with_working_dir(temp_dir.path().to_path_buf());
        assert!(evaluate_when(&WhenCondition::Exists("test.txt".to_string()), &ctx).unwrap());
        assert!(
            !evaluate_when(&WhenCondition::Exists("nonexistent.txt".to_string()), &ctx).unwrap()
        );
    }

    #[test]
    fn test_exists_with_undefined_variable_is_an_error() {
        let when = WhenCondition::Exists("${undefined_tasklane_path}/file".to_string());
        assert!(matches!(
            evaluate_when(&when, &Context::new()),
            Err(ExecutionError::Interpolation(_))
        ));
    }

    #[test]
    fn test_evaluate_env() {
        env::set_var("TEST_TASKLANE_WHEN_VAR", "value");
        env::remove_var("TEST_TASKLANE_WHEN_UNSET");

        let ctx = Context::new();
        assert!(evaluate_when(
            &WhenCondition::EnvSet("TEST_TASKLANE_WHEN_VAR".to_string()),
            &ctx
        )
        .unwrap());
        assert!(evaluate_when(
            &WhenCondition::EnvNotSet("TEST_TASKLANE_WHEN_UNSET".to_string()),
            &ctx
        )
        .unwrap());

        env::remove_var("TEST_TASKLANE_WHEN_VAR");
    }

    #[test]
    fn test_evaluate_var_set() {
        let ctx = ctx_with("myvar", "value");
        assert!(evaluate_when(&WhenCondition::VarSet("myvar".to_string()), &ctx).unwrap());
        assert!(!evaluate_when(&WhenCondition::VarNotSet("myvar".to_string()), &ctx).unwrap());
    }

    #[test]
    fn test_evaluate_when_list_one_false() {
        let ctx = ctx_with("env", "development");
        let when_list = vec![
            WhenCondition::Command("true".to_string()),
            WhenCondition::Equal {
                left: "${env}".to_string(),
                right: "production".to_string(),
            },
        ];
        assert!(!evaluate_when_list(&when_list, &ctx).unwrap());
    }

    #[test]
    fn test_broken_interpolation_is_an_error() {
        let ctx = ctx_with("loop", "${loop}");
        let when = WhenCondition::Equal {
            left: "${loop}".to_string(),
            right: "x".to_string(),
        };
        assert!(matches!(
            evaluate_when(&when, &ctx),
            Err(ExecutionError::Interpolation(_))
        ));
    }
}
