//! Execution context for shell tasks
//!
//! The context is the shared state handed to every task of a run: variables,
//! working directory, interpreter and verbosity. Tasks may add variables that
//! later tasks in the same run read.

use crate::config::Config;
use crate::error::{ConfigError, ConfigResult};
use crate::shell::interpolate;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Execution context that tracks state during a run
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory commands run in
    pub working_dir: PathBuf,

    /// Configuration file path
    pub config_path: Option<PathBuf>,

    /// Variables (from config, dotenv, --set and captured output)
    pub vars: HashMap<String, String>,

    /// Interpreter prefix (e.g., ["bash", "-c"])
    pub interpreter: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_path: None,
            vars: HashMap::new(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            verbosity: Verbosity::Normal,
        }
    }

    /// Build the context for a parsed config file.
    ///
    /// Commands run next to the config file. Dotenv entries are loaded first,
    /// then `vars` in file order, each interpolated against what came before.
    pub fn from_config(config: &Config, config_path: &Path) -> ConfigResult<Self> {
        let mut ctx = Context::new().with_config_path(config_path.to_path_buf());
        ctx.working_dir = ctx.config_dir();

        if let Some(interpreter) = &config.interpreter {
            ctx.interpreter = interpreter.clone();
        }

        if let Some(dotenv) = &config.dotenv {
            let path = ctx.config_dir().join(dotenv);
            ctx.load_dotenv(&path)?;
        }

        for (key, value) in &config.vars {
            let value = interpolate(value, &ctx.vars)
                .map_err(|e| ConfigError::Invalid(format!("variable '{}': {}", key, e)))?;
            ctx.set_var(key.clone(), value);
        }

        Ok(ctx)
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the configuration file path
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Set variables
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set a single variable
    pub fn set_var(&mut self, key: String, value: String) {
        self.vars.insert(key, value);
    }

    /// Get a variable value
    pub fn get_var(&self, key: &str) -> Option<&String> {
        self.vars.get(key)
    }

    /// Apply `KEY=VALUE` assignments, overriding existing variables
    pub fn apply_assignments<S: AsRef<str>>(&mut self, assignments: &[S]) -> ConfigResult<()> {
        for assignment in assignments {
            let (key, value) = parse_assignment(assignment.as_ref())?;
            self.set_var(key, value);
        }
        Ok(())
    }

    /// Load a dotenv file into the variables
    pub fn load_dotenv(&mut self, path: &Path) -> ConfigResult<()> {
        let dotenv_error = |error: String| ConfigError::Dotenv {
            path: path.to_path_buf(),
            error,
        };

        let entries = dotenvy::from_path_iter(path).map_err(|e| dotenv_error(e.to_string()))?;
        for entry in entries {
            let (key, value) = entry.map_err(|e| dotenv_error(e.to_string()))?;
            self.set_var(key, value);
        }
        Ok(())
    }

    /// Get the directory for the config file (or current dir)
    pub fn config_dir(&self) -> PathBuf {
        self.config_path
            .as_ref()
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| self.working_dir.clone())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a `KEY=VALUE` assignment
pub fn parse_assignment(s: &str) -> ConfigResult<(String, String)> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidAssignment(s.to_string())),
    }
}
