//! Command execution
//!
//! This module handles executing shell commands through the context's interpreter.

use crate::config;
use crate::error::{ExecutionError, ExecutionResult};
use crate::shell::{interpolate, interpolate_strict, Context, Verbosity};
use std::path::PathBuf;
use std::process::{Command as StdCommand, Stdio};

/// Runtime representation of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The command line handed to the interpreter
    pub exec: String,

    /// What to echo before running (defaults to exec)
    pub print: String,

    /// Suppress the echo
    pub quiet: bool,

    /// Directory relative to the context's working directory
    pub dir: Option<String>,
}

impl Command {
    pub fn new(exec: impl Into<String>) -> Self {
        let exec = exec.into();
        Command {
            print: exec.clone(),
            exec,
            quiet: false,
            dir: None,
        }
    }

    /// Create from config
    pub fn from_config(config: config::Command) -> Self {
        match config {
            config::Command::Simple(cmd) => Command::new(cmd),
            config::Command::Complex(detail) => Command {
                print: detail.print.unwrap_or_else(|| detail.exec.clone()),
                exec: detail.exec,
                quiet: detail.quiet,
                dir: detail.dir,
            },
        }
    }
}

/// Build the interpreter invocation for a command line
fn build(exec: &str, dir: PathBuf, ctx: &Context) -> ExecutionResult<StdCommand> {
    let (program, args) = ctx
        .interpreter
        .split_first()
        .ok_or_else(|| ExecutionError::Spawn {
            program: String::new(),
            error: "no interpreter configured".to_string(),
        })?;

    let mut command = StdCommand::new(program);
    command.args(args);
    command.arg(exec);
    command.current_dir(dir);
    command.stdin(Stdio::inherit());

    // Variables are visible to the command as environment variables
    for (key, value) in &ctx.vars {
        command.env(key, value);
    }

    Ok(command)
}

fn spawn_error(ctx: &Context, error: std::io::Error) -> ExecutionError {
    ExecutionError::Spawn {
        program: ctx.interpreter.first().cloned().unwrap_or_default(),
        error: error.to_string(),
    }
}

fn working_dir(cmd: &Command, ctx: &Context) -> ExecutionResult<PathBuf> {
    match &cmd.dir {
        Some(dir) => Ok(ctx.working_dir.join(interpolate_strict(dir, &ctx.vars)?)),
        None => Ok(ctx.working_dir.clone()),
    }
}

fn echo(cmd: &Command, ctx: &Context) {
    if !cmd.quiet && ctx.verbosity >= Verbosity::Normal {
        let print_str = interpolate(&cmd.print, &ctx.vars).unwrap_or_else(|_| cmd.print.clone());
        eprintln!("[RUN] {}", print_str);
    }
}

/// Execute a command with inherited stdout/stderr
pub fn execute_command(cmd: &Command, ctx: &Context) -> ExecutionResult<()> {
    let exec_str = interpolate(&cmd.exec, &ctx.vars)?;
    echo(cmd, ctx);

    let mut command = build(&exec_str, working_dir(cmd, ctx)?, ctx)?;
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    let status = command.status().map_err(|e| spawn_error(ctx, e))?;
    if !status.success() {
        return Err(ExecutionError::CommandFailed(status.code()));
    }

    Ok(())
}

/// Execute a command and return its stdout; stderr stays on the terminal
pub fn capture_command(cmd: &Command, ctx: &Context) -> ExecutionResult<String> {
    let exec_str = interpolate(&cmd.exec, &ctx.vars)?;
    echo(cmd, ctx);

    let mut command = build(&exec_str, working_dir(cmd, ctx)?, ctx)?;
    command.stdout(Stdio::piped());
    command.stderr(Stdio::inherit());

    let output = command.output().map_err(|e| spawn_error(ctx, e))?;
    if !output.status.success() {
        return Err(ExecutionError::CommandFailed(output.status.code()));
    }

    String::from_utf8(output.stdout).map_err(|_| ExecutionError::InvalidOutput)
}

/// Check if a command succeeds (for when conditions)
pub fn check_command(cmd_str: &str, ctx: &Context) -> ExecutionResult<bool> {
    let exec_str = interpolate(cmd_str, &ctx.vars)?;

    let mut command = build(&exec_str, ctx.working_dir.clone(), ctx)?;
    command.stdin(Stdio::null());
    command.stdout(Stdio::null());
    command.stderr(Stdio::null());

    let status = command.status().map_err(|e| spawn_error(ctx, e))?;
    Ok(status.success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InterpolationError;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn quiet_ctx() -> Context {
        Context::new().with_verbosity(Verbosity::Silent)
    }

    #[test]
    fn test_from_config_defaults_print_to_exec() {
        let cmd = Command::from_config(config::Command::Complex(config::CommandDetail {
            exec: "make".to_string(),
            print: None,
            quiet: true,
            dir: Some("sub".to_string()),
        }));
        assert_eq!(cmd.print, "make");
        assert!(cmd.quiet);
        assert_eq!(cmd.dir.as_deref(), Some("sub"));
    }

    #[test]
    fn test_execute_simple_command() {
        let result = execute_command(&Command::new("echo test"), &quiet_ctx());
        assert!(result.is_ok());
    }

    #[test]
    fn test_execute_failing_command() {
        let result = execute_command(&Command::new("exit 3"), &quiet_ctx());
        assert!(matches!(result, Err(ExecutionError::CommandFailed(Some(3)))));
    }

    #[test]
    fn test_capture_command_with_variables() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "world".to_string());

        let ctx = quiet_ctx().with_vars(vars);
        let output = capture_command(&Command::new("echo hello ${name}"), &ctx).unwrap();
        assert_eq!(output.trim(), "hello world");
    }

    #[test]
    fn test_vars_are_exported_to_commands() {
        let mut vars = HashMap::new();
        vars.insert("TASKLANE_EXPORTED".to_string(), "yes".to_string());

        let ctx = quiet_ctx().with_vars(vars);
        let output = capture_command(&Command::new("printf %s \"$TASKLANE_EXPORTED\""), &ctx).unwrap();
        assert_eq!(output, "yes");
    }

    #[test]
    fn test_command_runs_in_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("inner")).unwrap();
        std::fs::write(temp_dir.path().join("inner").join("marker.txt"), "x").unwrap();

        let ctx = quiet_ctx().with_working_dir(temp_dir.path().to_path_buf());
        let mut cmd = Command::new("ls");
        cmd.dir = Some("inner".to_string());

        let output = capture_command(&cmd, &ctx).unwrap();
        assert!(output.contains("marker.txt"));
    }

    #[test]
    fn test_undefined_variable_in_dir_is_an_error() {
        let mut cmd = Command::new("true");
        cmd.dir = Some("out/${undefined_tasklane_dir}".to_string());

        let result = execute_command(&cmd, &quiet_ctx());
        assert!(matches!(
            result,
            Err(ExecutionError::Interpolation(InterpolationError::UndefinedVariable(name)))
                if name == "undefined_tasklane_dir"
        ));
    }

    #[test]
    fn test_check_command() {
        let ctx = quiet_ctx();
        assert!(check_command("true", &ctx).unwrap());
        assert!(!check_command("false", &ctx).unwrap());
    }

    #[test]
    fn test_missing_interpreter_is_a_spawn_error() {
        let ctx = quiet_ctx().with_interpreter(vec!["/nonexistent/tasklane-shell".to_string()]);
        let result = check_command("true", &ctx);
        assert!(matches!(result, Err(ExecutionError::Spawn { .. })));
    }
}
