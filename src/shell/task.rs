//! Shell tasks
//!
//! Runtime form of the tasks declared in a config file, and their registration
//! into a [`Registry`] whose bodies launch commands.

use crate::config::{self, Config};
use crate::error::{ConfigResult, ExecutionResult, TasklaneError};
use crate::runner::{Outcome, Registry, RunInfo, TaskMeta};
use crate::shell::{
    capture_command, evaluate_when_list, execute_command, Command, Context, WhenCondition,
};
use std::rc::Rc;

/// Runtime task representation
#[derive(Debug, Clone)]
pub struct ShellTask {
    pub name: String,

    pub description: Option<String>,

    pub deps: Vec<String>,

    /// Conditions that must all hold
    pub when: Vec<WhenCondition>,

    pub commands: Vec<Command>,

    /// Variable receiving the captured stdout
    pub capture: Option<String>,
}

impl ShellTask {
    /// Create a new task from configuration
    pub fn from_config(name: String, config: config::Task) -> ConfigResult<Self> {
        config::validate_task(&name, &config)?;

        let when = config
            .when
            .iter()
            .map(|w| WhenCondition::from_config(&name, w))
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(ShellTask {
            description: config.description,
            deps: config.deps,
            when,
            commands: config.run.into_iter().map(Command::from_config).collect(),
            capture: config.capture,
            name,
        })
    }

    /// Check the task's conditions
    pub fn should_run(&self, ctx: &Context) -> ExecutionResult<bool> {
        evaluate_when_list(&self.when, ctx)
    }

    /// Run the commands in order, stopping at the first failure.
    ///
    /// With `capture`, stdout of all commands is collected, trimmed, stored in the
    /// named variable and returned as the payload.
    pub fn run(&self, ctx: &mut Context) -> ExecutionResult<Outcome> {
        let Some(var) = &self.capture else {
            for cmd in &self.commands {
                execute_command(cmd, ctx)?;
            }
            return Ok(Outcome::ok());
        };

        let mut output = String::new();
        for cmd in &self.commands {
            output.push_str(&capture_command(cmd, ctx)?);
        }

        let value = output.trim().to_string();
        ctx.set_var(var.clone(), value.clone());
        Ok(Outcome::with_value(value))
    }
}

/// Register every task of a config, in file order
pub fn build_registry(config: &Config) -> Result<Registry<Context>, TasklaneError> {
    let mut registry = Registry::new();

    for (name, task_config) in &config.tasks {
        let task = Rc::new(ShellTask::from_config(name.clone(), task_config.clone())?);

        let mut meta = TaskMeta::new().depends_on(task.deps.iter().cloned());
        if let Some(description) = &task.description {
            meta = meta.description(description.clone());
        }
        if !task.when.is_empty() {
            let guard = Rc::clone(&task);
            meta = meta.when(move |ctx: &Context, _: &RunInfo<'_>| guard.should_run(ctx));
        }

        let body = Rc::clone(&task);
        registry.define_with(name.clone(), meta, move |ctx: &mut Context, _: &RunInfo<'_>| {
            body.run(ctx)
        })?;
    }

    if let Some(default) = &config.default {
        registry.set_default(default.clone())?;
    }

    Ok(registry)
}
