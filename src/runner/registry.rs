//! Task registry
//!
//! Holds named task definitions in registration order. Every registry is an
//! independent value; there is no process-wide registry.

use crate::error::DefineError;
use crate::runner::outcome::{IntoCondition, IntoOutcome, Outcome};
use crate::runner::report::RunInfo;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Boxed task body
pub type TaskBody<C> = Box<dyn Fn(&mut C, &RunInfo<'_>) -> Outcome>;

/// Boxed run condition
pub type TaskCondition<C> = Box<dyn Fn(&C, &RunInfo<'_>) -> Result<bool, String>>;

/// A registered task
pub struct TaskDef<C> {
    name: String,
    description: Option<String>,
    dependencies: Vec<String>,
    condition: Option<TaskCondition<C>>,
    body: TaskBody<C>,
    sequence: usize,
}

impl<C> TaskDef<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }

    /// Registration index, starting at 0
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub(crate) fn condition(&self) -> Option<&TaskCondition<C>> {
        self.condition.as_ref()
    }

    pub(crate) fn body(&self) -> &TaskBody<C> {
        &self.body
    }
}

impl<C> fmt::Debug for TaskDef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDef")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("dependencies", &self.dependencies)
            .field("has_condition", &self.condition.is_some())
            .field("sequence", &self.sequence)
            .finish()
    }
}

/// Optional metadata for [`Registry::define_with`]
pub struct TaskMeta<C> {
    dependencies: Vec<String>,
    description: Option<String>,
    condition: Option<TaskCondition<C>>,
}

impl<C> TaskMeta<C> {
    pub fn new() -> Self {
        TaskMeta {
            dependencies: Vec::new(),
            description: None,
            condition: None,
        }
    }

    /// Tasks that must finish (or be skipped) first, in the order given
    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Only run the task when the predicate holds
    pub fn when<F, R>(mut self, predicate: F) -> Self
    where
        F: Fn(&C, &RunInfo<'_>) -> R + 'static,
        R: IntoCondition,
    {
        let condition: TaskCondition<C> =
            Box::new(move |ctx: &C, info: &RunInfo<'_>| predicate(ctx, info).into_condition());
        self.condition = Some(condition);
        self
    }
}

impl<C> Default for TaskMeta<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Listing entry returned by [`Registry::list`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub name: String,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
}

/// Named task definitions, kept in registration order
pub struct Registry<C> {
    tasks: HashMap<String, TaskDef<C>>,
    order: Vec<String>,
    default_task: Option<String>,
}

impl<C> Registry<C> {
    pub fn new() -> Self {
        Registry {
            tasks: HashMap::new(),
            order: Vec::new(),
            default_task: None,
        }
    }

    /// Register a task without metadata
    pub fn define<F, R>(&mut self, name: impl Into<String>, body: F) -> Result<&mut Self, DefineError>
    where
        F: Fn(&mut C, &RunInfo<'_>) -> R + 'static,
        R: IntoOutcome,
    {
        self.define_with(name, TaskMeta::new(), body)
    }

    /// Register a task with dependencies, a description, or a condition.
    ///
    /// Fails if the name is empty or taken, or if a dependency name is empty.
    /// A rejected definition leaves the registry untouched.
    pub fn define_with<F, R>(
        &mut self,
        name: impl Into<String>,
        meta: TaskMeta<C>,
        body: F,
    ) -> Result<&mut Self, DefineError>
    where
        F: Fn(&mut C, &RunInfo<'_>) -> R + 'static,
        R: IntoOutcome,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(DefineError::EmptyName);
        }
        if self.tasks.contains_key(&name) {
            return Err(DefineError::Duplicate(name));
        }
        if meta.dependencies.iter().any(String::is_empty) {
            return Err(DefineError::EmptyDependency(name));
        }

        let body: TaskBody<C> =
            Box::new(move |ctx: &mut C, info: &RunInfo<'_>| body(ctx, info).into_outcome());
        let task = TaskDef {
            name: name.clone(),
            description: meta.description,
            dependencies: meta.dependencies,
            condition: meta.condition,
            body,
            sequence: self.order.len(),
        };

        self.order.push(name.clone());
        self.tasks.insert(name, task);
        Ok(self)
    }

    /// Task used when `plan`/`run` receive no names
    pub fn set_default(&mut self, name: impl Into<String>) -> Result<&mut Self, DefineError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DefineError::EmptyName);
        }
        self.default_task = Some(name);
        Ok(self)
    }

    pub fn default_task(&self) -> Option<&str> {
        self.default_task.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&TaskDef<C>> {
        self.tasks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Task names in registration order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Snapshot of every task in registration order
    pub fn list(&self) -> Vec<TaskSummary> {
        self.order
            .iter()
            .filter_map(|name| self.tasks.get(name))
            .map(|task| TaskSummary {
                name: task.name.clone(),
                description: task.description.clone(),
                dependencies: task.dependencies.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("tasks", &self.order)
            .field("default_task", &self.default_task)
            .finish()
    }
}
