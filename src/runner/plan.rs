//! Execution planning
//!
//! Resolves requested task names into a linear order in which every task comes
//! after all of its dependencies. The traversal is a depth-first post-order walk,
//! so independent subtrees keep the order in which they were requested or declared.

use crate::error::PlanError;
use crate::runner::registry::Registry;
use std::collections::HashSet;

impl<C> Registry<C> {
    /// Compute the execution order for the requested tasks.
    ///
    /// An empty request falls back to the default task, or yields an empty plan
    /// when no default is set.
    pub fn plan<I, S>(&self, requested: I) -> Result<Vec<String>, PlanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let roots = self.resolve_requested(requested);
        self.plan_roots(&roots)
    }

    /// Requested names with the default task substituted for an empty request
    pub(crate) fn resolve_requested<I, S>(&self, requested: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roots: Vec<String> = requested
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        if roots.is_empty() {
            if let Some(default) = self.default_task() {
                roots.push(default.to_string());
            }
        }
        roots
    }

    pub(crate) fn plan_roots(&self, roots: &[String]) -> Result<Vec<String>, PlanError> {
        if let Some(unknown) = roots.iter().find(|name| !self.contains(name)) {
            return Err(PlanError::UnknownTask(unknown.clone()));
        }

        let mut planner = Planner::new(self);
        for root in roots {
            planner.visit(root, None)?;
        }
        Ok(planner.order)
    }
}

/// Depth-first walk state for one planning call
struct Planner<'r, C> {
    registry: &'r Registry<C>,
    /// Tasks already placed in the plan
    placed: HashSet<String>,
    /// Active recursion path
    path: Vec<String>,
    order: Vec<String>,
}

impl<'r, C> Planner<'r, C> {
    fn new(registry: &'r Registry<C>) -> Self {
        Planner {
            registry,
            placed: HashSet::new(),
            path: Vec::new(),
            order: Vec::new(),
        }
    }

    fn visit(&mut self, name: &str, dependent: Option<&str>) -> Result<(), PlanError> {
        if self.placed.contains(name) {
            return Ok(());
        }

        if let Some(start) = self.path.iter().position(|n| n == name) {
            let mut cycle = self.path[start..].to_vec();
            cycle.push(name.to_string());
            return Err(PlanError::Cycle(cycle.join(" -> ")));
        }

        let registry = self.registry;
        let task = match (registry.get(name), dependent) {
            (Some(task), _) => task,
            (None, Some(dependent)) => {
                return Err(PlanError::UnknownDep {
                    task: dependent.to_string(),
                    dep: name.to_string(),
                })
            }
            (None, None) => return Err(PlanError::UnknownTask(name.to_string())),
        };

        self.path.push(name.to_string());
        for dep in task.dependencies() {
            self.visit(dep, Some(name))?;
        }
        self.path.pop();

        self.placed.insert(name.to_string());
        self.order.push(name.to_string());
        Ok(())
    }
}
