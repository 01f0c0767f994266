//! Lifecycle events emitted during a run

use crate::runner::report::TaskResult;
use serde::Serialize;

/// A single lifecycle transition, delivered synchronously to the `on_event` callback
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunEvent<'a> {
    RunnerStart {
        requested: &'a [String],
        plan: &'a [String],
    },
    TaskStart {
        name: &'a str,
        index: usize,
        total: usize,
    },
    TaskEnd(&'a TaskResult),
    RunnerEnd {
        ok: bool,
        failed: usize,
        skipped: usize,
        results: &'a [TaskResult],
    },
}

impl RunEvent<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            RunEvent::RunnerStart { .. } => "runner_start",
            RunEvent::TaskStart { .. } => "task_start",
            RunEvent::TaskEnd(_) => "task_end",
            RunEvent::RunnerEnd { .. } => "runner_end",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::outcome::Outcome;

    #[test]
    fn test_task_end_serializes_flat() {
        let entry = TaskResult::from_outcome("lint", Outcome::skip("when_false"), None);
        let value = serde_json::to_value(RunEvent::TaskEnd(&entry)).unwrap();
        assert_eq!(value["kind"], "task_end");
        assert_eq!(value["name"], "lint");
        assert_eq!(value["status"], "skip");
        assert_eq!(value["reason"], "when_false");
    }

    #[test]
    fn test_kind_matches_tag() {
        let plan = vec!["a".to_string()];
        let event = RunEvent::RunnerStart {
            requested: &plan,
            plan: &plan,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["kind"], event.kind());
    }
}
