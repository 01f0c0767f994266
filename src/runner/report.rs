//! Per-task result entries and the aggregate run report

use crate::runner::outcome::{Outcome, TaskStatus};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::time::Duration;

/// Skip reason recorded for every task of a dry run
pub const REASON_DRY_RUN: &str = "dry_run";

/// Skip reason recorded when a task's condition evaluated to false
pub const REASON_WHEN_FALSE: &str = "when_false";

/// Prefix of the error message recorded when a condition itself fails
pub const WHEN_ERROR: &str = "when_error";

/// Outcome of one task in a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskResult {
    pub name: String,

    pub status: TaskStatus,

    /// Why the task was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(
        rename = "duration_ms",
        serialize_with = "serialize_duration_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<Duration>,

    /// Payload returned by the task body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl TaskResult {
    pub(crate) fn from_outcome(name: &str, outcome: Outcome, duration: Option<Duration>) -> Self {
        let mut entry = TaskResult {
            name: name.to_string(),
            status: outcome.status(),
            reason: None,
            error: None,
            duration,
            result: None,
        };
        match outcome {
            Outcome::Ok(payload) => entry.result = payload,
            Outcome::Skip(reason) => entry.reason = reason,
            Outcome::Error(message) => entry.error = Some(message),
        }
        entry
    }

    pub(crate) fn skipped(name: &str, reason: &str, duration: Option<Duration>) -> Self {
        Self::from_outcome(name, Outcome::skip(reason), duration)
    }

    pub(crate) fn failed(name: &str, message: String, duration: Option<Duration>) -> Self {
        Self::from_outcome(name, Outcome::Error(message), duration)
    }

    pub fn is_ok(&self) -> bool {
        self.status == TaskStatus::Ok
    }

    pub fn is_skipped(&self) -> bool {
        self.status == TaskStatus::Skip
    }

    pub fn is_error(&self) -> bool {
        self.status == TaskStatus::Error
    }
}

fn serialize_duration_ms<S: Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(d) => serializer.serialize_f64(d.as_secs_f64() * 1000.0),
        None => serializer.serialize_none(),
    }
}

/// Aggregate result of one `run` invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Root task names the plan was computed from
    pub requested: Vec<String>,

    /// Resolved execution order
    pub plan: Vec<String>,

    /// Recorded entries, in execution order
    pub results: Vec<TaskResult>,

    pub total: usize,
    pub passed: usize,
    pub skipped: usize,
    pub failed: usize,

    /// True iff no entry has status `error`
    pub ok: bool,
}

impl RunReport {
    pub(crate) fn new(requested: Vec<String>, plan: Vec<String>) -> Self {
        let capacity = plan.len();
        RunReport {
            requested,
            plan,
            results: Vec::with_capacity(capacity),
            total: 0,
            passed: 0,
            skipped: 0,
            failed: 0,
            ok: true,
        }
    }

    /// Append an entry and update the counts
    pub(crate) fn record(&mut self, entry: TaskResult) -> &TaskResult {
        self.total += 1;
        match entry.status {
            TaskStatus::Ok => self.passed += 1,
            TaskStatus::Skip => self.skipped += 1,
            TaskStatus::Error => {
                self.failed += 1;
                self.ok = false;
            }
        }
        self.results.push(entry);
        &self.results[self.results.len() - 1]
    }

    /// Look up the entry recorded for a task
    pub fn result(&self, name: &str) -> Option<&TaskResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Names of the recorded entries, in execution order
    pub fn executed(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.name.as_str()).collect()
    }

    /// Sum of the measured task durations
    pub fn elapsed(&self) -> Duration {
        self.results.iter().filter_map(|r| r.duration).sum()
    }
}

/// What a task body or condition can see about the run in progress
#[derive(Debug, Clone, Copy)]
pub struct RunInfo<'a> {
    pub(crate) task: &'a str,
    pub(crate) index: usize,
    pub(crate) total: usize,
    pub(crate) dry_run: bool,
    pub(crate) fail_fast: bool,
    pub(crate) report: &'a RunReport,
}

impl<'a> RunInfo<'a> {
    /// Name of the task being executed
    pub fn task(&self) -> &'a str {
        self.task
    }

    /// 1-based position of the task in the plan
    pub fn index(&self) -> usize {
        self.index
    }

    /// Length of the plan
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    pub fn requested(&self) -> &'a [String] {
        &self.report.requested
    }

    pub fn plan(&self) -> &'a [String] {
        &self.report.plan
    }

    /// Entries recorded before this task
    pub fn results(&self) -> &'a [TaskResult] {
        &self.report.results
    }

    /// Entry recorded for an earlier task, if it already ran
    pub fn result(&self, name: &str) -> Option<&'a TaskResult> {
        self.report.result(name)
    }
}
