//! Sequential plan execution
//!
//! Runs a resolved plan one task at a time against a shared context. A failing
//! condition or body (including a panic) is recorded on that task only; the run
//! continues unless fail-fast is set.

use crate::error::PlanError;
use crate::runner::event::RunEvent;
use crate::runner::outcome::Outcome;
use crate::runner::registry::Registry;
use crate::runner::report::{
    RunInfo, RunReport, TaskResult, REASON_DRY_RUN, REASON_WHEN_FALSE, WHEN_ERROR,
};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

type EventCallback<'a> = Box<dyn FnMut(&RunEvent<'_>) + 'a>;

/// Options for a single run
#[derive(Default)]
pub struct RunOptions<'a> {
    dry_run: bool,
    fail_fast: bool,
    on_event: Option<EventCallback<'a>>,
}

impl<'a> RunOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the plan and mark every task skipped without running anything
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stop scheduling tasks after the first error
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Receive lifecycle events as they happen
    pub fn on_event<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&RunEvent<'_>) + 'a,
    {
        self.on_event = Some(Box::new(callback));
        self
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    fn emit(&mut self, event: RunEvent<'_>) {
        if let Some(callback) = self.on_event.as_mut() {
            callback(&event);
        }
    }
}

impl fmt::Debug for RunOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("dry_run", &self.dry_run)
            .field("fail_fast", &self.fail_fast)
            .field("on_event", &self.on_event.is_some())
            .finish()
    }
}

impl<C> Registry<C> {
    /// Plan and execute the requested tasks.
    ///
    /// Planning failures are returned as `Err` before any task runs. Otherwise a
    /// report is always returned; check `report.ok` for task failures.
    pub fn run<I, S>(
        &self,
        requested: I,
        ctx: &mut C,
        mut options: RunOptions<'_>,
    ) -> Result<RunReport, PlanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let roots = self.resolve_requested(requested);
        let plan = self.plan_roots(&roots)?;
        let mut report = RunReport::new(roots, plan);

        options.emit(RunEvent::RunnerStart {
            requested: &report.requested,
            plan: &report.plan,
        });

        let total = report.plan.len();
        for position in 1..=total {
            let name = report.plan[position - 1].clone();
            options.emit(RunEvent::TaskStart {
                name: &name,
                index: position,
                total,
            });

            let info = RunInfo {
                task: &name,
                index: position,
                total,
                dry_run: options.dry_run,
                fail_fast: options.fail_fast,
                report: &report,
            };
            let entry = self.execute_task(ctx, &info);

            let entry = report.record(entry);
            let stop = entry.is_error() && options.fail_fast;
            options.emit(RunEvent::TaskEnd(entry));

            if stop {
                break;
            }
        }

        options.emit(RunEvent::RunnerEnd {
            ok: report.ok,
            failed: report.failed,
            skipped: report.skipped,
            results: &report.results,
        });

        Ok(report)
    }

    fn execute_task(&self, ctx: &mut C, info: &RunInfo<'_>) -> TaskResult {
        let name = info.task();
        if info.dry_run() {
            return TaskResult::skipped(name, REASON_DRY_RUN, None);
        }

        let Some(task) = self.get(name) else {
            return TaskResult::failed(name, format!("Task '{name}' is not defined"), None);
        };

        let started = Instant::now();

        if let Some(condition) = task.condition() {
            let checked = trap(|| condition(&*ctx, info)).and_then(|r| r);
            match checked {
                Ok(true) => {}
                Ok(false) => {
                    return TaskResult::skipped(name, REASON_WHEN_FALSE, Some(started.elapsed()))
                }
                Err(message) => {
                    return TaskResult::failed(
                        name,
                        format!("{WHEN_ERROR}: {message}"),
                        Some(started.elapsed()),
                    )
                }
            }
        }

        let body = task.body();
        let outcome = trap(|| body(ctx, info)).unwrap_or_else(Outcome::Error);
        TaskResult::from_outcome(name, outcome, Some(started.elapsed()))
    }
}

/// Run `f`, turning a panic into an error message
fn trap<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
