//! Console rendering of run events

use crate::runner::{RunEvent, TaskResult, TaskStatus};
use crate::shell::Verbosity;
use colored::Colorize;
use std::time::Duration;

/// Renders lifecycle events on stderr according to the verbosity level
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    verbosity: Verbosity,
}

impl Reporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Reporter { verbosity }
    }

    /// Print the line for an event, if any
    pub fn handle(&self, event: &RunEvent<'_>) {
        if let Some(line) = self.render(event) {
            eprintln!("{}", line);
        }
    }

    /// Line to print for an event at this verbosity
    pub fn render(&self, event: &RunEvent<'_>) -> Option<String> {
        match event {
            RunEvent::RunnerStart { plan, .. } => self
                .at(Verbosity::Verbose)
                .then(|| format!("{} {}", "plan:".dimmed(), plan.join(" -> "))),

            RunEvent::TaskStart { name, index, total } => self
                .at(Verbosity::Normal)
                .then(|| format!("{} {}", format!("[{}/{}]", index, total).dimmed(), name.bold())),

            RunEvent::TaskEnd(entry) => self.render_entry(entry),

            RunEvent::RunnerEnd {
                ok,
                failed,
                skipped,
                results,
            } => self.at(Verbosity::Normal).then(|| {
                let passed = results.len() - failed - skipped;
                let summary = format!(
                    "{} passed, {} skipped, {} failed",
                    passed, skipped, failed
                );
                if *ok {
                    summary.green().to_string()
                } else {
                    summary.red().to_string()
                }
            }),
        }
    }

    fn render_entry(&self, entry: &TaskResult) -> Option<String> {
        match entry.status {
            TaskStatus::Ok => self.at(Verbosity::Verbose).then(|| {
                format!("{} {}{}", "ok".green(), entry.name, timing(entry.duration))
            }),
            TaskStatus::Skip => self.at(Verbosity::Normal).then(|| {
                let reason = entry.reason.as_deref().unwrap_or("skipped");
                format!("{} {} ({})", "skip".yellow(), entry.name, reason)
            }),
            TaskStatus::Error => self.at(Verbosity::Quiet).then(|| {
                let message = entry.error.as_deref().unwrap_or("failed");
                format!("{} {}: {}", "error".red().bold(), entry.name, message)
            }),
        }
    }

    fn at(&self, level: Verbosity) -> bool {
        self.verbosity >= level
    }
}

fn timing(duration: Option<Duration>) -> String {
    duration
        .map(|d| format!(" ({:.1}ms)", d.as_secs_f64() * 1000.0))
        .unwrap_or_default()
}
