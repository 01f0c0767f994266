//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tasklane::runner::{RunEvent, RunInfo};
use tempfile::TempDir;

/// Create a temporary directory with a tasklane.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("tasklane.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a test config with a sibling subdirectory
pub fn create_test_config_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let (temp_dir, config_path) = create_test_config(content);
    let sub_dir = temp_dir.path().join("subdir");
    fs::create_dir(&sub_dir).unwrap();
    (temp_dir, config_path, sub_dir)
}

/// Task body that appends its own name to a shared log
pub fn record(log: &mut Vec<String>, info: &RunInfo<'_>) {
    log.push(info.task().to_string());
}

/// Compact `kind:name` rendering of an event
pub fn describe(event: &RunEvent<'_>) -> String {
    match event {
        RunEvent::RunnerStart { .. } => "runner_start".to_string(),
        RunEvent::TaskStart { name, .. } => format!("task_start:{}", name),
        RunEvent::TaskEnd(entry) => format!("task_end:{}", entry.name),
        RunEvent::RunnerEnd { .. } => "runner_end".to_string(),
    }
}
