//! End-to-end tests for the tasklane binary

mod common;

use assert_cmd::Command;
use common::create_test_config;
use predicates::prelude::*;

const PIPELINE: &str = r#"
name: demo
default: test
tasks:
  fmt:
    description: Format sources
    run: "true"
  build:
    description: Compile
    deps: [fmt]
    run: "true"
  test:
    deps: [build]
    run: "true"
  helper:
    private: true
    run: "true"
"#;

fn tasklane() -> Command {
    Command::cargo_bin("tasklane").unwrap()
}

#[test]
fn test_list_hides_private_tasks() {
    let (_temp_dir, config_path) = create_test_config(PIPELINE);

    tasklane()
        .arg("-f")
        .arg(&config_path)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Format sources"))
        .stdout(predicate::str::contains("* test"))
        .stdout(predicate::str::contains("helper").not());
}

#[test]
fn test_plan_prints_order() {
    let (_temp_dir, config_path) = create_test_config(PIPELINE);

    tasklane()
        .arg("-f")
        .arg(&config_path)
        .args(["--plan", "test"])
        .assert()
        .success()
        .stdout("fmt\nbuild\ntest\n");
}

#[test]
fn test_runs_default_task() {
    let (_temp_dir, config_path) = create_test_config(PIPELINE);

    tasklane()
        .arg("-f")
        .arg(&config_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("[3/3] test"))
        .stderr(predicate::str::contains("3 passed, 0 skipped, 0 failed"));
}

#[test]
fn test_dry_run_json_report() {
    let (temp_dir, config_path) = create_test_config(
        r#"
tasks:
  touch:
    run: touch created
"#,
    );

    tasklane()
        .arg("-f")
        .arg(&config_path)
        .args(["--dry-run", "--json", "-s", "touch"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""reason": "dry_run""#))
        .stdout(predicate::str::contains(r#""ok": true"#));

    assert!(!temp_dir.path().join("created").exists());
}

#[test]
fn test_failing_task_sets_exit_code() {
    let (_temp_dir, config_path) = create_test_config(
        r#"
tasks:
  broken:
    run: exit 3
  after:
    run: "true"
"#,
    );

    tasklane()
        .arg("-f")
        .arg(&config_path)
        .args(["-x", "broken", "after"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error broken"))
        .stderr(predicate::str::contains("[2/2]").not());
}

#[test]
fn test_cycle_is_reported() {
    let (_temp_dir, config_path) = create_test_config(
        r#"
tasks:
  a:
    deps: [b]
    run: "true"
  b:
    deps: [a]
    run: "true"
"#,
    );

    tasklane()
        .arg("-f")
        .arg(&config_path)
        .arg("a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("a -> b -> a"));
}

#[test]
fn test_unknown_task_is_reported() {
    let (_temp_dir, config_path) = create_test_config(PIPELINE);

    tasklane()
        .arg("-f")
        .arg(&config_path)
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task 'deploy' is not defined"));
}

#[test]
fn test_set_overrides_variable() {
    let (temp_dir, config_path) = create_test_config(
        r#"
vars:
  out: first
tasks:
  write:
    run: touch ${out}
"#,
    );

    tasklane()
        .arg("-f")
        .arg(&config_path)
        .args(["--set", "out=second", "write"])
        .assert()
        .success();

    assert!(temp_dir.path().join("second").exists());
    assert!(!temp_dir.path().join("first").exists());
}

#[test]
fn test_completions() {
    tasklane()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tasklane"));
}
