//! Behavioral specifications for the rung CLI.
//!
//! These tests are black-box: they invoke the binary and verify stdout,
//! exit codes, and the artifacts left in the working directory.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use assert_cmd::Command;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use predicates::prelude::*;
use std::time::{Duration, Instant};

const DEBUG_LOG: &str = "rung-debug.log";
const MANIFEST: &str = ".rung-workspace/manifest.txt";

fn rung(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("rung").unwrap();
    cmd.current_dir(dir).args(["--delay-ms", "0", "--tick-ms", "10"]);
    cmd
}

#[test]
fn successful_run_exits_zero_with_no_debug_log() {
    let temp = tempfile::tempdir().unwrap();

    rung(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("All stages complete."))
        .stdout(predicate::str::contains("✓"));

    assert!(!temp.path().join(DEBUG_LOG).exists());
    assert!(temp.path().join(MANIFEST).exists());
}

#[test]
fn failing_stage_halts_the_run_and_writes_the_debug_log() {
    let temp = tempfile::tempdir().unwrap();

    rung(temp.path())
        .args(["--fail", "write manifest"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Run halted at stage 'write manifest'",
        ))
        .stdout(predicate::str::contains("Debug log written to"))
        .stdout(predicate::str::contains("✗"))
        .stdout(predicate::str::contains("◻"));

    let log = std::fs::read_to_string(temp.path().join(DEBUG_LOG)).unwrap();
    assert!(log.contains("Human legible log of steps taken"));
    assert!(log.contains("injected failure in stage 'write manifest'"));
    assert!(log.contains("Complete log of the error that halted the run:"));

    // the stage after the failure never ran
    assert!(!temp.path().join(MANIFEST).exists());
}

#[test]
fn rerun_against_an_existing_workspace_still_succeeds() {
    let temp = tempfile::tempdir().unwrap();

    rung(temp.path()).assert().success();
    // second run skips "create workspace" via its done-check
    rung(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("All stages complete."));
}

#[test]
fn json_summary_reports_the_outcome_per_stage() {
    let temp = tempfile::tempdir().unwrap();

    let output = rung(temp.path())
        .args(["--fail", "verify manifest", "--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();

    // the JSON summary follows the final checklist frame
    let json_start = stdout.find('{').unwrap();
    let summary: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();

    assert_eq!(summary["outcome"]["failed"]["stage"], "verify manifest");
    let stages = summary["stages"].as_array().unwrap();
    assert_eq!(stages.len(), 4);
    assert_eq!(stages[0]["status"], "complete");
    assert_eq!(stages[3]["status"], "failed");
    let failure_log = summary["failure_log"].as_str().unwrap();
    assert!(failure_log.ends_with(DEBUG_LOG));
}

#[test]
fn interrupt_mid_stage_exits_promptly_without_a_log() {
    let temp = tempfile::tempdir().unwrap();

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("rung"))
        .current_dir(temp.path())
        .args(["--delay-ms", "10000", "--tick-ms", "10"])
        .stdout(std::process::Stdio::null())
        .spawn()
        .unwrap();

    // let the first stage action get in flight
    std::thread::sleep(Duration::from_millis(300));
    kill(Pid::from_raw(child.id() as i32), Signal::SIGINT).unwrap();

    let waited = Instant::now();
    let status = child.wait().unwrap();

    assert!(status.success());
    assert!(waited.elapsed() < Duration::from_secs(2));
    assert!(!temp.path().join(DEBUG_LOG).exists());
}
