// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure log artifact
//!
//! Written exactly once per failing run: a flat, human-readable file in the
//! process working directory, overwritten each run. The file, not the
//! on-screen checklist, is the durable record of what happened, suitable
//! for attaching to a bug report.

use rung_core::AuditLog;
use std::path::Path;
use thiserror::Error;

/// Fixed artifact name, created in the process working directory
pub const REPORT_FILE_NAME: &str = "rung-debug.log";

const BANNER: &str =
    "******************************************************************************";

/// Failure to persist the artifact. Reported to the user, never escalated;
/// a logging failure must not mask the stage failure that caused it.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// What goes into the artifact
pub struct FailureReport<'a> {
    pub run_id: &'a str,
    /// Name of the stage that halted the run
    pub stage: &'a str,
    /// The terminating error's text
    pub error: &'a str,
    pub audit: &'a AuditLog,
}

/// Write the failure log, overwriting any previous artifact at `path`.
pub fn write_failure_report(path: &Path, report: &FailureReport) -> Result<(), ReportError> {
    let mut out = String::new();

    out.push_str(&format!(
        "Ran at: {} (run {})\n",
        chrono::Utc::now(),
        report.run_id
    ));
    out.push_str(BANNER);
    out.push('\n');
    out.push_str("Human legible log of steps taken up to the point of failure:\n");
    out.push_str(BANNER);
    out.push('\n');
    for entry in report.audit.entries() {
        out.push_str(entry);
        out.push('\n');
    }
    out.push_str("^ The above step is likely the one that caused the error!\n");
    out.push_str("\n\n");
    out.push_str(BANNER);
    out.push('\n');
    out.push_str("Complete log of the error that halted the run:\n");
    out.push_str(BANNER);
    out.push('\n');
    out.push_str("\n\n");
    out.push_str(&format!("{}: {}\n", report.stage, report.error));

    std::fs::write(path, out)?;
    tracing::info!(path = %path.display(), "failure log written");
    Ok(())
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
