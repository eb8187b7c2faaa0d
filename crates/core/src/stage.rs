// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage records and the run-once action contract

use crate::error::StageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The work a stage performs. Runs at most once per run, synchronously,
/// blocking its worker thread for the full duration.
pub type ActionFn = dyn Fn() -> Result<(), StageError> + Send + Sync;

/// Idempotency check: when it reports true the action is skipped and the
/// stage is marked complete anyway.
pub type CheckFn = dyn Fn() -> bool + Send + Sync;

/// One ordered unit of work in the run.
///
/// Outcome fields are written only by the engine; everything else reads them
/// through the accessors.
pub struct Stage {
    name: String,
    action: Arc<ActionFn>,
    done_when: Option<Arc<CheckFn>>,
    /// Compensating action. Reserved: nothing invokes it yet.
    #[allow(dead_code)]
    reset: Option<Arc<ActionFn>>,
    error: Option<String>,
    complete: bool,
}

impl Stage {
    /// Create a stage that always runs its action
    pub fn new(
        name: impl Into<String>,
        action: impl Fn() -> Result<(), StageError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            action: Arc::new(action),
            done_when: None,
            reset: None,
            error: None,
            complete: false,
        }
    }

    /// Attach an idempotency check; a true result skips the action
    pub fn with_done_when(mut self, check: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.done_when = Some(Arc::new(check));
        self
    }

    /// Attach a compensating action (reserved extension point)
    pub fn with_reset(
        mut self,
        reset: impl Fn() -> Result<(), StageError> + Send + Sync + 'static,
    ) -> Self {
        self.reset = Some(Arc::new(reset));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Status for rendering and summaries: error wins over complete
    pub fn status(&self) -> StageStatus {
        if self.error.is_some() {
            StageStatus::Failed
        } else if self.complete {
            StageStatus::Complete
        } else {
            StageStatus::Pending
        }
    }

    pub(crate) fn record_complete(&mut self) {
        self.complete = true;
    }

    pub(crate) fn record_failure(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// Snapshot this stage's work for execution on a worker thread
    pub fn job(&self, index: usize) -> StageJob {
        StageJob {
            index,
            action: Arc::clone(&self.action),
            done_when: self.done_when.as_ref().map(Arc::clone),
        }
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("status", &self.status())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Display status of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Complete,
    Failed,
}

/// How a stage resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    /// The action ran and returned success
    Completed,
    /// The done-check reported the work already satisfied; action not invoked
    Skipped,
    /// The action returned an error
    Failed { error: String },
}

/// A runnable snapshot of the current stage.
///
/// Holds clones of the action handles so the engine keeps exclusive ownership
/// of the stage record while the job blocks a worker thread.
pub struct StageJob {
    index: usize,
    action: Arc<ActionFn>,
    done_when: Option<Arc<CheckFn>>,
}

impl StageJob {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Execute the stage's work, blocking until it resolves.
    ///
    /// The done-check is consulted first; a satisfied stage never reaches its
    /// action.
    pub fn run(self) -> StageOutcome {
        if let Some(check) = &self.done_when {
            if check() {
                return StageOutcome::Skipped;
            }
        }
        match (self.action)() {
            Ok(()) => StageOutcome::Completed,
            Err(e) => StageOutcome::Failed {
                error: e.to_string(),
            },
        }
    }
}

impl std::fmt::Debug for StageJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageJob")
            .field("index", &self.index)
            .field("done_when", &self.done_when.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
