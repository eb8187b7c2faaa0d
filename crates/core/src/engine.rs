// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine state machine: walks stages in order, halts on the first failure

use crate::stage::{Stage, StageJob, StageOutcome};
use serde::{Deserialize, Serialize};

/// Run lifecycle. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// What the controller should do after an advance
#[derive(Debug)]
pub enum Progress {
    /// Start the next stage immediately
    Next(StageJob),
    /// Every stage resolved cleanly
    Succeeded,
    /// The current stage holds the terminal error
    Failed,
}

/// Owns the ordered stage list and the cursor into it.
///
/// Invariant while running: `stages[0..cursor)` are all complete with no
/// error. All outcome mutation goes through `complete_current`; no other
/// component writes stage records.
pub struct Engine {
    stages: Vec<Stage>,
    cursor: usize,
    status: RunStatus,
}

impl Engine {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self {
            stages,
            cursor: 0,
            status: RunStatus::Idle,
        }
    }

    /// Begin the run. Returns the job for stage 0, or `None` for an empty
    /// stage list, which succeeds immediately.
    pub fn start(&mut self) -> Option<StageJob> {
        if self.status != RunStatus::Idle {
            tracing::warn!(status = ?self.status, "start ignored: run already underway");
            return None;
        }
        if self.stages.is_empty() {
            self.status = RunStatus::Succeeded;
            return None;
        }
        self.status = RunStatus::Running;
        Some(self.stages[0].job(0))
    }

    /// Record a stage outcome on its record.
    ///
    /// Only the stage at the cursor can resolve; anything else is a stale
    /// message and is dropped.
    pub fn complete_current(&mut self, index: usize, outcome: &StageOutcome) {
        if self.status != RunStatus::Running || index != self.cursor {
            tracing::warn!(index, cursor = self.cursor, "dropping stale stage outcome");
            return;
        }
        match outcome {
            StageOutcome::Completed | StageOutcome::Skipped => {
                self.stages[self.cursor].record_complete();
            }
            StageOutcome::Failed { error } => {
                self.stages[self.cursor].record_failure(error.clone());
            }
        }
    }

    /// Decide what happens after the current stage resolved.
    pub fn advance(&mut self) -> Progress {
        if self.stages[self.cursor].error().is_some() {
            self.status = RunStatus::Failed;
            return Progress::Failed;
        }
        if self.cursor + 1 == self.stages.len() {
            self.status = RunStatus::Succeeded;
            return Progress::Succeeded;
        }
        self.cursor += 1;
        Progress::Next(self.stages[self.cursor].job(self.cursor))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// The stage at the cursor, if any stages exist
    pub fn current_stage(&self) -> Option<&Stage> {
        self.stages.get(self.cursor)
    }

    /// The failing stage once the run has halted
    pub fn failure(&self) -> Option<&Stage> {
        self.stages.iter().find(|s| s.error().is_some())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
