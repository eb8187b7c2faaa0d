// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event vocabulary for the controller loop

use crate::stage::StageOutcome;
use serde::{Deserialize, Serialize};

/// Messages the controller processes, strictly one at a time in arrival
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Kick off the run
    Start,
    /// The stage at `index` resolved
    StageDone { index: usize, outcome: StageOutcome },
    /// Spinner animation frame; never touches engine state
    Tick,
    /// User requested immediate shutdown
    Interrupt,
}

impl Event {
    /// Label for log lines, "category:action" style
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start => "run:start",
            Event::StageDone { .. } => "stage:done",
            Event::Tick => "spinner:tick",
            Event::Interrupt => "user:interrupt",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
