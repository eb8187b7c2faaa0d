// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for stage actions

use thiserror::Error;

/// Errors a stage action can fail with.
///
/// A stage failure is fatal to the run: the engine records it on the stage,
/// surfaces it as the terminal error, and never retries.
#[derive(Debug, Error)]
pub enum StageError {
    /// The action reported a failure in its own words
    #[error("{0}")]
    Action(String),
    /// The action failed on an I/O operation
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StageError {
    /// Convenience constructor for message-only failures
    pub fn action(message: impl Into<String>) -> Self {
        Self::Action(message.into())
    }
}
