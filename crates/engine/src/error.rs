// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the controller loop

use thiserror::Error;

/// Failures of the loop itself.
///
/// A stage failing is not an error here; that is an ordinary outcome carried
/// in the run report. These are the unrecoverable startup/plumbing failures
/// that exit the process non-zero.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("event channel closed before the run resolved")]
    ChannelClosed,
}
