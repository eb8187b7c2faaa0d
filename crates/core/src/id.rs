// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run identifier generation

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of run identifiers, seamed so tests get stable ids
pub trait IdGen: Send + Sync {
    fn next(&self) -> String;
}

/// Random ids for production runs
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Counter-backed ids for tests
pub struct SequentialIdGen {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("run")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        format!(
            "{}-{}",
            self.prefix,
            self.counter.fetch_add(1, Ordering::SeqCst)
        )
    }
}
