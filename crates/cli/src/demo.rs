// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The built-in demo pipeline
//!
//! Stage lists are fixed at build time; this is the one the binary ships.
//! Each stage sleeps for the pacing delay before doing its (small) real
//! work, so the spinner has something to animate over.

use rung_core::{Stage, StageError};
use std::path::Path;
use std::time::Duration;

/// Scratch directory the demo stages work in, under the run root
pub const WORKSPACE_DIR: &str = ".rung-workspace";

const MANIFEST_FILE: &str = "manifest.txt";

fn paced(
    name: &'static str,
    delay: Duration,
    fail: Option<&str>,
    work: impl Fn() -> Result<(), StageError> + Send + Sync + 'static,
) -> Stage {
    let inject = fail == Some(name);
    Stage::new(name, move || {
        std::thread::sleep(delay);
        if inject {
            return Err(StageError::action(format!(
                "injected failure in stage '{}'",
                name
            )));
        }
        work()
    })
}

/// Build the demo stage list rooted at `root` (normally the process working
/// directory).
///
/// `fail` injects a failure into the named stage, for demonstrating the
/// halt-and-log path.
pub fn demo_stages(root: &Path, delay: Duration, fail: Option<&str>) -> Vec<Stage> {
    let workspace = root.join(WORKSPACE_DIR);
    let manifest = workspace.join(MANIFEST_FILE);
    let workspace_to_create = workspace.clone();
    let manifest_to_verify = manifest.clone();

    vec![
        paced("check environment", delay, fail, || {
            std::env::var("PATH")
                .map(|_| ())
                .map_err(|_| StageError::action("PATH is not set"))
        }),
        paced("create workspace", delay, fail, move || {
            std::fs::create_dir_all(&workspace_to_create)?;
            Ok(())
        })
        .with_done_when(move || workspace.is_dir()),
        paced("write manifest", delay, fail, move || {
            std::fs::write(&manifest, "rung demo manifest\n")?;
            Ok(())
        }),
        paced("verify manifest", delay, fail, move || {
            let contents = std::fs::read_to_string(&manifest_to_verify)?;
            if contents.trim().is_empty() {
                return Err(StageError::action("manifest is empty"));
            }
            Ok(())
        }),
    ]
}
