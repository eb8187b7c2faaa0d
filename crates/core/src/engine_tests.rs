// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::StageError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn ok_stage(name: &str) -> Stage {
    Stage::new(name, || Ok(()))
}

fn failing_stage(name: &str, message: &str) -> Stage {
    let message = message.to_string();
    Stage::new(name, move || Err(StageError::action(message.clone())))
}

/// Drive the engine the way the controller does: run each job to its
/// outcome, record it, advance, repeat until a terminal state.
fn run_to_end(engine: &mut Engine) {
    let mut job = match engine.start() {
        Some(job) => job,
        None => return,
    };
    loop {
        let index = job.index();
        let outcome = job.run();
        engine.complete_current(index, &outcome);
        match engine.advance() {
            Progress::Next(next) => job = next,
            Progress::Succeeded | Progress::Failed => return,
        }
    }
}

#[test]
fn empty_stage_list_succeeds_immediately() {
    let mut engine = Engine::new(Vec::new());
    assert!(engine.start().is_none());
    assert_eq!(engine.status(), RunStatus::Succeeded);
}

#[test]
fn all_successful_stages_reach_succeeded() {
    let mut engine = Engine::new(vec![ok_stage("one"), ok_stage("two"), ok_stage("three")]);
    run_to_end(&mut engine);

    assert_eq!(engine.status(), RunStatus::Succeeded);
    assert_eq!(engine.cursor(), 2);
    for stage in engine.stages() {
        assert!(stage.is_complete());
        assert!(stage.error().is_none());
    }
}

#[test]
fn failure_halts_and_leaves_later_stages_untouched() {
    let ran_third = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&ran_third);
    let third = Stage::new("three", move || {
        counted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let mut engine = Engine::new(vec![ok_stage("one"), failing_stage("two", "boom"), third]);
    run_to_end(&mut engine);

    assert_eq!(engine.status(), RunStatus::Failed);
    assert!(engine.stages()[0].is_complete());
    assert_eq!(engine.stages()[1].error(), Some("boom"));
    assert!(!engine.stages()[1].is_complete());
    assert!(!engine.stages()[2].is_complete());
    assert!(engine.stages()[2].error().is_none());
    assert_eq!(ran_third.load(Ordering::SeqCst), 0);
}

#[test]
fn stages_execute_in_strict_list_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let stages = ["first", "second", "third"]
        .into_iter()
        .map(|name| {
            let order = Arc::clone(&order);
            Stage::new(name, move || {
                order.lock().unwrap().push(name);
                Ok(())
            })
        })
        .collect();

    let mut engine = Engine::new(stages);
    run_to_end(&mut engine);

    assert_eq!(*order.lock().unwrap(), ["first", "second", "third"]);
}

#[test]
fn skipped_stage_is_marked_complete_without_running() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let satisfied = Stage::new("workspace", move || {
        counted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
    .with_done_when(|| true);

    let mut engine = Engine::new(vec![ok_stage("one"), satisfied, ok_stage("three")]);
    run_to_end(&mut engine);

    assert_eq!(engine.status(), RunStatus::Succeeded);
    assert!(engine.stages()[1].is_complete());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn stale_outcome_for_wrong_index_is_dropped() {
    let mut engine = Engine::new(vec![ok_stage("one"), ok_stage("two")]);
    let job = engine.start().unwrap();
    assert_eq!(job.index(), 0);

    engine.complete_current(1, &StageOutcome::Completed);
    assert!(!engine.stages()[1].is_complete());
    assert!(!engine.stages()[0].is_complete());
}

#[test]
fn start_is_idempotent_once_running() {
    let mut engine = Engine::new(vec![ok_stage("one")]);
    assert!(engine.start().is_some());
    assert!(engine.start().is_none());
    assert_eq!(engine.status(), RunStatus::Running);
}

#[test]
fn failure_reports_the_failing_stage() {
    let mut engine = Engine::new(vec![ok_stage("one"), failing_stage("two", "no such host")]);
    run_to_end(&mut engine);

    let failing = engine.failure().unwrap();
    assert_eq!(failing.name(), "two");
    assert_eq!(failing.error(), Some("no such host"));
}
