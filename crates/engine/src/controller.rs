// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The controller: a single-consumer event loop driving the engine
//!
//! All messages (start, stage completions, spinner ticks, interrupts) are
//! processed strictly one at a time in arrival order. Stage actions run on a
//! blocking worker and complete by sending a `StageDone` event back into the
//! same channel, so the loop stays responsive while a stage blocks its
//! thread.

use crate::error::RuntimeError;
use crate::report::{self, FailureReport};
use rung_core::{
    render, AuditLog, Engine, Event, Presenter, Progress, RunStatus, Spinner, StageJob,
    StageOutcome, StageStatus,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Loop configuration
pub struct ControllerConfig {
    /// Spinner animation period
    pub tick_interval: Duration,
    /// Where the failure log is written on a failed run
    pub report_path: PathBuf,
    /// Identifier stamped on logs and the failure report
    pub run_id: String,
}

/// How the run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded,
    Failed { stage: String, error: String },
    Interrupted,
}

/// Per-stage line of the final summary
#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub name: String,
    pub status: StageStatus,
    pub error: Option<String>,
}

/// Everything the host needs to report the run after the loop exits
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub outcome: RunOutcome,
    pub stages: Vec<StageSummary>,
    /// Path of the failure log, when one was written
    pub failure_log: Option<PathBuf>,
    /// Set when the failure log could not be written; reported, never fatal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_error: Option<String>,
}

/// Drives one run to a terminal state
pub struct Controller<P: Presenter> {
    engine: Engine,
    audit: AuditLog,
    spinner: Spinner,
    presenter: P,
    config: ControllerConfig,
    events_tx: mpsc::Sender<Event>,
    events_rx: mpsc::Receiver<Event>,
}

impl<P: Presenter> Controller<P> {
    pub fn new(engine: Engine, presenter: P, config: ControllerConfig) -> Self {
        let (events_tx, events_rx) = mpsc::channel(64);
        Self {
            engine,
            audit: AuditLog::new(),
            spinner: Spinner::new(),
            presenter,
            config,
            events_tx,
            events_rx,
        }
    }

    /// Handle for injecting events from outside the loop (ctrl-c, tests)
    pub fn events(&self) -> mpsc::Sender<Event> {
        self.events_tx.clone()
    }

    /// Run to a terminal state, rendering after every processed event.
    pub async fn run(mut self) -> Result<RunReport, RuntimeError> {
        tracing::info!(
            run_id = %self.config.run_id,
            stages = self.engine.stages().len(),
            "run starting"
        );

        let mut ticker = tokio::time::interval(self.config.tick_interval);
        self.events_tx
            .send(Event::Start)
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;

        loop {
            let event = tokio::select! {
                // A queued stage completion must win over a tick that fired
                // while it waited; biased polling keeps arrival order.
                biased;
                event = self.events_rx.recv() => event.ok_or(RuntimeError::ChannelClosed)?,
                _ = ticker.tick() => Event::Tick,
            };

            match self.dispatch(event) {
                Some(report) => {
                    self.presenter.finish(&render(&self.engine, &self.spinner));
                    return Ok(report);
                }
                None => {
                    self.presenter.frame(&render(&self.engine, &self.spinner));
                }
            }
        }
    }

    /// Process one event. Returns the run report once a terminal state is
    /// reached.
    fn dispatch(&mut self, event: Event) -> Option<RunReport> {
        tracing::trace!(event = event.name(), "dispatch");
        match event {
            Event::Start => match self.engine.start() {
                Some(job) => {
                    self.spawn_stage(job);
                    None
                }
                // Empty stage list: nothing to do, the run already succeeded.
                // A duplicate start against a running engine is a no-op.
                None => match self.engine.status() {
                    RunStatus::Succeeded => {
                        tracing::info!("no stages to run");
                        Some(self.finish(RunOutcome::Succeeded))
                    }
                    _ => None,
                },
            },

            Event::StageDone { index, outcome } => {
                self.record_outcome(index, &outcome);
                self.engine.complete_current(index, &outcome);
                match self.engine.advance() {
                    Progress::Next(job) => {
                        self.spawn_stage(job);
                        None
                    }
                    Progress::Succeeded => {
                        tracing::info!("all stages complete");
                        Some(self.finish(RunOutcome::Succeeded))
                    }
                    Progress::Failed => Some(self.finish_failed()),
                }
            }

            Event::Tick => {
                self.spinner.advance();
                None
            }

            Event::Interrupt => {
                tracing::info!("interrupt received, ending run");
                Some(self.finish(RunOutcome::Interrupted))
            }
        }
    }

    /// Hand the job to a blocking worker; its outcome re-enters the loop as
    /// a `StageDone` event.
    fn spawn_stage(&mut self, job: StageJob) {
        let name = self.stage_name(job.index());
        self.audit.record(format!("starting stage: {}", name));
        tracing::info!(stage = %name, index = job.index(), "stage started");

        let events = self.events_tx.clone();
        tokio::task::spawn_blocking(move || {
            let index = job.index();
            let outcome = job.run();
            // Receiver only goes away when the loop already ended
            let _ = events.blocking_send(Event::StageDone { index, outcome });
        });
    }

    fn record_outcome(&mut self, index: usize, outcome: &StageOutcome) {
        let name = self.stage_name(index);
        match outcome {
            StageOutcome::Completed => {
                self.audit.record(format!("stage complete: {}", name));
                tracing::info!(stage = %name, "stage complete");
            }
            StageOutcome::Skipped => {
                self.audit
                    .record(format!("stage already satisfied, skipped: {}", name));
                tracing::info!(stage = %name, "stage skipped");
            }
            StageOutcome::Failed { error } => {
                self.audit.record(format!("stage failed: {}: {}", name, error));
                tracing::error!(stage = %name, error = %error, "stage failed");
            }
        }
    }

    fn stage_name(&self, index: usize) -> String {
        self.engine
            .stages()
            .get(index)
            .map(|s| s.name().to_string())
            .unwrap_or_default()
    }

    /// Terminal failure path: write the failure log exactly once, then build
    /// the report. A log-write failure is reported in the run report and
    /// never blocks termination.
    fn finish_failed(&mut self) -> RunReport {
        let (stage, error) = match self.engine.failure() {
            Some(s) => (
                s.name().to_string(),
                s.error().unwrap_or_default().to_string(),
            ),
            None => (String::new(), String::new()),
        };
        tracing::error!(stage = %stage, error = %error, "run halted");

        let failure = FailureReport {
            run_id: &self.config.run_id,
            stage: &stage,
            error: &error,
            audit: &self.audit,
        };
        let (failure_log, log_error) =
            match report::write_failure_report(&self.config.report_path, &failure) {
                Ok(()) => (Some(self.config.report_path.clone()), None),
                Err(e) => {
                    tracing::error!(error = %e, "could not write failure log");
                    (None, Some(e.to_string()))
                }
            };

        let mut report = self.finish(RunOutcome::Failed { stage, error });
        report.failure_log = failure_log;
        report.log_error = log_error;
        report
    }

    fn finish(&self, outcome: RunOutcome) -> RunReport {
        RunReport {
            run_id: self.config.run_id.clone(),
            outcome,
            stages: self
                .engine
                .stages()
                .iter()
                .map(|s| StageSummary {
                    name: s.name().to_string(),
                    status: s.status(),
                    error: s.error().map(str::to_string),
                })
                .collect(),
            failure_log: None,
            log_error: None,
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
