// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rung - terminal stage runner

mod demo;
mod terminal;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rung_core::{Engine, Event, IdGen, UuidIdGen};
use rung_engine::{Controller, ControllerConfig, RunOutcome, RunReport, REPORT_FILE_NAME};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "rung",
    version,
    about = "rung - run staged work one rung at a time"
)]
struct Cli {
    /// Pacing delay each demo stage sleeps before its work, in milliseconds
    #[arg(long, default_value_t = 3000)]
    delay_ms: u64,

    /// Inject a failure into the named stage
    #[arg(long, value_name = "STAGE")]
    fail: Option<String>,

    /// Spinner animation period in milliseconds
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Run summary output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let root = std::env::current_dir()?;
    let stages = demo::demo_stages(&root, Duration::from_millis(cli.delay_ms), cli.fail.as_deref());

    let controller = Controller::new(
        Engine::new(stages),
        terminal::TermPresenter::new(),
        ControllerConfig {
            tick_interval: Duration::from_millis(cli.tick_ms),
            report_path: root.join(REPORT_FILE_NAME),
            run_id: UuidIdGen.next(),
        },
    );

    // Ctrl-c becomes an ordinary event, processed in arrival order like
    // everything else. Send failure means the loop already ended.
    let events = controller.events();
    ctrlc::set_handler(move || {
        let _ = events.try_send(Event::Interrupt);
    })?;

    let report = controller.run().await?;
    print_summary(&report, cli.format);

    if matches!(report.outcome, RunOutcome::Interrupted) {
        // The in-flight stage action is not cancellable; do not wait for it
        std::process::exit(0);
    }
    Ok(())
}

fn print_summary(report: &RunReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(report) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => match &report.outcome {
            RunOutcome::Succeeded => println!("All stages complete."),
            RunOutcome::Failed { stage, error } => {
                println!("Run halted at stage '{}': {}", stage, error);
                match (&report.failure_log, &report.log_error) {
                    (Some(path), _) => println!("Debug log written to {}", path.display()),
                    (None, Some(e)) => println!("Could not write debug log: {}", e),
                    _ => {}
                }
            }
            RunOutcome::Interrupted => println!("Interrupted."),
        },
    }
}
