// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure checklist/spinner view and the presenter boundary

use crate::engine::Engine;
use crate::stage::StageStatus;
use std::sync::{Arc, Mutex};

const GLYPH_FAILED: &str = "✗";
const GLYPH_COMPLETE: &str = "✓";
const GLYPH_PENDING: &str = "◻";

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Animation phase for in-flight stages. Advanced only by tick events.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    phase: usize,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) {
        self.phase = (self.phase + 1) % SPINNER_FRAMES.len();
    }

    pub fn frame(&self) -> &'static str {
        SPINNER_FRAMES[self.phase]
    }
}

/// Render the current run state as a frame of text.
///
/// Pure: no hidden state, safe to call after every event. Pending stages get
/// the spinner frame; resolved stages get a blank placeholder.
pub fn render(engine: &Engine, spinner: &Spinner) -> String {
    let mut out = String::new();
    if let Some(stage) = engine.current_stage() {
        out.push_str(&format!("Current stage: {}\n", stage.name()));
    }
    for stage in engine.stages() {
        let (glyph, spin) = match stage.status() {
            StageStatus::Failed => (GLYPH_FAILED, " "),
            StageStatus::Complete => (GLYPH_COMPLETE, " "),
            StageStatus::Pending => (GLYPH_PENDING, spinner.frame()),
        };
        out.push_str(&format!(" {} {} {}\n", glyph, spin, stage.name()));
    }
    out
}

/// The rendering boundary: consumes one text blob per frame, draws it
/// however the host wants.
pub trait Presenter {
    /// Draw an intermediate frame, replacing the previous one
    fn frame(&mut self, view: &str);

    /// Draw the final frame once the run has resolved
    fn finish(&mut self, view: &str);
}

/// Recording presenter for tests
#[derive(Clone, Default)]
pub struct FakePresenter {
    frames: Arc<Mutex<Vec<String>>>,
    final_frame: Arc<Mutex<Option<String>>>,
}

impl FakePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All intermediate frames presented so far
    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The final frame, if the run has resolved
    pub fn final_frame(&self) -> Option<String> {
        self.final_frame
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Presenter for FakePresenter {
    fn frame(&mut self, view: &str) {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(view.to_string());
    }

    fn finish(&mut self, view: &str) {
        *self.final_frame.lock().unwrap_or_else(|e| e.into_inner()) = Some(view.to_string());
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
