// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal presenter: repaints the checklist in place
//!
//! Thin collaborator over stdout. Animated repaint only happens on an
//! interactive terminal; when stdout is a pipe the intermediate frames are
//! dropped and only the final frame is printed. Draw errors are ignored;
//! rendering is best effort and never affects the run.

use rung_core::Presenter;
use std::io::{self, IsTerminal, Write};

pub struct TermPresenter {
    interactive: bool,
    /// Height of the previous frame, for the cursor-up erase
    last_lines: usize,
}

impl TermPresenter {
    pub fn new() -> Self {
        let interactive = io::stdout().is_terminal();
        if interactive {
            // Hide the cursor for the duration of the run
            let mut out = io::stdout().lock();
            let _ = write!(out, "\x1b[?25l");
            let _ = out.flush();
        }
        Self {
            interactive,
            last_lines: 0,
        }
    }

    fn erase_previous(&self, out: &mut impl Write) {
        if self.last_lines > 0 {
            let _ = write!(out, "\x1b[{}A\x1b[J", self.last_lines);
        }
    }
}

impl Default for TermPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for TermPresenter {
    fn frame(&mut self, view: &str) {
        if !self.interactive {
            return;
        }
        let mut out = io::stdout().lock();
        self.erase_previous(&mut out);
        let _ = write!(out, "{}", view);
        let _ = out.flush();
        self.last_lines = view.lines().count();
    }

    fn finish(&mut self, view: &str) {
        let mut out = io::stdout().lock();
        if self.interactive {
            self.erase_previous(&mut out);
        }
        let _ = write!(out, "{}", view);
        let _ = out.flush();
        self.last_lines = 0;
    }
}

impl Drop for TermPresenter {
    fn drop(&mut self) {
        if self.interactive {
            let mut out = io::stdout().lock();
            let _ = write!(out, "\x1b[?25h");
            let _ = out.flush();
        }
    }
}
