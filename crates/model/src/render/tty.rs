//! ANSI terminal renderer.
//!
//! Prints one row per stage per cycle with color-coded states: starting is
//! yellow, executing green, canceling red, finished blue, stalled gray.

use std::io::Write;

use ansi_term::Colour;

use super::{Renderer, StageStatus};

/// Renders cycle snapshots as a colored table on a writer.
pub struct TtyRenderer<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> TtyRenderer<W> {
    /// Creates a renderer writing colored output.
    pub fn new(out: W) -> Self {
        Self { out, color: true }
    }

    /// Creates a renderer writing plain output (no escape codes).
    pub fn plain(out: W) -> Self {
        Self { out, color: false }
    }

    fn paint(&self, state: &'static str) -> String {
        if !self.color {
            return state.to_string();
        }
        let colour = match state {
            "starting" => Some(Colour::Yellow),
            "executing" => Some(Colour::Green),
            "canceling" => Some(Colour::Red),
            "finished" => Some(Colour::Blue),
            "stalled" => Some(Colour::Fixed(245)),
            _ => None,
        };
        match colour {
            Some(c) => c.paint(state).to_string(),
            None => state.to_string(),
        }
    }
}

impl<W: Write> Renderer for TtyRenderer<W> {
    fn cycle_start(&mut self, cycle: u64) {
        let _ = writeln!(self.out, "-- cycle {cycle} --------------------------------");
    }

    fn stage(&mut self, status: &StageStatus<'_>) {
        let occupant = status.occupant.as_deref().unwrap_or("");
        let state = self.paint(status.state);
        let _ = writeln!(self.out, "{:<10} {:<22} {}", status.name, state, occupant);
    }

    fn cycle_end(&mut self) {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}

impl<W: Write> std::fmt::Debug for TtyRenderer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtyRenderer")
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}
