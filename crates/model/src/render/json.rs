//! JSON snapshot renderer.
//!
//! Emits one JSON document per cycle — machine-readable counterpart of the
//! terminal table, suitable for piping into external tooling.

use std::io::Write;

use serde::Serialize;

use super::{Renderer, StageStatus};

#[derive(Debug, Serialize)]
struct StageSnapshot {
    name: String,
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    instruction: Option<String>,
}

#[derive(Debug, Serialize)]
struct CycleSnapshot<'a> {
    cycle: u64,
    stages: &'a [StageSnapshot],
}

/// Renders each cycle as one JSON line on a writer.
pub struct JsonRenderer<W: Write> {
    out: W,
    cycle: u64,
    stages: Vec<StageSnapshot>,
}

impl<W: Write> JsonRenderer<W> {
    /// Creates a renderer writing one JSON document per cycle.
    pub fn new(out: W) -> Self {
        Self {
            out,
            cycle: 0,
            stages: Vec::new(),
        }
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn cycle_start(&mut self, cycle: u64) {
        self.cycle = cycle;
        self.stages.clear();
    }

    fn stage(&mut self, status: &StageStatus<'_>) {
        self.stages.push(StageSnapshot {
            name: status.name.to_string(),
            state: status.state,
            instruction: status.occupant.clone(),
        });
    }

    fn cycle_end(&mut self) {
        let snapshot = CycleSnapshot {
            cycle: self.cycle,
            stages: &self.stages,
        };
        if serde_json::to_writer(&mut self.out, &snapshot).is_ok() {
            let _ = writeln!(self.out);
        }
    }
}

impl<W: Write> std::fmt::Debug for JsonRenderer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRenderer")
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}
