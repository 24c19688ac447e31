//! Stage roles and their per-cycle state machines.
//!
//! Every stage holds at most one in-flight instruction and a current/next
//! state pair, and advances once per cycle in two phases:
//! 1. **Plan:** compute `next_state` from the committed state of the network
//!    (cross-stage reads go through the [`CycleSignals`] snapshot) without
//!    mutating anything shared.
//! 2. **Commit:** apply `state = next_state` and perform ownership side
//!    effects (queue claims, instruction releases).
//!
//! Roles are a tagged sum type dispatched in [`Stage::plan`] /
//! [`Stage::commit`]; each variant carries only the fields its role needs.

use std::fmt;

use tracing::trace;

use crate::common::ModelError;
use crate::core::instruction::{InstrId, InstructionPool};
use crate::core::pipeline::signals::CycleSignals;
use crate::core::source::AdmissionQueue;
use crate::stats::SimStats;

/// Discrete stage state.
///
/// Not every variant is reachable for every role: `Stalled` is declared but
/// never entered, and the loop/finish stages never progress past `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageState {
    /// No instruction held.
    Empty,
    /// Holding an admitted instruction, waiting for the setup stage.
    Starting,
    /// The held instruction is being executed downstream.
    Executing,
    /// The held instruction was canceled; release is imminent.
    Canceling,
    /// The held instruction completed; release is imminent.
    Finished,
    /// Declared but never entered.
    Stalled,
}

impl StageState {
    /// Stable lowercase display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Starting => "starting",
            Self::Executing => "executing",
            Self::Canceling => "canceling",
            Self::Finished => "finished",
            Self::Stalled => "stalled",
        }
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stage buffering one admitted instruction until downstream capacity
/// frees up, execution completes, or cancellation preempts it.
#[derive(Debug)]
pub struct ReservationStation {
    /// Display name (`rs0`, `rs1`, ...).
    pub name: String,
    /// Position in station iteration order; lowest index wins adoption ties.
    pub index: usize,
    /// Committed state.
    pub state: StageState,
    /// State planned for the next commit.
    pub next_state: StageState,
    /// Held instruction, if any.
    pub instruction: Option<InstrId>,
}

impl ReservationStation {
    /// Creates an empty station at the given index.
    pub fn new(index: usize) -> Self {
        Self {
            name: format!("rs{index}"),
            index,
            state: StageState::Empty,
            next_state: StageState::Empty,
            instruction: None,
        }
    }

    fn invalid(&self, phase: &'static str) -> ModelError {
        ModelError::InvalidState {
            stage: self.name.clone(),
            state: self.state.label(),
            phase,
        }
    }

    /// Plan phase: next state from the committed network state.
    pub fn plan(
        &mut self,
        signals: &CycleSignals,
        pool: &InstructionPool,
    ) -> Result<(), ModelError> {
        self.next_state = self.state;
        match self.state {
            StageState::Empty => {}
            StageState::Starting => {
                if let Some(id) = self.instruction {
                    if pool.get(id).canceled {
                        self.next_state = StageState::Canceling;
                    } else if signals.setup_instruction == Some(id) {
                        self.next_state = StageState::Executing;
                    }
                }
            }
            StageState::Executing => {
                if let Some(id) = self.instruction {
                    if pool.get(id).canceled {
                        self.next_state = StageState::Canceling;
                    } else if signals.finish_instruction == Some(id) {
                        self.next_state = StageState::Finished;
                    }
                }
            }
            StageState::Canceling | StageState::Finished => {
                self.next_state = StageState::Empty;
            }
            StageState::Stalled => return Err(self.invalid("plan")),
        }
        Ok(())
    }

    /// Commit phase: apply the planned state and perform ownership changes.
    pub fn commit(
        &mut self,
        queue: &mut AdmissionQueue,
        pool: &mut InstructionPool,
        stats: &mut SimStats,
    ) -> Result<(), ModelError> {
        match self.state {
            StageState::Empty => {
                if let Some(id) = queue.claim_head() {
                    pool.get_mut(id).station = Some(self.index);
                    self.instruction = Some(id);
                    self.state = StageState::Starting;
                    stats.claims += 1;
                    trace!(station = self.index, pc = pool.get(id).pc, "station claimed head");
                }
            }
            StageState::Starting | StageState::Executing => {
                self.state = self.next_state;
            }
            StageState::Canceling | StageState::Finished => {
                if self.state == StageState::Canceling {
                    stats.releases_canceled += 1;
                } else {
                    stats.releases_finished += 1;
                }
                if let Some(id) = self.instruction.take() {
                    pool.get_mut(id).station = None;
                    trace!(station = self.index, pc = pool.get(id).pc, "station released");
                }
                self.state = StageState::Empty;
            }
            StageState::Stalled => return Err(self.invalid("commit")),
        }
        Ok(())
    }
}

/// The stage that selects one `Starting` reservation station per admission
/// and begins executing its instruction.
///
/// Execution never completes: the handoff into the loop chain was never
/// defined, so a setup stage that reaches `Executing` stays there.
#[derive(Debug)]
pub struct SetupStage {
    /// Display name.
    pub name: String,
    /// Committed state.
    pub state: StageState,
    /// State planned for the next commit.
    pub next_state: StageState,
    /// Held instruction, if any.
    pub instruction: Option<InstrId>,
    /// Instruction planned for the next commit.
    pub next_instruction: Option<InstrId>,
}

impl SetupStage {
    /// Creates an empty setup stage.
    pub fn new() -> Self {
        Self {
            name: "setup".to_string(),
            state: StageState::Empty,
            next_state: StageState::Empty,
            instruction: None,
            next_instruction: None,
        }
    }

    fn invalid(&self, phase: &'static str) -> ModelError {
        ModelError::InvalidState {
            stage: self.name.clone(),
            state: self.state.label(),
            phase,
        }
    }

    /// Plan phase: adopt the lowest-indexed `Starting` station when empty.
    pub fn plan(&mut self, signals: &CycleSignals) -> Result<(), ModelError> {
        self.next_state = self.state;
        self.next_instruction = self.instruction;
        match self.state {
            StageState::Empty => {
                if let Some((_, id)) = signals.starting_station {
                    self.next_instruction = Some(id);
                    self.next_state = StageState::Executing;
                }
            }
            StageState::Executing => {}
            StageState::Canceling => {
                self.next_state = StageState::Empty;
                self.next_instruction = None;
            }
            StageState::Starting | StageState::Finished | StageState::Stalled => {
                return Err(self.invalid("plan"));
            }
        }
        Ok(())
    }

    /// Commit phase: apply the planned state and instruction.
    pub fn commit(&mut self, pool: &InstructionPool, stats: &mut SimStats) -> Result<(), ModelError> {
        match self.state {
            StageState::Empty | StageState::Executing | StageState::Canceling => {
                if self.state == StageState::Empty && self.next_state == StageState::Executing {
                    stats.adoptions += 1;
                    if let Some(id) = self.next_instruction {
                        trace!(pc = pool.get(id).pc, "setup adopted instruction");
                    }
                }
                self.state = self.next_state;
                self.instruction = self.next_instruction;
            }
            StageState::Stalled => {}
            StageState::Starting | StageState::Finished => {
                return Err(self.invalid("commit"));
            }
        }
        Ok(())
    }
}

impl Default for SetupStage {
    fn default() -> Self {
        Self::new()
    }
}

/// A loop-chain stage (header, compute, footer).
///
/// Declared with state and next-instruction fields, but its transition rules
/// were never defined: both phases are no-ops and the stage stays `Empty`.
#[derive(Debug)]
pub struct LoopStage {
    /// Display name (`loop hdr`, `compute0`, ..., `loop ftr`).
    pub name: String,
    /// Committed state.
    pub state: StageState,
    /// State planned for the next commit.
    pub next_state: StageState,
    /// Held instruction, if any.
    pub instruction: Option<InstrId>,
    /// Instruction planned for the next commit.
    pub next_instruction: Option<InstrId>,
}

impl LoopStage {
    /// Creates an empty loop-chain stage with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: StageState::Empty,
            next_state: StageState::Empty,
            instruction: None,
            next_instruction: None,
        }
    }
}

/// The completion stage.
///
/// Like the loop-chain stages its transition rules were never defined; it is
/// read by the reservation stations (the completion cross-read) but never
/// holds an instruction itself.
#[derive(Debug)]
pub struct FinishStage {
    /// Display name.
    pub name: String,
    /// Committed state.
    pub state: StageState,
    /// State planned for the next commit.
    pub next_state: StageState,
    /// Held instruction, if any.
    pub instruction: Option<InstrId>,
    /// Instruction planned for the next commit.
    pub next_instruction: Option<InstrId>,
}

impl FinishStage {
    /// Creates an empty finish stage.
    pub fn new() -> Self {
        Self {
            name: "finish".to_string(),
            state: StageState::Empty,
            next_state: StageState::Empty,
            instruction: None,
            next_instruction: None,
        }
    }
}

impl Default for FinishStage {
    fn default() -> Self {
        Self::new()
    }
}

/// Tagged stage role.
#[derive(Debug)]
pub enum Stage {
    /// Reservation station buffering one admitted instruction.
    Reservation(ReservationStation),
    /// Setup stage feeding the loop chain.
    Setup(SetupStage),
    /// Loop header.
    LoopHeader(LoopStage),
    /// Compute stage inside the loop body.
    Compute(LoopStage),
    /// Loop footer.
    LoopFooter(LoopStage),
    /// Completion stage.
    Finish(FinishStage),
}

impl Stage {
    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Reservation(s) => &s.name,
            Self::Setup(s) => &s.name,
            Self::LoopHeader(s) | Self::Compute(s) | Self::LoopFooter(s) => &s.name,
            Self::Finish(s) => &s.name,
        }
    }

    /// Committed state.
    pub fn state(&self) -> StageState {
        match self {
            Self::Reservation(s) => s.state,
            Self::Setup(s) => s.state,
            Self::LoopHeader(s) | Self::Compute(s) | Self::LoopFooter(s) => s.state,
            Self::Finish(s) => s.state,
        }
    }

    /// Held instruction, if any.
    pub fn instruction(&self) -> Option<InstrId> {
        match self {
            Self::Reservation(s) => s.instruction,
            Self::Setup(s) => s.instruction,
            Self::LoopHeader(s) | Self::Compute(s) | Self::LoopFooter(s) => s.instruction,
            Self::Finish(s) => s.instruction,
        }
    }

    /// Plan phase dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidState`] if this stage's role does not
    /// handle its current state in the plan phase.
    pub fn plan(
        &mut self,
        signals: &CycleSignals,
        pool: &InstructionPool,
    ) -> Result<(), ModelError> {
        match self {
            Self::Reservation(s) => s.plan(signals, pool),
            Self::Setup(s) => s.plan(signals),
            // Transition rules for the loop chain and finish were never
            // defined; they stay Empty.
            Self::LoopHeader(_) | Self::Compute(_) | Self::LoopFooter(_) | Self::Finish(_) => {
                Ok(())
            }
        }
    }

    /// Commit phase dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidState`] if this stage's role does not
    /// handle its current state in the commit phase.
    pub fn commit(
        &mut self,
        queue: &mut AdmissionQueue,
        pool: &mut InstructionPool,
        stats: &mut SimStats,
    ) -> Result<(), ModelError> {
        match self {
            Self::Reservation(s) => s.commit(queue, pool, stats),
            Self::Setup(s) => s.commit(pool, stats),
            Self::LoopHeader(_) | Self::Compute(_) | Self::LoopFooter(_) | Self::Finish(_) => {
                Ok(())
            }
        }
    }
}
