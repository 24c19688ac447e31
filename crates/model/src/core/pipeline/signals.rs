//! Cross-stage signals sampled once per cycle.
//!
//! The plan phase must be read-only with respect to committed state: every
//! cross-stage read (a station checking the setup or finish stage, setup
//! scanning for a `Starting` station) goes through this snapshot, captured
//! before any stage plans. This keeps the plan phase independent of stage
//! iteration order within a cycle.

use crate::core::instruction::InstrId;

/// Committed network state visible to every stage during the plan phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSignals {
    /// Instruction currently held by the setup stage.
    pub setup_instruction: Option<InstrId>,
    /// Instruction currently held by the finish stage.
    pub finish_instruction: Option<InstrId>,
    /// Lowest-indexed reservation station currently in `Starting`, with the
    /// instruction it holds.
    pub starting_station: Option<(usize, InstrId)>,
}
