//! Core model implementation.
//!
//! This module contains the instruction arena, the instruction source
//! (admission queue and cancellation schedule), and the stage network with
//! its two-phase per-cycle update.

/// Instruction identity and storage.
pub mod instruction;

/// The stage network (reservation stations, setup, loop, finish).
pub mod pipeline;

/// Instruction admission and cancellation scheduling.
pub mod source;

pub use self::instruction::{InstrId, Instruction, InstructionPool};
pub use self::pipeline::Pipeline;
pub use self::source::InstructionSource;
