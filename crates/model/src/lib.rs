//! Pipeline loop-execution model library.
//!
//! This crate implements a cycle-accurate model of a looping execution pipeline
//! with the following:
//! 1. **Core:** Instruction arena, admission/cancellation source, and the stage
//!    network (reservation stations, setup, loop header/footer, compute, finish).
//! 2. **Simulation:** The per-cycle driver with its two-phase (plan, commit)
//!    stage update discipline.
//! 3. **Rendering:** An opaque status-sink boundary with terminal, JSON, and
//!    null implementations.
//! 4. **Configuration:** Defaults and JSON-deserializable hierarchical config.
//! 5. **Statistics:** Per-run counters and reporting.

/// Common types (error definitions).
pub mod common;
/// Model configuration (defaults, hierarchical config structures).
pub mod config;
/// Core model (instructions, instruction source, stage network).
pub mod core;
/// Status-sink renderers (terminal, JSON, null).
pub mod render;
/// The per-cycle simulation driver.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Fatal model error type.
pub use crate::common::ModelError;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
