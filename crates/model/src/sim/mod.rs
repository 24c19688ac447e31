//! Simulation driver.
//!
//! One discrete cycle advances the whole model as a single atomic step; the
//! pacing (timer, CLI loop) lives outside the core.

/// The per-cycle driver.
pub mod simulator;

pub use simulator::Simulator;
