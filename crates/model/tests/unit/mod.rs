//! Unit tests for the model components.

/// Setup-stage adoption ordering.
pub mod adoption;

/// Cancellation scheduling and the station cancel lifecycle.
pub mod cancellation;

/// Configuration parsing and validation.
pub mod config;


/// Randomized whole-model invariants.
pub mod properties;


/// Statistics counter consistency.
pub mod stats;
