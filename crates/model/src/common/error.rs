//! Fatal error definitions for the pipeline model.
//!
//! This module defines the error type shared by every component. It covers:
//! 1. **Internal consistency:** A stage asked to process a state its role does
//!    not handle — a programming error, never a recoverable condition.
//! 2. **Configuration:** Rejected values, unreadable files, and parse failures.
//!
//! Everything else (empty queues, no cancellations due, no free stations) is a
//! normal, silent no-op and never surfaces as an error.

use thiserror::Error;

/// Fatal model error.
///
/// A `ModelError` aborts the current cycle; the driver propagates it to the
/// caller rather than attempting recovery.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A state value reached a stage phase that does not handle it.
    ///
    /// The stage roles each handle a fixed set of states per phase; any other
    /// state arriving there means the model itself is inconsistent.
    #[error("stage `{stage}` cannot process state `{state}` in the {phase} phase")]
    InvalidState {
        /// Display name of the offending stage.
        stage: String,
        /// Label of the state that was not handled.
        state: &'static str,
        /// Which phase observed it (`"plan"` or `"commit"`).
        phase: &'static str,
    },

    /// A configuration value was out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
