//! Configuration system for the pipeline model.
//!
//! This module defines all configuration structures used to parameterize the
//! model. It provides:
//! 1. **Defaults:** Baseline constants (station count, loop depth, admission
//!    queue capacity, cancellation behavior).
//! 2. **Structures:** Hierarchical config for the stage network and the
//!    instruction source.
//!
//! Configuration is supplied as JSON (see [`Config::from_json_file`]) or use
//! `Config::default()` for the CLI.

use serde::Deserialize;

use crate::common::ModelError;

/// Default configuration constants for the model.
///
/// These values define the baseline pipeline layout and are used when not
/// explicitly overridden.
mod defaults {
    /// Number of reservation stations feeding the setup stage.
    pub const STATION_COUNT: usize = 7;

    /// Number of compute stages between the loop header and footer.
    pub const LOOP_STAGE_COUNT: usize = 3;

    /// Maximum number of pending instructions in the admission queue.
    ///
    /// Admission pauses while the queue is at capacity and resumes as soon
    /// as a slot frees up.
    pub const QUEUE_CAPACITY: usize = 10;

    /// Probability that a freshly admitted instruction is scheduled for
    /// cancellation.
    pub const CANCEL_PROBABILITY: f64 = 0.4;

    /// Upper bound (inclusive) on the cancellation delay, in schedule slots.
    ///
    /// A scheduled cancellation fires between 1 and this many slots after
    /// admission.
    pub const CANCEL_DELAY_MAX: usize = 10;

    /// Program counter of the first synthesized instruction.
    pub const START_PC: u64 = 0x1000;

    /// Program counter increment between consecutive instructions.
    pub const PC_STRIDE: u64 = 4;
}

/// Root configuration structure containing all model settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use loopsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.pipeline.stations, 7);
/// assert_eq!(config.source.queue_capacity, 10);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use loopsim_core::config::Config;
///
/// let json = r#"{
///     "pipeline": { "stations": 2, "loop_stages": 1 },
///     "source": { "cancel_probability": 0.0, "seed": 7 }
/// }"#;
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.pipeline.stations, 2);
/// assert_eq!(config.source.seed, Some(7));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Stage network layout.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Instruction admission and cancellation behavior.
    #[serde(default)]
    pub source: SourceConfig,
}

/// Stage network layout configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of reservation stations.
    #[serde(default = "PipelineConfig::default_stations")]
    pub stations: usize,

    /// Number of compute stages inside the loop body.
    #[serde(default = "PipelineConfig::default_loop_stages")]
    pub loop_stages: usize,
}

impl PipelineConfig {
    fn default_stations() -> usize {
        defaults::STATION_COUNT
    }

    fn default_loop_stages() -> usize {
        defaults::LOOP_STAGE_COUNT
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stations: Self::default_stations(),
            loop_stages: Self::default_loop_stages(),
        }
    }
}

/// Instruction source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Admission queue capacity.
    #[serde(default = "SourceConfig::default_queue_capacity")]
    pub queue_capacity: usize,

    /// Probability in `[0, 1]` of scheduling a cancellation at admission.
    #[serde(default = "SourceConfig::default_cancel_probability")]
    pub cancel_probability: f64,

    /// Inclusive upper bound on the cancellation delay, in slots.
    #[serde(default = "SourceConfig::default_cancel_delay_max")]
    pub cancel_delay_max: usize,

    /// Program counter of the first instruction.
    #[serde(default = "SourceConfig::default_start_pc")]
    pub start_pc: u64,

    /// Program counter stride between instructions.
    #[serde(default = "SourceConfig::default_pc_stride")]
    pub pc_stride: u64,

    /// RNG seed for cancellation scheduling; `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SourceConfig {
    fn default_queue_capacity() -> usize {
        defaults::QUEUE_CAPACITY
    }

    fn default_cancel_probability() -> f64 {
        defaults::CANCEL_PROBABILITY
    }

    fn default_cancel_delay_max() -> usize {
        defaults::CANCEL_DELAY_MAX
    }

    fn default_start_pc() -> u64 {
        defaults::START_PC
    }

    fn default_pc_stride() -> u64 {
        defaults::PC_STRIDE
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            queue_capacity: Self::default_queue_capacity(),
            cancel_probability: Self::default_cancel_probability(),
            cancel_delay_max: Self::default_cancel_delay_max(),
            start_pc: Self::default_start_pc(),
            pc_stride: Self::default_pc_stride(),
            seed: None,
        }
    }
}

impl Config {
    /// Loads a configuration from a JSON file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] if the file cannot be read,
    /// [`ModelError::Parse`] if it is not valid JSON, or
    /// [`ModelError::Config`] if a value is out of range.
    pub fn from_json_file(path: &str) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.pipeline.stations == 0 {
            return Err(ModelError::Config(
                "pipeline.stations must be at least 1".into(),
            ));
        }
        if self.source.queue_capacity == 0 {
            return Err(ModelError::Config(
                "source.queue_capacity must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.source.cancel_probability) {
            return Err(ModelError::Config(format!(
                "source.cancel_probability must lie in [0, 1], got {}",
                self.source.cancel_probability
            )));
        }
        if self.source.cancel_delay_max == 0 {
            return Err(ModelError::Config(
                "source.cancel_delay_max must be at least 1".into(),
            ));
        }
        if self.source.pc_stride == 0 {
            return Err(ModelError::Config(
                "source.pc_stride must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
