//! Simulator: owns the instruction source and the stage network side-by-side.
//!
//! Per cycle, in strict order: admit new instructions, deliver scheduled
//! cancellations, plan every stage, commit every stage in the fixed global
//! order, compact the admission queue head, and push every stage's
//! presentational state to the renderer. Single-threaded and cooperative: a
//! cycle runs to completion before the next one starts, and no stage logic
//! ever suspends mid-cycle.

use tracing::debug;

use crate::common::ModelError;
use crate::config::Config;
use crate::core::pipeline::Pipeline;
use crate::core::source::InstructionSource;
use crate::render::{Renderer, StageStatus};
use crate::stats::SimStats;

/// Top-level simulator: instruction source plus stage network.
#[derive(Debug)]
pub struct Simulator {
    source: InstructionSource,
    pipeline: Pipeline,
    stats: SimStats,
    cycle: u64,
}

impl Simulator {
    /// Creates a simulator from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] if a configuration value is out of
    /// range.
    pub fn new(config: &Config) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self {
            source: InstructionSource::new(&config.source),
            pipeline: Pipeline::new(&config.pipeline),
            stats: SimStats::default(),
            cycle: 0,
        })
    }

    /// Advances the model by one cycle and reports stage status to the
    /// renderer.
    ///
    /// # Errors
    ///
    /// Propagates [`ModelError::InvalidState`] from a stage phase; the cycle
    /// is aborted and the model should be considered inconsistent.
    pub fn tick(&mut self, renderer: &mut dyn Renderer) -> Result<(), ModelError> {
        self.cycle += 1;
        debug!(cycle = self.cycle, "tick");

        self.source.admit(&mut self.stats);
        self.source.deliver_cancellations(&mut self.stats);

        let signals = self.pipeline.capture_signals();
        self.pipeline.plan(&signals, self.source.pool())?;
        {
            let (queue, pool) = self.source.admission_mut();
            self.pipeline.commit(queue, pool, &mut self.stats)?;
        }
        self.source.compact_queue();

        self.stats.cycles += 1;
        self.refresh(renderer);
        Ok(())
    }

    /// Runs `cycles` consecutive ticks.
    ///
    /// # Errors
    ///
    /// Stops at the first failing tick and propagates its error.
    pub fn run(&mut self, cycles: u64, renderer: &mut dyn Renderer) -> Result<(), ModelError> {
        for _ in 0..cycles {
            self.tick(renderer)?;
        }
        Ok(())
    }

    /// Pushes every stage's name, state label, and occupant label into the
    /// renderer.
    fn refresh(&self, renderer: &mut dyn Renderer) {
        renderer.cycle_start(self.cycle);
        for stage in self.pipeline.stages() {
            let occupant = stage
                .instruction()
                .map(|id| self.source.pool().get(id).label());
            renderer.stage(&StageStatus {
                name: stage.name(),
                state: stage.state().label(),
                occupant,
            });
        }
        renderer.cycle_end();
    }

    /// Cycles elapsed so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Read access to the stage network.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Mutable access to the stage network (state injection in tests and
    /// tooling).
    pub fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }

    /// Read access to the instruction source.
    pub fn source(&self) -> &InstructionSource {
        &self.source
    }

    /// Statistics collected so far.
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }
}
