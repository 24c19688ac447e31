//! The stage network.
//!
//! A fixed topology built from configuration: N reservation stations feeding
//! one setup stage, feeding a linear loop chain (header, compute stages,
//! footer), feeding a finish stage, with a feedback edge from finish back to
//! every station. The network advances once per cycle in two phases — plan
//! for every stage, then commit for every stage in a fixed order — so that
//! cross-stage reads never race with state changes inside one cycle.

/// Cross-stage signal snapshot.
pub mod signals;

/// Stage roles and state machines.
pub mod stage;

use crate::common::ModelError;
use crate::config::PipelineConfig;
use crate::core::instruction::InstructionPool;
use crate::core::source::AdmissionQueue;
use crate::stats::SimStats;

pub use self::signals::CycleSignals;
pub use self::stage::{
    FinishStage, LoopStage, ReservationStation, SetupStage, Stage, StageState,
};

/// The fixed stage network.
#[derive(Debug)]
pub struct Pipeline {
    /// All stages in plan/commit order: reservation stations (by index),
    /// setup, loop header, compute stages, loop footer, finish.
    pub stages: Vec<Stage>,
    edges: Vec<(String, String)>,
}

impl Pipeline {
    /// Builds the network from configuration.
    pub fn new(config: &PipelineConfig) -> Self {
        let mut stages = Vec::with_capacity(config.stations + config.loop_stages + 4);
        for i in 0..config.stations {
            stages.push(Stage::Reservation(ReservationStation::new(i)));
        }
        stages.push(Stage::Setup(SetupStage::new()));
        stages.push(Stage::LoopHeader(LoopStage::new("loop hdr")));
        for i in 0..config.loop_stages {
            stages.push(Stage::Compute(LoopStage::new(format!("compute{i}"))));
        }
        stages.push(Stage::LoopFooter(LoopStage::new("loop ftr")));
        stages.push(Stage::Finish(FinishStage::new()));

        let edges = Self::build_edges(config);
        Self { stages, edges }
    }

    /// Connection list in `(from, to)` stage-name pairs, including the
    /// footer-to-header loop edge and the finish-to-station feedback edges.
    ///
    /// Geometry and styling are a renderer concern; the core only names the
    /// endpoints.
    fn build_edges(config: &PipelineConfig) -> Vec<(String, String)> {
        let mut edges = Vec::new();
        for i in 0..config.stations {
            edges.push((format!("rs{i}"), "setup".to_string()));
        }
        edges.push(("setup".to_string(), "loop hdr".to_string()));
        let mut prev = "loop hdr".to_string();
        for i in 0..config.loop_stages {
            let name = format!("compute{i}");
            edges.push((prev, name.clone()));
            prev = name;
        }
        edges.push((prev, "loop ftr".to_string()));
        edges.push(("loop ftr".to_string(), "loop hdr".to_string()));
        edges.push(("loop ftr".to_string(), "finish".to_string()));
        for i in 0..config.stations {
            edges.push(("finish".to_string(), format!("rs{i}")));
        }
        edges
    }

    /// All stages in plan/commit order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The connection list.
    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    /// Iterates over the reservation stations in index order.
    pub fn stations(&self) -> impl Iterator<Item = &ReservationStation> {
        self.stages.iter().filter_map(|s| match s {
            Stage::Reservation(rs) => Some(rs),
            _ => None,
        })
    }

    /// The reservation station at `index`, if it exists.
    pub fn station(&self, index: usize) -> Option<&ReservationStation> {
        self.stations().nth(index)
    }

    /// The setup stage.
    pub fn setup(&self) -> Option<&SetupStage> {
        self.stages.iter().find_map(|s| match s {
            Stage::Setup(setup) => Some(setup),
            _ => None,
        })
    }

    /// The finish stage.
    pub fn finish(&self) -> Option<&FinishStage> {
        self.stages.iter().find_map(|s| match s {
            Stage::Finish(finish) => Some(finish),
            _ => None,
        })
    }

    /// Samples the cross-stage signals from committed state.
    ///
    /// Must run before any stage plans; the snapshot is what makes the plan
    /// phase read-only.
    pub fn capture_signals(&self) -> CycleSignals {
        let mut signals = CycleSignals::default();
        for stage in &self.stages {
            match stage {
                Stage::Reservation(rs) => {
                    if signals.starting_station.is_none()
                        && rs.state == StageState::Starting
                    {
                        if let Some(id) = rs.instruction {
                            signals.starting_station = Some((rs.index, id));
                        }
                    }
                }
                Stage::Setup(setup) => signals.setup_instruction = setup.instruction,
                Stage::Finish(finish) => signals.finish_instruction = finish.instruction,
                _ => {}
            }
        }
        signals
    }

    /// Plan phase for every stage.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ModelError::InvalidState`] a stage reports.
    pub fn plan(
        &mut self,
        signals: &CycleSignals,
        pool: &InstructionPool,
    ) -> Result<(), ModelError> {
        for stage in &mut self.stages {
            stage.plan(signals, pool)?;
        }
        Ok(())
    }

    /// Commit phase for every stage, in the fixed global order.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ModelError::InvalidState`] a stage reports.
    pub fn commit(
        &mut self,
        queue: &mut AdmissionQueue,
        pool: &mut InstructionPool,
        stats: &mut SimStats,
    ) -> Result<(), ModelError> {
        for stage in &mut self.stages {
            stage.commit(queue, pool, stats)?;
        }
        Ok(())
    }
}
