//! Shared test harness.

use loopsim_core::config::Config;
use loopsim_core::core::pipeline::{Stage, StageState};
use loopsim_core::render::NullRenderer;
use loopsim_core::sim::Simulator;

/// Builds a config with the given layout, cancellation probability, and seed.
pub fn config(stations: usize, loop_stages: usize, cancel_probability: f64, seed: u64) -> Config {
    let mut config = Config::default();
    config.pipeline.stations = stations;
    config.pipeline.loop_stages = loop_stages;
    config.source.cancel_probability = cancel_probability;
    config.source.seed = Some(seed);
    config
}

/// Builds a config with cancellation disabled (fully deterministic flow).
pub fn quiet_config(stations: usize) -> Config {
    config(stations, 3, 0.0, 1)
}

/// Simulator wrapper that runs silently and exposes inspection helpers.
pub struct TestSim {
    /// The wrapped simulator.
    pub sim: Simulator,
}

impl TestSim {
    /// Creates a simulator from a config, panicking on invalid config.
    pub fn new(config: &Config) -> Self {
        Self {
            sim: Simulator::new(config).expect("valid test config"),
        }
    }

    /// Ticks `cycles` times with a null renderer, panicking on model errors.
    pub fn run(&mut self, cycles: u64) {
        let mut renderer = NullRenderer;
        for _ in 0..cycles {
            self.sim.tick(&mut renderer).expect("tick");
        }
    }

    /// Committed state of reservation station `index`.
    pub fn station_state(&self, index: usize) -> StageState {
        self.sim
            .pipeline()
            .station(index)
            .expect("station exists")
            .state
    }

    /// Checks ownership consistency between stations and the arena:
    /// each instruction is held by at most one station, and the arena's
    /// back-references agree with the stations' held ids in both directions.
    pub fn assert_ownership_consistent(&self) {
        let pool = self.sim.source().pool();
        for station in self.sim.pipeline().stations() {
            if let Some(id) = station.instruction {
                assert_eq!(
                    pool.get(id).station,
                    Some(station.index),
                    "station {} holds an instruction whose back-reference disagrees",
                    station.index
                );
            }
        }
        for (id, instr) in pool.iter() {
            if let Some(index) = instr.station {
                let holder = self
                    .sim
                    .pipeline()
                    .station(index)
                    .unwrap_or_else(|| panic!("back-reference to missing station {index}"));
                assert_eq!(
                    holder.instruction,
                    Some(id),
                    "instruction {} back-references station {index}, which holds something else",
                    instr.label()
                );
            }
            let holders = self
                .sim
                .pipeline()
                .stations()
                .filter(|rs| rs.instruction == Some(id))
                .count();
            assert!(
                holders <= 1,
                "instruction {} held by {holders} stations",
                instr.label()
            );
        }
    }

    /// State of every stage, by display name (diagnostics).
    pub fn states(&self) -> Vec<(String, StageState)> {
        self.sim
            .pipeline()
            .stages()
            .iter()
            .map(|s: &Stage| (s.name().to_string(), s.state()))
            .collect()
    }
}
