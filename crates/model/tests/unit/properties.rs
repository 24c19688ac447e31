//! Randomized Whole-Model Invariants.
//!
//! Drives the full simulator over arbitrary seeds, layouts, and cancellation
//! probabilities and checks the properties that must hold on every cycle:
//! queue and schedule bounds, ownership consistency, monotonic strided
//! program counters, and counter sanity.

use proptest::prelude::*;

use loopsim_core::render::NullRenderer;

use crate::common::{TestSim, config};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn invariants_hold_on_every_cycle(
        seed in any::<u64>(),
        cycles in 1u64..120,
        stations in 1usize..8,
        loop_stages in 0usize..4,
        p in 0.0f64..=1.0,
    ) {
        let cfg = config(stations, loop_stages, p, seed);
        let mut ts = TestSim::new(&cfg);
        let mut renderer = NullRenderer;

        for _ in 0..cycles {
            ts.sim.tick(&mut renderer).expect("tick");

            // Admission queue bound.
            prop_assert!(ts.sim.source().queue().len() <= cfg.source.queue_capacity);
            // Delay slots never extend past the configured maximum.
            prop_assert!(ts.sim.source().schedule().len() <= cfg.source.cancel_delay_max + 1);
            // Ownership is single and bidirectionally consistent.
            ts.assert_ownership_consistent();
        }

        // Program counters are strided and monotonic.
        let pcs: Vec<u64> = ts.sim.source().pool().iter().map(|(_, i)| i.pc).collect();
        for (i, pc) in pcs.iter().enumerate() {
            prop_assert_eq!(*pc, cfg.source.start_pc + cfg.source.pc_stride * i as u64);
        }

        // Counter sanity.
        let stats = ts.sim.stats();
        prop_assert_eq!(stats.cycles, cycles);
        prop_assert!(stats.claims <= stats.instructions_admitted);
        prop_assert!(stats.cancellations_delivered <= stats.cancellations_scheduled);
        prop_assert!(stats.cancellations_scheduled <= stats.instructions_admitted);
        prop_assert!(stats.adoptions <= stats.claims);
    }

    #[test]
    fn canceled_stations_always_drain(
        seed in any::<u64>(),
        stations in 1usize..6,
    ) {
        // Under certain cancellation nothing can stay held forever except
        // the instruction the setup stage adopted.
        let mut cfg = config(stations, 2, 1.0, seed);
        cfg.source.cancel_delay_max = 3;
        let mut ts = TestSim::new(&cfg);
        ts.run(80);

        let stats = ts.sim.stats();
        prop_assert!(stats.releases_canceled > 0);
        prop_assert_eq!(stats.releases_finished, 0);
    }
}
