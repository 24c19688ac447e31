//! Setup Adoption Ordering Tests.
//!
//! The setup stage scans reservation stations in index order and adopts the
//! first one in `Starting`; a lower-indexed station always wins over a
//! higher-indexed one, even when several qualify in the same cycle.

use loopsim_core::core::pipeline::{Stage, StageState};

use crate::common::{TestSim, quiet_config};

#[test]
fn setup_adopts_the_earliest_claimer() {
    let mut ts = TestSim::new(&quiet_config(2));

    // rs0 claims 0x1000 in cycle 1, setup adopts it in cycle 2 while rs1
    // claims 0x1004.
    ts.run(2);
    let setup = ts.sim.pipeline().setup().unwrap();
    assert_eq!(setup.state, StageState::Executing);
    let adopted = setup.instruction.unwrap();
    assert_eq!(ts.sim.source().pool().get(adopted).pc, 0x1000);

    // With setup occupied forever, rs1 never leaves Starting.
    ts.run(20);
    assert_eq!(ts.station_state(0), StageState::Executing);
    assert_eq!(ts.station_state(1), StageState::Starting);
}

#[test]
fn lowest_index_wins_when_several_stations_are_starting() {
    let mut ts = TestSim::new(&quiet_config(4));

    // After two cycles rs0 and rs1 are both Starting (rs0 since cycle 1,
    // rs1 since cycle 2) and setup has adopted rs0's instruction.
    ts.run(2);
    assert_eq!(ts.station_state(0), StageState::Starting);
    assert_eq!(ts.station_state(1), StageState::Starting);

    // Force setup back to empty so it must choose again between the two
    // Starting stations.
    for stage in &mut ts.sim.pipeline_mut().stages {
        if let Stage::Setup(setup) = stage {
            setup.state = StageState::Empty;
            setup.next_state = StageState::Empty;
            setup.instruction = None;
            setup.next_instruction = None;
        }
    }

    let rs0_held = ts.sim.pipeline().station(0).unwrap().instruction;
    let rs1_held = ts.sim.pipeline().station(1).unwrap().instruction;
    assert!(rs0_held.is_some() && rs1_held.is_some());

    ts.run(1);
    let setup = ts.sim.pipeline().setup().unwrap();
    assert_eq!(setup.state, StageState::Executing);
    assert_eq!(setup.instruction, rs0_held);
    assert_ne!(setup.instruction, rs1_held);
}
