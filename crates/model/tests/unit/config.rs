//! Configuration Tests.
//!
//! Validation happens at simulator construction: out-of-range values are
//! rejected with a `ModelError::Config` before any cycle runs.

use loopsim_core::{Config, ModelError, Simulator};

#[test]
fn default_config_builds_a_simulator() {
    assert!(Simulator::new(&Config::default()).is_ok());
}

#[test]
fn zero_stations_is_rejected() {
    let mut config = Config::default();
    config.pipeline.stations = 0;
    assert!(matches!(
        Simulator::new(&config),
        Err(ModelError::Config(_))
    ));
}

#[test]
fn probability_above_one_is_rejected() {
    let mut config = Config::default();
    config.source.cancel_probability = 1.01;
    assert!(matches!(
        Simulator::new(&config),
        Err(ModelError::Config(_))
    ));
}

#[test]
fn zero_delay_bound_is_rejected() {
    let mut config = Config::default();
    config.source.cancel_delay_max = 0;
    assert!(matches!(
        Simulator::new(&config),
        Err(ModelError::Config(_))
    ));
}

#[test]
fn json_overrides_compose_with_defaults() {
    let config: Config = serde_json::from_str(
        r#"{
            "pipeline": { "loop_stages": 5 },
            "source": { "start_pc": 8192, "seed": 3 }
        }"#,
    )
    .expect("valid config");
    assert_eq!(config.pipeline.stations, 7);
    assert_eq!(config.pipeline.loop_stages, 5);
    assert_eq!(config.source.start_pc, 8192);
    assert_eq!(config.source.seed, Some(3));
    assert!(config.validate().is_ok());
}
