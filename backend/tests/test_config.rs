//! Tests for configuration loading and validation

use bank_simulator_core_rs::config::config_fingerprint;
use bank_simulator_core_rs::{ArrivalSourceConfig, ConfigError, SimulationConfig, SimulationEngine};
use std::path::PathBuf;

#[test]
fn test_from_json_with_defaults() {
    let json = r#"{
        "simulation_horizon": 500,
        "max_transaction_time": 20,
        "arrival_probability_percent": 60,
        "teller_count": 4,
        "customer_queue_limit": 8
    }"#;

    let config = SimulationConfig::from_json_str(json).unwrap();
    assert_eq!(config.simulation_horizon, 500);
    assert_eq!(config.starting_teller_id, 1);
    assert_eq!(config.arrival_source, ArrivalSourceConfig::Random { seed: 0 });
    config.validate().unwrap();
}

#[test]
fn test_from_json_replay_source() {
    let json = r#"{
        "simulation_horizon": 10,
        "max_transaction_time": 5,
        "arrival_probability_percent": 50,
        "teller_count": 1,
        "customer_queue_limit": 1,
        "arrival_source": { "type": "replay", "path": "data/arrivals.txt" }
    }"#;

    let config = SimulationConfig::from_json_str(json).unwrap();
    assert_eq!(
        config.arrival_source,
        ArrivalSourceConfig::Replay {
            path: PathBuf::from("data/arrivals.txt")
        }
    );
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_each_bound_is_enforced() {
    let cases = [
        (
            SimulationConfig { simulation_horizon: 10_001, ..SimulationConfig::default() },
            "simulation_horizon",
        ),
        (
            SimulationConfig { max_transaction_time: 0, ..SimulationConfig::default() },
            "max_transaction_time",
        ),
        (
            SimulationConfig { arrival_probability_percent: 0, ..SimulationConfig::default() },
            "arrival_probability_percent",
        ),
        (
            SimulationConfig { arrival_probability_percent: 101, ..SimulationConfig::default() },
            "arrival_probability_percent",
        ),
        (
            SimulationConfig { teller_count: 11, ..SimulationConfig::default() },
            "teller_count",
        ),
        (
            SimulationConfig { customer_queue_limit: 51, ..SimulationConfig::default() },
            "customer_queue_limit",
        ),
    ];

    for (config, expected_field) in cases {
        match config.validate() {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected {} violation, got {:?}", expected_field, other),
        }
    }
}

#[test]
fn test_boundary_values_accepted() {
    let config = SimulationConfig {
        simulation_horizon: 10_000,
        max_transaction_time: 500,
        arrival_probability_percent: 100,
        teller_count: 0,
        customer_queue_limit: 0,
        ..SimulationConfig::default()
    };
    config.validate().unwrap();
}

#[test]
fn test_engine_accepts_values_beyond_policy_bounds() {
    let config = SimulationConfig {
        simulation_horizon: 20,
        teller_count: 25,
        customer_queue_limit: 80,
        ..SimulationConfig::default()
    };
    assert!(config.validate().is_err());

    let outcome = SimulationEngine::from_config(&config).unwrap().run().unwrap();
    assert_eq!(outcome.service_area.num_tellers(), 25);
}

#[test]
fn test_engine_from_config_missing_replay_file() {
    let config = SimulationConfig {
        arrival_source: ArrivalSourceConfig::Replay {
            path: PathBuf::from("/no/such/replay.txt"),
        },
        ..SimulationConfig::default()
    };
    assert!(SimulationEngine::from_config(&config).is_err());
}

#[test]
fn test_fingerprint_stable_across_json_round_trip() {
    let a = SimulationConfig::default();
    let json = serde_json::to_string(&a).unwrap();
    let b = SimulationConfig::from_json_str(&json).unwrap();

    assert_eq!(config_fingerprint(&a).unwrap(), config_fingerprint(&b).unwrap());
}
