//! Tests for the end-of-run report

use bank_simulator_core_rs::arrivals::{Arrival, ScriptedArrivals};
use bank_simulator_core_rs::{run_simulation, RunReport, SimulationConfig, TellerState};

fn config(horizon: usize, tellers: usize, limit: usize) -> SimulationConfig {
    SimulationConfig {
        simulation_horizon: horizon,
        teller_count: tellers,
        customer_queue_limit: limit,
        ..SimulationConfig::default()
    }
}

#[test]
fn test_report_counts_and_teller_lists() {
    // Teller 1 serves 4-tick and 2-tick customers back to back, teller 2 one 3-tick customer
    let source = ScriptedArrivals::from_transaction_times(vec![Some(4), Some(3), Some(2)]);
    let outcome = run_simulation(&config(8, 2, 5), Box::new(source)).unwrap();
    let report = RunReport::from_outcome(&outcome).unwrap();

    assert_eq!(report.arrival_source, "scripted");
    assert_eq!(report.simulation_horizon, 8);
    assert_eq!(report.total_arrivals, 3);
    assert_eq!(report.customers_served, 3);
    assert_eq!(report.customers_balked, 0);
    assert_eq!(report.customers_waiting(), 0);
    assert!(report.busy_tellers.is_empty());
    assert_eq!(report.free_tellers.len(), 2);

    let teller_one = report.free_tellers.iter().find(|t| t.teller_id == 1).unwrap();
    assert_eq!(teller_one.total_served, 2);
    assert_eq!(teller_one.total_busy_time, 6);
    assert_eq!(teller_one.average_transaction_time, Some(3.0));
    assert_eq!(teller_one.state, TellerState::Free);

    let teller_two = report.free_tellers.iter().find(|t| t.teller_id == 2).unwrap();
    assert_eq!(teller_two.total_served, 1);
    assert_eq!(teller_two.total_free_time + teller_two.total_busy_time, 8);
}

#[test]
fn test_idle_teller_has_no_average() {
    let outcome = run_simulation(&config(5, 1, 1), Box::new(ScriptedArrivals::default())).unwrap();
    let report = RunReport::from_outcome(&outcome).unwrap();

    assert_eq!(report.free_tellers[0].average_transaction_time, None);
    assert_eq!(report.average_waiting_time, 0.0);
    assert_eq!(report.mean_wait_per_served, 0.0);
}

#[test]
fn test_report_busy_tellers_soonest_first() {
    let source = ScriptedArrivals::from_transaction_times(vec![Some(9), Some(2), Some(5)]);
    let outcome = run_simulation(&config(3, 3, 5), Box::new(source)).unwrap();
    let report = RunReport::from_outcome(&outcome).unwrap();

    // Ends: teller 1 at 9, teller 2 at 3, teller 3 at 7
    let ids: Vec<usize> = report.busy_tellers.iter().map(|t| t.teller_id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert_eq!(report.summary.busy_tellers, 3);
}

#[test]
fn test_literal_average_waiting_time() {
    let source = ScriptedArrivals::every_tick(Arrival::customer(1), 4);
    let outcome = run_simulation(&config(4, 0, 2), Box::new(source)).unwrap();
    let report = RunReport::from_outcome(&outcome).unwrap();

    // Queue non-empty at the start of ticks 1, 2 and 3; two left waiting
    assert_eq!(report.cumulative_wait_ticks, 3);
    assert_eq!(report.customers_waiting(), 2);
    assert_eq!(report.average_waiting_time, 1.5);
}

#[test]
fn test_report_json_round_trip() {
    let source = ScriptedArrivals::new(vec![Arrival::customer(2)]);
    let outcome = run_simulation(&config(4, 2, 3), Box::new(source)).unwrap();
    let report = RunReport::from_outcome(&outcome).unwrap();

    let json = report.to_json().unwrap();
    assert!(json.contains("\"config_fingerprint\""));

    let parsed: RunReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_reports_share_fingerprint_not_run_id() {
    let cfg = config(6, 2, 2);
    let first = run_simulation(&cfg, Box::new(ScriptedArrivals::default())).unwrap();
    let second = run_simulation(&cfg, Box::new(ScriptedArrivals::default())).unwrap();

    let a = RunReport::from_outcome(&first).unwrap();
    let b = RunReport::from_outcome(&second).unwrap();

    assert_eq!(a.config_fingerprint, b.config_fingerprint);
    assert_ne!(a.run_id, b.run_id);
}
