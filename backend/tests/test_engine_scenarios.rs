//! End-to-end scenarios with hand-checked outcomes

use bank_simulator_core_rs::arrivals::{Arrival, ScriptedArrivals};
use bank_simulator_core_rs::orchestrator::ArrivalOutcome;
use bank_simulator_core_rs::{
    run_simulation, SimulationConfig, SimulationEngine, SimulationError, TellerState,
};

fn config(horizon: usize, tellers: usize, limit: usize) -> SimulationConfig {
    SimulationConfig {
        simulation_horizon: horizon,
        teller_count: tellers,
        customer_queue_limit: limit,
        ..SimulationConfig::default()
    }
}

#[test]
fn test_single_customer_served_on_arrival_tick() {
    let source = ScriptedArrivals::new(vec![Arrival::customer(5)]);
    let outcome = run_simulation(&config(1, 1, 1), Box::new(source)).unwrap();

    assert_eq!(outcome.statistics.arrivals, 1);
    assert_eq!(outcome.statistics.served, 1);
    assert_eq!(outcome.statistics.balked, 0);
    assert_eq!(outcome.service_area.num_waiting_customers(), 0);
    assert_eq!(outcome.service_area.num_busy_tellers(), 1);

    // Busy interval 0..5 truncated at the horizon
    let teller = outcome.service_area.peek_busy_teller().unwrap();
    assert_eq!(teller.total_busy_time(), 1);
    assert_eq!(teller.total_free_time(), 0);
}

#[test]
fn test_no_tellers_fills_queue_then_balks() {
    let source = ScriptedArrivals::every_tick(Arrival::customer(1), 3);
    let outcome = run_simulation(&config(3, 0, 1), Box::new(source)).unwrap();

    assert_eq!(outcome.statistics.arrivals, 3);
    assert_eq!(outcome.statistics.balked, 2);
    assert_eq!(outcome.statistics.served, 0);
    assert_eq!(outcome.statistics.cumulative_wait_ticks, 2);
    assert_eq!(outcome.service_area.num_waiting_customers(), 1);
    assert_eq!(outcome.statistics.average_waiting_time(1), 2.0);

    // Balked customers still consume ids
    let balked: Vec<usize> = outcome
        .event_log
        .events_of_type("CustomerBalked")
        .iter()
        .filter_map(|e| e.customer_id())
        .collect();
    assert_eq!(balked, vec![2, 3]);
}

#[test]
fn test_freed_teller_rejoins_back_of_free_queue() {
    let source = ScriptedArrivals::new(vec![Arrival::customer(1)]);
    let outcome = run_simulation(&config(2, 2, 5), Box::new(source)).unwrap();

    let free: Vec<_> = outcome.service_area.free_tellers().collect();
    assert_eq!(free.len(), 2);

    assert_eq!(free[0].id(), 2);
    assert_eq!(free[0].total_free_time(), 2);
    assert_eq!(free[0].total_busy_time(), 0);

    assert_eq!(free[1].id(), 1);
    assert_eq!(free[1].total_free_time(), 1);
    assert_eq!(free[1].total_busy_time(), 1);
    assert_eq!(free[1].total_served(), 1);
}

#[test]
fn test_teller_freed_and_reassigned_same_tick() {
    let source = ScriptedArrivals::from_transaction_times(vec![Some(2), Some(1)]);
    let outcome = run_simulation(&config(4, 1, 5), Box::new(source)).unwrap();

    assert_eq!(outcome.statistics.served, 2);
    assert_eq!(outcome.statistics.cumulative_wait_ticks, 1);
    assert_eq!(outcome.statistics.total_customer_wait_ticks, 1);
    assert_eq!(outcome.statistics.mean_wait_per_served(), 0.5);
    assert_eq!(outcome.statistics.average_waiting_time(0), 0.0);

    let at_two = outcome.event_log.events_at_tick(2);
    let kinds: Vec<&str> = at_two.iter().map(|e| e.event_type()).collect();
    assert_eq!(kinds, vec!["ServiceCompleted", "ServiceStarted"]);

    let teller = outcome.service_area.peek_free_teller().unwrap();
    assert_eq!(teller.total_busy_time(), 3);
    assert_eq!(teller.total_free_time(), 1);
}

#[test]
fn test_zero_queue_limit_balks_everyone() {
    let source = ScriptedArrivals::every_tick(Arrival::customer(1), 5);
    let outcome = run_simulation(&config(5, 3, 0), Box::new(source)).unwrap();

    assert_eq!(outcome.statistics.balked, 5);
    assert_eq!(outcome.statistics.served, 0);
    for teller in outcome.service_area.free_tellers() {
        assert_eq!(teller.total_free_time(), 5);
    }
}

#[test]
fn test_step_by_step_tick_results() {
    let source = ScriptedArrivals::from_transaction_times(vec![Some(3), Some(2), None]);
    let mut engine = SimulationEngine::new(&config(3, 1, 5), Box::new(source));

    let first = engine.tick().unwrap();
    assert_eq!(first.tick, 0);
    assert_eq!(first.arrival, ArrivalOutcome::Queued { customer_id: 1 });
    assert_eq!(first.num_started, 1);
    assert_eq!(first.queue_len_at_end, 0);

    let second = engine.tick().unwrap();
    assert_eq!(second.arrival, ArrivalOutcome::Queued { customer_id: 2 });
    assert_eq!(second.num_started, 0);
    assert_eq!(second.queue_len_at_end, 1);

    let third = engine.tick().unwrap();
    assert_eq!(third.queue_len_at_start, 1);
    assert_eq!(third.arrival, ArrivalOutcome::NoArrival);
    assert_eq!(third.num_completed, 0);

    assert!(engine.is_finished());
    assert!(!engine.is_finalized());
    engine.finalize().unwrap();
    engine.finalize().unwrap();
    assert!(engine.is_finalized());

    assert_eq!(engine.statistics().cumulative_wait_ticks, 1);
    assert_eq!(engine.service_area().num_waiting_customers(), 1);
    assert_eq!(
        engine.tick().unwrap_err(),
        SimulationError::Finished { horizon: 3 }
    );
}

#[test]
fn test_narrative_for_first_tick() {
    let source = ScriptedArrivals::new(vec![Arrival::customer(5)]);
    let outcome = run_simulation(&config(1, 1, 1), Box::new(source)).unwrap();

    let lines: Vec<String> = outcome
        .event_log
        .events_at_tick(0)
        .iter()
        .map(|e| e.to_string())
        .collect();
    assert_eq!(
        lines,
        vec![
            "Customer #1 arrives with transaction time 5 unit(s).",
            "Customer #1 waits in the customer queue.",
            "Customer #1 gets teller #1 for 5 unit(s).",
        ]
    );

    let finalized = outcome.event_log.events_of_type("TellerFinalized");
    assert_eq!(finalized.len(), 1);
    assert_eq!(finalized[0].tick(), 1);
}

#[test]
fn test_starting_teller_id_offsets_all_tellers() {
    let cfg = SimulationConfig {
        starting_teller_id: 10,
        ..config(3, 3, 2)
    };
    let outcome = run_simulation(&cfg, Box::new(ScriptedArrivals::default())).unwrap();

    let ids: Vec<usize> = outcome.service_area.free_tellers().map(|t| t.id()).collect();
    assert_eq!(ids, vec![10, 11, 12]);
    assert!(outcome
        .service_area
        .tellers()
        .iter()
        .all(|t| t.state() == TellerState::Free));
}

#[test]
fn test_closure_arrival_source() {
    let source = |tick: usize| {
        if tick % 2 == 0 {
            Arrival::customer(1)
        } else {
            Arrival::none()
        }
    };
    let outcome = run_simulation(&config(10, 1, 5), Box::new(source)).unwrap();

    assert_eq!(outcome.arrival_source, "closure");
    assert_eq!(outcome.statistics.arrivals, 5);
    assert_eq!(outcome.statistics.served, 5);
}

#[test]
fn test_seeded_runs_repeat_exactly() {
    let cfg = SimulationConfig {
        simulation_horizon: 500,
        arrival_probability_percent: 70,
        ..SimulationConfig::default()
    };

    let a = SimulationEngine::from_config(&cfg).unwrap().run().unwrap();
    let b = SimulationEngine::from_config(&cfg).unwrap().run().unwrap();

    assert_eq!(a.statistics, b.statistics);
    assert_eq!(a.event_log.events(), b.event_log.events());
    assert_eq!(a.arrival_source, "random");
}
