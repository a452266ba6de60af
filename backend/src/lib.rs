//! Bank Simulator Core - Rust Engine
//!
//! Discrete-time simulation of a bank service floor: customers arrive,
//! wait in a bounded queue, and are served by a fixed pool of tellers.
//!
//! # Architecture
//!
//! - **core**: Tick clock bounded by the simulation horizon
//! - **models**: Domain types (Customer, Teller, ServiceArea, Event)
//! - **arrivals**: Per-tick arrival sources (random, replay, scripted)
//! - **config**: Run parameters, policy bounds, config fingerprints
//! - **orchestrator**: Tick loop, finalization, end-of-run report
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. The wait queue never exceeds its limit
//! 2. Every teller's free time plus busy time equals the horizon at run end
//! 3. All randomness is deterministic (seeded RNG)

// Module declarations
pub mod arrivals;
pub mod config;
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use arrivals::{Arrival, ArrivalError, ArrivalParams, ArrivalSource};
pub use config::{ArrivalSourceConfig, ConfigError, ConfigLimits, SimulationConfig};
pub use core::time::TimeManager;
pub use models::{
    customer::Customer,
    event::{Event, EventLog},
    service_area::{ServiceArea, ServiceAreaError, ServiceAreaSummary},
    teller::{Teller, TellerError, TellerState},
};
pub use orchestrator::{
    run_simulation, RunReport, RunStatistics, SimulationEngine, SimulationError,
    SimulationOutcome, TellerReport, TickResult,
};
pub use rng::RngManager;
