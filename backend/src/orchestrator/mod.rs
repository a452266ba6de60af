//! Orchestrator - main simulation loop
//!
//! See `engine.rs` for the tick loop and `report.rs` for the end-of-run
//! report.

pub mod engine;
pub mod report;

// Re-export main types for convenience
pub use engine::{
    build_arrival_source, run_simulation, ArrivalOutcome, BoxedArrivalSource, RunStatistics,
    SimulationEngine, SimulationError, SimulationOutcome, TickResult,
};
pub use report::{RunReport, TellerReport};
