//! End-of-run report
//!
//! Read-only view of a finished run, shaped for reporters. Nothing here
//! feeds back into the engine.

use crate::config::config_fingerprint;
use crate::models::service_area::ServiceAreaSummary;
use crate::models::teller::{Teller, TellerState};
use crate::orchestrator::engine::{SimulationError, SimulationOutcome};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime statistics of one teller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TellerReport {
    pub teller_id: usize,
    pub state: TellerState,
    pub total_free_time: usize,
    pub total_busy_time: usize,
    pub total_served: usize,

    /// `total_busy_time / total_served`; absent when nobody was served
    pub average_transaction_time: Option<f64>,
}

impl From<&Teller> for TellerReport {
    fn from(teller: &Teller) -> Self {
        TellerReport {
            teller_id: teller.id(),
            state: teller.state(),
            total_free_time: teller.total_free_time(),
            total_busy_time: teller.total_busy_time(),
            total_served: teller.total_served(),
            average_transaction_time: teller.average_transaction_time(),
        }
    }
}

/// Final statistics of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique id of this report
    pub run_id: Uuid,

    /// SHA-256 of the canonical configuration
    pub config_fingerprint: String,

    pub arrival_source: String,
    pub simulation_horizon: usize,

    pub total_arrivals: usize,
    pub customers_balked: usize,
    pub customers_served: usize,

    pub summary: ServiceAreaSummary,

    pub cumulative_wait_ticks: usize,

    /// Congested ticks divided by the queue length at the end (0 if empty)
    pub average_waiting_time: f64,

    /// Mean queue time of served customers
    pub mean_wait_per_served: f64,

    /// Busy tellers, soonest-finishing first
    pub busy_tellers: Vec<TellerReport>,

    /// Free tellers, longest-free first
    pub free_tellers: Vec<TellerReport>,
}

impl RunReport {
    /// Build the report for a finished run
    pub fn from_outcome(outcome: &SimulationOutcome) -> Result<Self, SimulationError> {
        let fingerprint = config_fingerprint(&outcome.config)
            .map_err(|e| SimulationError::Serialization(format!("Config hashing failed: {}", e)))?;

        let area = &outcome.service_area;
        let stats = &outcome.statistics;
        let summary = area.summary();

        Ok(RunReport {
            run_id: Uuid::new_v4(),
            config_fingerprint: fingerprint,
            arrival_source: outcome.arrival_source.to_string(),
            simulation_horizon: outcome.config.simulation_horizon,
            total_arrivals: stats.arrivals,
            customers_balked: stats.balked,
            customers_served: stats.served,
            summary,
            cumulative_wait_ticks: stats.cumulative_wait_ticks,
            average_waiting_time: stats.average_waiting_time(summary.waiting_customers),
            mean_wait_per_served: stats.mean_wait_per_served(),
            busy_tellers: area
                .busy_tellers_in_order()
                .into_iter()
                .map(TellerReport::from)
                .collect(),
            free_tellers: area.free_tellers().map(TellerReport::from).collect(),
        })
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimulationError::Serialization(format!("Report serialization failed: {}", e)))
    }

    /// Customers still waiting when the run ended
    pub fn customers_waiting(&self) -> usize {
        self.summary.waiting_customers
    }
}
