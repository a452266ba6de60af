//! Simulation Engine
//!
//! Drives the per-tick loop over a [`ServiceArea`]:
//!
//! ```text
//! For each tick t in 0..horizon:
//! 1. Count t as a waiting tick if customers are queued
//! 2. Ask the arrival source whether a customer walks in
//! 3. Balk the customer if the queue is full, otherwise enqueue
//! 4. Completion sweep: free every teller whose busy interval ends at t
//! 5. Assignment sweep: pair free tellers with waiting customers
//! ```
//!
//! The order is load-bearing: a teller freed at `t` can take a new customer
//! at `t`, and a customer arriving at `t` can be served at `t` when a teller
//! is free. After the last tick every teller's open interval is closed at
//! the horizon.
//!
//! # Example
//!
//! ```rust
//! use bank_simulator_core_rs::arrivals::{Arrival, ScriptedArrivals};
//! use bank_simulator_core_rs::{SimulationConfig, SimulationEngine};
//!
//! let config = SimulationConfig {
//!     simulation_horizon: 1,
//!     teller_count: 1,
//!     customer_queue_limit: 1,
//!     ..SimulationConfig::default()
//! };
//! let source = ScriptedArrivals::new(vec![Arrival::customer(5)]);
//!
//! let outcome = SimulationEngine::new(&config, Box::new(source)).run().unwrap();
//! assert_eq!(outcome.statistics.served, 1);
//! assert_eq!(outcome.service_area.num_busy_tellers(), 1);
//! ```

use crate::arrivals::{ArrivalError, ArrivalSource, RandomArrivals, ReplayArrivals};
use crate::config::{ArrivalSourceConfig, SimulationConfig};
use crate::core::time::TimeManager;
use crate::models::customer::Customer;
use crate::models::event::{Event, EventLog};
use crate::models::service_area::{ServiceArea, ServiceAreaError};
use crate::models::teller::TellerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Arrival source as held by the engine
pub type BoxedArrivalSource = Box<dyn ArrivalSource + Send>;

// ============================================================================
// Errors
// ============================================================================

/// Simulation error types
///
/// `Teller`, `ServiceArea`, `EmptyQueue` and `MissedCompletion` are contract
/// violations: the engine's own ordering guarantees were broken. Any error
/// raised during a tick halts the engine.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Teller contract violation: {0}")]
    Teller(#[from] TellerError),

    #[error("Service area contract violation: {0}")]
    ServiceArea(#[from] ServiceAreaError),

    #[error("Tick {tick}: {queue} queue empty when a value was guaranteed")]
    EmptyQueue { tick: usize, queue: &'static str },

    #[error("Tick {tick}: busy interval ending at {interval_end} was never completed")]
    MissedCompletion { tick: usize, interval_end: usize },

    #[error("Tick {tick}: arrival reported with zero transaction time")]
    InvalidArrival { tick: usize },

    #[error("Simulation already ran all {horizon} ticks")]
    Finished { horizon: usize },

    #[error("Simulation still at tick {tick} of {horizon}; cannot finalize")]
    NotFinished { tick: usize, horizon: usize },

    #[error("Simulation halted after an earlier error")]
    Halted,

    #[error("Arrival source error: {0}")]
    Arrival(#[from] ArrivalError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SimulationError {
    /// True for errors that indicate broken engine invariants
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            SimulationError::Teller(_)
                | SimulationError::ServiceArea(_)
                | SimulationError::EmptyQueue { .. }
                | SimulationError::MissedCompletion { .. }
        )
    }
}

// ============================================================================
// Statistics and Results
// ============================================================================

/// Run-level counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Customers that walked in (balked or not)
    pub arrivals: usize,

    /// Customers turned away by a full queue
    pub balked: usize,

    /// Customers that reached a teller
    pub served: usize,

    /// Ticks that began with at least one customer waiting
    pub cumulative_wait_ticks: usize,

    /// Sum of queue time over every served customer
    pub total_customer_wait_ticks: usize,
}

impl RunStatistics {
    /// Coarse average waiting time
    ///
    /// Divides the number of congested ticks by the queue length at report
    /// time, not by the number of customers that waited. Returns 0 when the
    /// queue is empty.
    pub fn average_waiting_time(&self, waiting_at_end: usize) -> f64 {
        if waiting_at_end == 0 {
            0.0
        } else {
            self.cumulative_wait_ticks as f64 / waiting_at_end as f64
        }
    }

    /// Mean ticks a served customer spent in the queue
    pub fn mean_wait_per_served(&self) -> f64 {
        if self.served == 0 {
            0.0
        } else {
            self.total_customer_wait_ticks as f64 / self.served as f64
        }
    }
}

/// What happened to this tick's arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArrivalOutcome {
    NoArrival,
    Queued { customer_id: usize },
    Balked { customer_id: usize },
}

/// Result of a single tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickResult {
    pub tick: usize,

    /// Wait-queue length before the arrival was processed
    pub queue_len_at_start: usize,

    pub arrival: ArrivalOutcome,

    /// Tellers freed by the completion sweep
    pub num_completed: usize,

    /// Customers that reached a teller in the assignment sweep
    pub num_started: usize,

    /// Wait-queue length after both sweeps
    pub queue_len_at_end: usize,
}

/// Everything a reporter needs after a finished run
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub config: SimulationConfig,
    pub arrival_source: &'static str,
    pub service_area: ServiceArea,
    pub statistics: RunStatistics,
    pub event_log: EventLog,
}

// ============================================================================
// Engine
// ============================================================================

/// Tick-loop driver owning all state of one run
///
/// Engines share nothing; independent runs may execute side by side on
/// separate threads.
pub struct SimulationEngine {
    config: SimulationConfig,
    service_area: ServiceArea,
    time_manager: TimeManager,
    arrival_source: BoxedArrivalSource,
    statistics: RunStatistics,
    event_log: EventLog,

    /// Id of the most recently arrived customer
    last_customer_id: usize,

    finalized: bool,
    halted: bool,
}

impl SimulationEngine {
    /// Create an engine at tick 0 with every teller free
    ///
    /// The configuration is trusted as given; validate it first with
    /// [`SimulationConfig::validate`]. `config.arrival_source` is ignored in
    /// favour of `arrival_source`.
    pub fn new(config: &SimulationConfig, arrival_source: BoxedArrivalSource) -> Self {
        Self {
            config: config.clone(),
            service_area: ServiceArea::new(
                config.teller_count,
                config.customer_queue_limit,
                config.starting_teller_id,
            ),
            time_manager: TimeManager::new(config.simulation_horizon),
            arrival_source,
            statistics: RunStatistics::default(),
            event_log: EventLog::new(),
            last_customer_id: 0,
            finalized: false,
            halted: false,
        }
    }

    /// Create an engine whose arrival source is built from the config
    ///
    /// # Errors
    /// [`SimulationError::Arrival`] if the source cannot be built (bad
    /// bounds, unreadable or malformed replay file).
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let source = build_arrival_source(config)?;
        Ok(Self::new(config, source))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Index of the next tick to execute
    pub fn current_tick(&self) -> usize {
        self.time_manager.current_tick()
    }

    pub fn horizon(&self) -> usize {
        self.time_manager.horizon()
    }

    pub fn is_finished(&self) -> bool {
        self.time_manager.is_finished()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn service_area(&self) -> &ServiceArea {
        &self.service_area
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn arrival_source_name(&self) -> &'static str {
        self.arrival_source.name()
    }

    // ========================================================================
    // Tick Loop Implementation
    // ========================================================================

    /// Execute one simulation tick
    ///
    /// # Errors
    /// - [`SimulationError::Finished`] once every tick has run
    /// - [`SimulationError::Halted`] after any earlier error
    /// - contract violations and [`SimulationError::InvalidArrival`], which
    ///   also halt the engine
    pub fn tick(&mut self) -> Result<TickResult, SimulationError> {
        if self.halted {
            return Err(SimulationError::Halted);
        }
        if self.time_manager.is_finished() {
            return Err(SimulationError::Finished {
                horizon: self.time_manager.horizon(),
            });
        }

        let result = self.execute_tick();
        if result.is_err() {
            self.halted = true;
        }
        result
    }

    fn execute_tick(&mut self) -> Result<TickResult, SimulationError> {
        let tick = self.time_manager.current_tick();

        // STEP 1: congestion counter, before the arrival is seen
        let queue_len_at_start = self.service_area.num_waiting_customers();
        if queue_len_at_start > 0 {
            self.statistics.cumulative_wait_ticks += 1;
        }

        // STEP 2-3: arrival
        let arrival = self.arrival_source.next_arrival(tick);
        let arrival = if arrival.arrived {
            self.admit_customer(tick, arrival.transaction_time)?
        } else {
            ArrivalOutcome::NoArrival
        };

        // STEP 4: completions before assignments
        let num_completed = self.complete_services(tick)?;

        // STEP 5: assignments
        let num_started = self.start_services(tick)?;

        self.time_manager.advance_tick();

        let result = TickResult {
            tick,
            queue_len_at_start,
            arrival,
            num_completed,
            num_started,
            queue_len_at_end: self.service_area.num_waiting_customers(),
        };
        debug!(
            tick,
            queue = result.queue_len_at_end,
            completed = num_completed,
            started = num_started,
            "tick complete"
        );
        Ok(result)
    }

    fn admit_customer(
        &mut self,
        tick: usize,
        transaction_time: usize,
    ) -> Result<ArrivalOutcome, SimulationError> {
        if transaction_time == 0 {
            return Err(SimulationError::InvalidArrival { tick });
        }

        self.last_customer_id += 1;
        let customer_id = self.last_customer_id;
        self.statistics.arrivals += 1;
        self.event_log.log(Event::CustomerArrived {
            tick,
            customer_id,
            transaction_time,
        });

        if self.service_area.is_customer_queue_full() {
            self.statistics.balked += 1;
            self.event_log.log(Event::CustomerBalked {
                tick,
                customer_id,
                queue_limit: self.service_area.customer_queue_limit(),
            });
            return Ok(ArrivalOutcome::Balked { customer_id });
        }

        self.service_area
            .insert_customer(Customer::new(customer_id, transaction_time, tick))?;
        self.event_log.log(Event::CustomerQueued {
            tick,
            customer_id,
            queue_len: self.service_area.num_waiting_customers(),
        });
        Ok(ArrivalOutcome::Queued { customer_id })
    }

    /// Free every teller whose busy interval ends at `tick`
    fn complete_services(&mut self, tick: usize) -> Result<usize, SimulationError> {
        let mut completed = 0;

        while let Some(interval_end) = self.service_area.next_completion_tick() {
            if interval_end > tick {
                break;
            }
            if interval_end < tick {
                return Err(SimulationError::MissedCompletion { tick, interval_end });
            }

            let mut teller = self
                .service_area
                .remove_busy_teller()
                .ok_or(SimulationError::EmptyQueue { tick, queue: "busy teller" })?;
            let customer = teller.release()?;

            self.event_log.log(Event::ServiceCompleted {
                tick,
                teller_id: teller.id(),
                customer_id: customer.id(),
            });
            self.service_area.insert_free_teller(teller);
            completed += 1;
        }

        Ok(completed)
    }

    /// Pair free tellers with waiting customers, both in FIFO order
    fn start_services(&mut self, tick: usize) -> Result<usize, SimulationError> {
        let mut started = 0;

        while !self.service_area.is_free_queue_empty()
            && !self.service_area.is_customer_queue_empty()
        {
            let customer = self
                .service_area
                .remove_customer()
                .ok_or(SimulationError::EmptyQueue { tick, queue: "customer" })?;
            let mut teller = self
                .service_area
                .remove_free_teller()
                .ok_or(SimulationError::EmptyQueue { tick, queue: "free teller" })?;

            let customer_id = customer.id();
            let transaction_time = customer.transaction_time();
            let waited = customer.wait_until(tick);

            teller.assign(customer, tick)?;
            let teller_id = teller.id();
            self.service_area.insert_busy_teller(teller)?;

            self.statistics.served += 1;
            self.statistics.total_customer_wait_ticks += waited;
            self.event_log.log(Event::ServiceStarted {
                tick,
                teller_id,
                customer_id,
                transaction_time,
                waited,
            });
            started += 1;
        }

        Ok(started)
    }

    // ========================================================================
    // End of Run
    // ========================================================================

    /// Close every teller's open interval at the horizon
    ///
    /// Only valid after the last tick. Calling it again is a no-op.
    pub fn finalize(&mut self) -> Result<(), SimulationError> {
        if self.halted {
            return Err(SimulationError::Halted);
        }
        if self.finalized {
            return Ok(());
        }
        if !self.time_manager.is_finished() {
            return Err(SimulationError::NotFinished {
                tick: self.time_manager.current_tick(),
                horizon: self.time_manager.horizon(),
            });
        }

        let horizon = self.time_manager.horizon();
        if let Err(e) = self.service_area.finalize_tellers(horizon) {
            self.halted = true;
            return Err(e.into());
        }

        for teller in self.service_area.tellers() {
            self.event_log.log(Event::TellerFinalized {
                tick: horizon,
                teller_id: teller.id(),
                state: teller.state(),
                total_free_time: teller.total_free_time(),
                total_busy_time: teller.total_busy_time(),
            });
        }
        self.finalized = true;
        Ok(())
    }

    /// Run every remaining tick, finalize, and hand back the results
    pub fn run(mut self) -> Result<SimulationOutcome, SimulationError> {
        while !self.time_manager.is_finished() {
            self.tick()?;
        }
        self.finalize()?;

        info!(
            horizon = self.time_manager.horizon(),
            arrivals = self.statistics.arrivals,
            served = self.statistics.served,
            balked = self.statistics.balked,
            waiting = self.service_area.num_waiting_customers(),
            "simulation finished"
        );

        Ok(SimulationOutcome {
            arrival_source: self.arrival_source.name(),
            config: self.config,
            service_area: self.service_area,
            statistics: self.statistics,
            event_log: self.event_log,
        })
    }
}

impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("current_tick", &self.time_manager.current_tick())
            .field("horizon", &self.time_manager.horizon())
            .field("arrival_source", &self.arrival_source.name())
            .field("summary", &self.service_area.summary())
            .field("statistics", &self.statistics)
            .field("finalized", &self.finalized)
            .field("halted", &self.halted)
            .finish()
    }
}

/// Build the arrival source a configuration asks for
pub fn build_arrival_source(config: &SimulationConfig) -> Result<BoxedArrivalSource, ArrivalError> {
    let params = config.arrival_params();
    let source: BoxedArrivalSource = match &config.arrival_source {
        ArrivalSourceConfig::Random { seed } => Box::new(RandomArrivals::new(params, *seed)?),
        ArrivalSourceConfig::Replay { path } => Box::new(ReplayArrivals::from_path(path, params)?),
    };
    Ok(source)
}

/// Run a whole simulation with the given arrival source
pub fn run_simulation(
    config: &SimulationConfig,
    arrival_source: BoxedArrivalSource,
) -> Result<SimulationOutcome, SimulationError> {
    SimulationEngine::new(config, arrival_source).run()
}
