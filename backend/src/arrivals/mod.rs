//! Arrival sources for per-tick customer generation.
//!
//! The engine asks an [`ArrivalSource`] exactly once per tick whether a
//! customer walked in and, if so, how long their transaction takes. It never
//! knows which strategy sits behind the trait.
//!
//! # Strategies
//!
//! 1. **Random** ([`RandomArrivals`]): seeded draws, deterministic per seed
//! 2. **Replay** ([`ReplayArrivals`]): integer pairs read from a data file
//! 3. **Scripted** ([`ScriptedArrivals`]): a fixed per-tick script
//!
//! Closures `FnMut(usize) -> Arrival` are also arrival sources.
//!
//! # Example
//!
//! ```
//! use bank_simulator_core_rs::arrivals::{ArrivalParams, ArrivalSource, RandomArrivals};
//!
//! let params = ArrivalParams {
//!     arrival_probability_percent: 100,
//!     max_transaction_time: 5,
//! };
//! let mut source = RandomArrivals::new(params, 42).unwrap();
//!
//! let arrival = source.next_arrival(0);
//! assert!(arrival.arrived);
//! assert!((1..=5).contains(&arrival.transaction_time));
//! ```

mod replay;

pub use replay::ReplayArrivals;

use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building an arrival source
#[derive(Debug, Error, PartialEq)]
pub enum ArrivalError {
    #[error("max_transaction_time must be at least 1")]
    InvalidMaxTransactionTime,

    #[error("Replay data token {position} is not an integer: {token:?}")]
    InvalidReplayToken { position: usize, token: String },

    #[error("Failed to read replay data: {0}")]
    Io(String),
}

/// Outcome of one tick's arrival query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrival {
    pub arrived: bool,

    /// Service duration in ticks; meaningful only when `arrived`
    pub transaction_time: usize,
}

impl Arrival {
    /// A customer with the given transaction time
    pub fn customer(transaction_time: usize) -> Self {
        Self {
            arrived: true,
            transaction_time,
        }
    }

    /// Nobody walked in this tick
    pub fn none() -> Self {
        Self {
            arrived: false,
            transaction_time: 0,
        }
    }
}

/// Per-tick provider of customer arrivals
pub trait ArrivalSource {
    /// Report whether a customer arrives at `tick`
    ///
    /// Called exactly once per tick, in tick order.
    fn next_arrival(&mut self, tick: usize) -> Arrival;

    /// Name of the strategy, for logs and reports
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> ArrivalSource for F
where
    F: FnMut(usize) -> Arrival,
{
    fn next_arrival(&mut self, tick: usize) -> Arrival {
        self(tick)
    }

    fn name(&self) -> &'static str {
        "closure"
    }
}

/// Parameters shared by the random and replay strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalParams {
    /// A customer arrives when a roll in `1..=100` is at most this value
    pub arrival_probability_percent: u32,

    /// Transaction times fall in `1..=max_transaction_time`
    pub max_transaction_time: usize,
}

impl ArrivalParams {
    fn validate(&self) -> Result<(), ArrivalError> {
        if self.max_transaction_time == 0 {
            return Err(ArrivalError::InvalidMaxTransactionTime);
        }
        Ok(())
    }

    /// Whether a roll in `1..=100` counts as an arrival
    fn is_arrival(&self, roll: i64) -> bool {
        roll <= i64::from(self.arrival_probability_percent)
    }
}

// ============================================================================
// Random Arrivals
// ============================================================================

/// Seeded pseudo-random arrivals
///
/// Both the arrival roll and the transaction time are drawn every tick,
/// whether or not a customer arrives, so the draw sequence depends only on
/// the seed and the tick count.
#[derive(Debug, Clone)]
pub struct RandomArrivals {
    params: ArrivalParams,
    rng: RngManager,
}

impl RandomArrivals {
    pub fn new(params: ArrivalParams, seed: u64) -> Result<Self, ArrivalError> {
        params.validate()?;
        Ok(Self {
            params,
            rng: RngManager::new(seed),
        })
    }

    pub fn params(&self) -> ArrivalParams {
        self.params
    }
}

impl ArrivalSource for RandomArrivals {
    fn next_arrival(&mut self, _tick: usize) -> Arrival {
        let roll = self.rng.range_inclusive(1, 100);
        let transaction_time = self
            .rng
            .range_inclusive(1, self.params.max_transaction_time as i64) as usize;

        Arrival {
            arrived: self.params.is_arrival(roll),
            transaction_time,
        }
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

// ============================================================================
// Scripted Arrivals
// ============================================================================

/// Fixed per-tick arrivals; ticks past the end of the script have none
///
/// # Example
/// ```
/// use bank_simulator_core_rs::arrivals::{Arrival, ArrivalSource, ScriptedArrivals};
///
/// let mut source = ScriptedArrivals::new(vec![Arrival::customer(3)]);
/// assert_eq!(source.next_arrival(0), Arrival::customer(3));
/// assert!(!source.next_arrival(1).arrived);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedArrivals {
    script: Vec<Arrival>,
}

impl ScriptedArrivals {
    pub fn new(script: Vec<Arrival>) -> Self {
        Self { script }
    }

    /// The same arrival on every tick
    pub fn every_tick(arrival: Arrival, ticks: usize) -> Self {
        Self {
            script: vec![arrival; ticks],
        }
    }

    /// Build a script from `Option<transaction_time>` per tick
    pub fn from_transaction_times<I>(times: I) -> Self
    where
        I: IntoIterator<Item = Option<usize>>,
    {
        Self {
            script: times
                .into_iter()
                .map(|t| t.map_or_else(Arrival::none, Arrival::customer))
                .collect(),
        }
    }
}

impl ArrivalSource for ScriptedArrivals {
    fn next_arrival(&mut self, tick: usize) -> Arrival {
        self.script.get(tick).copied().unwrap_or_else(Arrival::none)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
