//! Teller model
//!
//! A teller alternates between a free interval and a busy interval. Each
//! transition closes the open interval and folds its length into the
//! teller's lifetime totals:
//!
//! ```text
//!          assign(customer, tick)
//!   Free ──────────────────────────▶ Busy
//!     ▲                                │
//!     └────────── release() ───────────┘
//! ```
//!
//! `finalize(end_tick)` closes whichever interval is open at the end of the
//! run without changing state. After finalization every teller satisfies
//! `total_free_time + total_busy_time == end_tick`.

use crate::models::customer::Customer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by illegal teller transitions
///
/// Every variant signals an ordering bug in the caller, never a business
/// outcome.
#[derive(Debug, Error, PartialEq)]
pub enum TellerError {
    #[error("Teller {teller_id} is busy and cannot be assigned a customer")]
    NotFree { teller_id: usize },

    #[error("Teller {teller_id} is free and has no customer to release")]
    NotBusy { teller_id: usize },

    #[error("Teller {teller_id} was already finalized at tick {finalized_at}")]
    AlreadyFinalized {
        teller_id: usize,
        finalized_at: usize,
    },

    #[error("Teller {teller_id}: tick {tick} is before interval start {interval_start}")]
    TickBeforeIntervalStart {
        teller_id: usize,
        tick: usize,
        interval_start: usize,
    },
}

/// Current teller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TellerState {
    Free,
    Busy,
}

/// A bank teller and its lifetime statistics
///
/// # Example
/// ```
/// use bank_simulator_core_rs::{Customer, Teller, TellerState};
///
/// let mut teller = Teller::new(5);
/// teller.assign(Customer::new(20, 30, 10), 13).unwrap();
/// assert_eq!(teller.state(), TellerState::Busy);
/// assert_eq!(teller.interval_end(), Some(43));
/// assert_eq!(teller.total_free_time(), 13);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teller {
    id: usize,
    state: TellerState,

    /// Start tick of the currently open interval (free or busy)
    interval_start: usize,

    /// End tick of the busy interval; `None` while free
    interval_end: Option<usize>,

    /// Customer being served; `Some` exactly while busy
    current_customer: Option<Customer>,

    total_free_time: usize,
    total_busy_time: usize,
    total_served: usize,

    /// Tick the open interval was force-closed at, once finalized
    finalized_at: Option<usize>,
}

impl Teller {
    /// Create a free teller whose first free interval starts at tick 0
    pub fn new(id: usize) -> Self {
        Self {
            id,
            state: TellerState::Free,
            interval_start: 0,
            interval_end: None,
            current_customer: None,
            total_free_time: 0,
            total_busy_time: 0,
            total_served: 0,
            finalized_at: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> TellerState {
        self.state
    }

    pub fn is_free(&self) -> bool {
        self.state == TellerState::Free
    }

    pub fn is_busy(&self) -> bool {
        self.state == TellerState::Busy
    }

    pub fn interval_start(&self) -> usize {
        self.interval_start
    }

    /// Tick at which the current busy interval ends
    pub fn interval_end(&self) -> Option<usize> {
        self.interval_end
    }

    pub fn current_customer(&self) -> Option<&Customer> {
        self.current_customer.as_ref()
    }

    pub fn total_free_time(&self) -> usize {
        self.total_free_time
    }

    pub fn total_busy_time(&self) -> usize {
        self.total_busy_time
    }

    pub fn total_served(&self) -> usize {
        self.total_served
    }

    pub fn finalized_at(&self) -> Option<usize> {
        self.finalized_at
    }

    /// Mean busy ticks per customer served, if any were served
    ///
    /// Busy time includes the partial interval closed at finalization, so
    /// a teller still serving at the horizon reports a lower figure than
    /// the customers' nominal transaction times.
    pub fn average_transaction_time(&self) -> Option<f64> {
        if self.total_served == 0 {
            None
        } else {
            Some(self.total_busy_time as f64 / self.total_served as f64)
        }
    }

    // ========================================================================
    // State Transitions
    // ========================================================================

    /// Free → Busy: start serving `customer` at `tick`
    ///
    /// # Errors
    /// - [`TellerError::NotFree`] if the teller is busy
    /// - [`TellerError::AlreadyFinalized`] after finalization
    /// - [`TellerError::TickBeforeIntervalStart`] if `tick` precedes the
    ///   open free interval
    pub fn assign(&mut self, customer: Customer, tick: usize) -> Result<(), TellerError> {
        self.ensure_not_finalized()?;
        if self.state != TellerState::Free {
            return Err(TellerError::NotFree { teller_id: self.id });
        }
        if tick < self.interval_start {
            return Err(TellerError::TickBeforeIntervalStart {
                teller_id: self.id,
                tick,
                interval_start: self.interval_start,
            });
        }

        self.total_free_time += tick - self.interval_start;
        self.interval_start = tick;
        self.interval_end = Some(tick + customer.transaction_time());
        self.current_customer = Some(customer);
        self.total_served += 1;
        self.state = TellerState::Busy;
        Ok(())
    }

    /// Busy → Free: finish the current customer
    ///
    /// The new free interval starts exactly at the old busy interval's end.
    /// Returns the customer that was being served.
    ///
    /// # Errors
    /// - [`TellerError::NotBusy`] if the teller is free
    /// - [`TellerError::AlreadyFinalized`] after finalization
    pub fn release(&mut self) -> Result<Customer, TellerError> {
        self.ensure_not_finalized()?;
        let (end, customer) = match (self.state, self.interval_end, self.current_customer.take()) {
            (TellerState::Busy, Some(end), Some(customer)) => (end, customer),
            (_, _, customer) => {
                self.current_customer = customer;
                return Err(TellerError::NotBusy { teller_id: self.id });
            }
        };

        self.total_busy_time += end - self.interval_start;
        self.interval_start = end;
        self.interval_end = None;
        self.state = TellerState::Free;
        Ok(customer)
    }

    /// Close the open interval at `end_tick` without changing state
    ///
    /// One-shot: a second call with the same `end_tick` does nothing.
    ///
    /// # Errors
    /// - [`TellerError::AlreadyFinalized`] if previously finalized at a
    ///   different tick
    /// - [`TellerError::TickBeforeIntervalStart`] if `end_tick` precedes the
    ///   open interval
    pub fn finalize(&mut self, end_tick: usize) -> Result<(), TellerError> {
        match self.finalized_at {
            Some(at) if at == end_tick => return Ok(()),
            Some(at) => {
                return Err(TellerError::AlreadyFinalized {
                    teller_id: self.id,
                    finalized_at: at,
                })
            }
            None => {}
        }
        if end_tick < self.interval_start {
            return Err(TellerError::TickBeforeIntervalStart {
                teller_id: self.id,
                tick: end_tick,
                interval_start: self.interval_start,
            });
        }

        let elapsed = end_tick - self.interval_start;
        match self.state {
            TellerState::Free => self.total_free_time += elapsed,
            TellerState::Busy => self.total_busy_time += elapsed,
        }
        self.finalized_at = Some(end_tick);
        Ok(())
    }

    fn ensure_not_finalized(&self) -> Result<(), TellerError> {
        match self.finalized_at {
            Some(at) => Err(TellerError::AlreadyFinalized {
                teller_id: self.id,
                finalized_at: at,
            }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for Teller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Teller:{}:{}-", self.id, self.interval_start)?;
        match self.interval_end {
            Some(end) => write!(f, "{}", end)?,
            None => write!(f, "open")?,
        }
        match &self.current_customer {
            Some(customer) => write!(f, ":Customer:{}", customer),
            None => write!(f, ":Customer:none"),
        }
    }
}
