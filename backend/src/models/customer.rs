//! Customer model
//!
//! A customer is an immutable value created when an arrival is accepted.
//! It is owned by the wait queue, then by the teller serving it, and is
//! handed back to the engine when service completes.

use serde::{Deserialize, Serialize};

/// A bank customer with a single transaction to perform
///
/// # Example
/// ```
/// use bank_simulator_core_rs::Customer;
///
/// let customer = Customer::new(1, 18, 10);
/// assert_eq!(customer.id(), 1);
/// assert_eq!(customer.transaction_time(), 18);
/// assert_eq!(customer.arrival_tick(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Sequential id, unique within a run
    id: usize,

    /// Ticks a teller needs to serve this customer (always positive)
    transaction_time: usize,

    /// Tick at which the customer walked in
    arrival_tick: usize,
}

impl Customer {
    /// Create a new customer
    ///
    /// # Panics
    /// Panics if `transaction_time` is zero; a zero-length service would
    /// produce a busy interval that ends before the completion sweep can
    /// ever observe it.
    pub fn new(id: usize, transaction_time: usize, arrival_tick: usize) -> Self {
        assert!(transaction_time > 0, "transaction_time must be positive");
        Self {
            id,
            transaction_time,
            arrival_tick,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn transaction_time(&self) -> usize {
        self.transaction_time
    }

    pub fn arrival_tick(&self) -> usize {
        self.arrival_tick
    }

    /// Ticks spent in the wait queue if service starts at `start_tick`
    pub fn wait_until(&self, start_tick: usize) -> usize {
        start_tick.saturating_sub(self.arrival_tick)
    }
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.id, self.transaction_time, self.arrival_tick
        )
    }
}
