//! Service Area
//!
//! Holds the three collections the engine moves customers and tellers
//! between:
//!
//! - **Customer queue**: FIFO of waiting customers, bounded by
//!   `customer_queue_limit`
//! - **Free-teller queue**: FIFO, so the teller that has been free the
//!   longest is used first
//! - **Busy-teller queue**: min-priority queue ordered by busy-interval end
//!   tick, ties resolved by insertion order
//!
//! # Critical Invariants
//!
//! 1. `num_waiting_customers() <= customer_queue_limit()` at all times
//! 2. Every teller is in exactly one of the free or busy queues
//! 3. Only busy tellers enter the busy queue

use crate::models::customer::Customer;
use crate::models::teller::{Teller, TellerError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use thiserror::Error;

/// Errors raised by service area container operations
#[derive(Debug, Error, PartialEq)]
pub enum ServiceAreaError {
    #[error("Customer queue is full (limit {limit}); customer {customer_id} rejected")]
    CustomerQueueFull { limit: usize, customer_id: usize },

    #[error("Teller {teller_id} is not busy and cannot enter the busy queue")]
    TellerNotBusy { teller_id: usize },
}

/// Busy-queue entry keyed by `(interval_end, sequence)`
///
/// `Ord` is reversed so `BinaryHeap` (a max-heap) pops the soonest-finishing
/// teller first, and among equal end ticks the one inserted first.
#[derive(Debug, Clone)]
struct BusyEntry {
    interval_end: usize,
    sequence: u64,
    teller: Teller,
}

impl BusyEntry {
    fn key(&self) -> (usize, u64) {
        (self.interval_end, self.sequence)
    }
}

impl PartialEq for BusyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for BusyEntry {}

impl PartialOrd for BusyEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BusyEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Compare two busy tellers by busy-interval end tick
///
/// Free tellers have no end tick and sort after every busy teller. Equal
/// results are left to the caller's tie-break (insertion order in the busy
/// queue).
pub fn compare_tellers(a: &Teller, b: &Teller) -> Ordering {
    match (a.interval_end(), b.interval_end()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Occupancy summary of a service area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAreaSummary {
    pub waiting_customers: usize,
    pub busy_tellers: usize,
    pub free_tellers: usize,
}

/// Queues of a single bank service floor
///
/// # Example
///
/// ```rust
/// use bank_simulator_core_rs::{Customer, ServiceArea};
///
/// let mut area = ServiceArea::new(4, 5, 1001);
/// assert_eq!(area.num_free_tellers(), 4);
///
/// area.insert_customer(Customer::new(1, 18, 10)).unwrap();
/// let customer = area.remove_customer().unwrap();
/// let mut teller = area.remove_free_teller().unwrap();
/// assert_eq!(teller.id(), 1001);
///
/// teller.assign(customer, 13).unwrap();
/// area.insert_busy_teller(teller).unwrap();
/// assert_eq!(area.next_completion_tick(), Some(31));
/// ```
#[derive(Debug, Clone)]
pub struct ServiceArea {
    customer_queue: VecDeque<Customer>,
    free_tellers: VecDeque<Teller>,
    busy_tellers: BinaryHeap<BusyEntry>,
    customer_queue_limit: usize,

    /// Next busy-queue insertion sequence number
    next_sequence: u64,
}

impl ServiceArea {
    /// Create a service area with `num_tellers` free tellers
    ///
    /// Teller ids are sequential from `starting_teller_id`, and the free
    /// queue holds them in id order.
    pub fn new(num_tellers: usize, customer_queue_limit: usize, starting_teller_id: usize) -> Self {
        let free_tellers = (0..num_tellers)
            .map(|offset| Teller::new(starting_teller_id + offset))
            .collect();

        Self {
            customer_queue: VecDeque::with_capacity(customer_queue_limit),
            free_tellers,
            busy_tellers: BinaryHeap::with_capacity(num_tellers),
            customer_queue_limit,
            next_sequence: 0,
        }
    }

    // ========================================================================
    // Customer Queue
    // ========================================================================

    /// Add a customer to the back of the wait queue
    ///
    /// # Errors
    /// [`ServiceAreaError::CustomerQueueFull`] when the queue is at its
    /// limit. Callers are expected to check [`Self::is_customer_queue_full`]
    /// first.
    pub fn insert_customer(&mut self, customer: Customer) -> Result<(), ServiceAreaError> {
        if self.is_customer_queue_full() {
            return Err(ServiceAreaError::CustomerQueueFull {
                limit: self.customer_queue_limit,
                customer_id: customer.id(),
            });
        }
        self.customer_queue.push_back(customer);
        Ok(())
    }

    /// Remove the customer that has waited longest
    pub fn remove_customer(&mut self) -> Option<Customer> {
        self.customer_queue.pop_front()
    }

    pub fn peek_customer(&self) -> Option<&Customer> {
        self.customer_queue.front()
    }

    pub fn num_waiting_customers(&self) -> usize {
        self.customer_queue.len()
    }

    pub fn is_customer_queue_empty(&self) -> bool {
        self.customer_queue.is_empty()
    }

    /// True when the wait queue length equals the limit
    ///
    /// A limit of 0 means the queue is always full.
    pub fn is_customer_queue_full(&self) -> bool {
        self.customer_queue.len() == self.customer_queue_limit
    }

    pub fn customer_queue_limit(&self) -> usize {
        self.customer_queue_limit
    }

    /// Waiting customers, front of the queue first
    pub fn waiting_customers(&self) -> impl Iterator<Item = &Customer> {
        self.customer_queue.iter()
    }

    // ========================================================================
    // Free Teller Queue
    // ========================================================================

    pub fn insert_free_teller(&mut self, teller: Teller) {
        self.free_tellers.push_back(teller);
    }

    /// Remove the teller that has been free the longest
    pub fn remove_free_teller(&mut self) -> Option<Teller> {
        self.free_tellers.pop_front()
    }

    pub fn peek_free_teller(&self) -> Option<&Teller> {
        self.free_tellers.front()
    }

    pub fn num_free_tellers(&self) -> usize {
        self.free_tellers.len()
    }

    pub fn is_free_queue_empty(&self) -> bool {
        self.free_tellers.is_empty()
    }

    /// Free tellers in queue order
    pub fn free_tellers(&self) -> impl Iterator<Item = &Teller> {
        self.free_tellers.iter()
    }

    // ========================================================================
    // Busy Teller Queue
    // ========================================================================

    /// Add a busy teller, keyed by its busy-interval end tick
    ///
    /// # Errors
    /// [`ServiceAreaError::TellerNotBusy`] if the teller has no open busy
    /// interval.
    pub fn insert_busy_teller(&mut self, teller: Teller) -> Result<(), ServiceAreaError> {
        let interval_end = match (teller.is_busy(), teller.interval_end()) {
            (true, Some(end)) => end,
            _ => {
                return Err(ServiceAreaError::TellerNotBusy {
                    teller_id: teller.id(),
                })
            }
        };

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.busy_tellers.push(BusyEntry {
            interval_end,
            sequence,
            teller,
        });
        Ok(())
    }

    /// Remove the busy teller that finishes soonest
    pub fn remove_busy_teller(&mut self) -> Option<Teller> {
        self.busy_tellers.pop().map(|entry| entry.teller)
    }

    pub fn peek_busy_teller(&self) -> Option<&Teller> {
        self.busy_tellers.peek().map(|entry| &entry.teller)
    }

    /// Earliest busy-interval end tick among busy tellers
    pub fn next_completion_tick(&self) -> Option<usize> {
        self.busy_tellers.peek().map(|entry| entry.interval_end)
    }

    pub fn num_busy_tellers(&self) -> usize {
        self.busy_tellers.len()
    }

    pub fn is_busy_queue_empty(&self) -> bool {
        self.busy_tellers.is_empty()
    }

    /// Busy tellers in the order they would be removed
    pub fn busy_tellers_in_order(&self) -> Vec<&Teller> {
        let mut entries: Vec<&BusyEntry> = self.busy_tellers.iter().collect();
        entries.sort_by(|a, b| {
            compare_tellers(&a.teller, &b.teller).then(a.sequence.cmp(&b.sequence))
        });
        entries.into_iter().map(|entry| &entry.teller).collect()
    }

    // ========================================================================
    // Whole-Area Operations
    // ========================================================================

    pub fn num_tellers(&self) -> usize {
        self.free_tellers.len() + self.busy_tellers.len()
    }

    /// All tellers: busy ones in removal order, then free ones in queue order
    pub fn tellers(&self) -> Vec<&Teller> {
        let mut tellers = self.busy_tellers_in_order();
        tellers.extend(self.free_tellers.iter());
        tellers
    }

    pub fn summary(&self) -> ServiceAreaSummary {
        ServiceAreaSummary {
            waiting_customers: self.num_waiting_customers(),
            busy_tellers: self.num_busy_tellers(),
            free_tellers: self.num_free_tellers(),
        }
    }

    /// Close every teller's open interval at `end_tick`
    ///
    /// Busy tellers stay in the busy queue with their ordering intact.
    pub fn finalize_tellers(&mut self, end_tick: usize) -> Result<(), TellerError> {
        for teller in self.free_tellers.iter_mut() {
            teller.finalize(end_tick)?;
        }

        let mut entries = std::mem::take(&mut self.busy_tellers).into_vec();
        let result = entries
            .iter_mut()
            .try_for_each(|entry| entry.teller.finalize(end_tick));
        self.busy_tellers = BinaryHeap::from(entries);
        result
    }
}
