//! Event logging for simulation replay and auditing.
//!
//! Every state change the engine makes is recorded as an [`Event`], in the
//! order it happens within a tick. The log lets reporters reconstruct the
//! per-tick narrative of a run (who arrived, who left, which teller took
//! whom) without the engine printing anything itself.
//!
//! # Event Types
//!
//! - **CustomerArrived**: an arrival was generated and given an id
//! - **CustomerBalked**: the wait queue was full, the customer left
//! - **CustomerQueued**: the customer joined the wait queue
//! - **ServiceCompleted**: a teller finished its customer and became free
//! - **ServiceStarted**: a free teller took the customer at the queue front
//! - **TellerFinalized**: end-of-run closing of a teller's open interval
//!
//! # Example
//!
//! ```rust
//! use bank_simulator_core_rs::models::event::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::CustomerArrived {
//!     tick: 0,
//!     customer_id: 1,
//!     transaction_time: 5,
//! });
//!
//! assert_eq!(log.events_for_customer(1).len(), 1);
//! ```

use crate::models::teller::TellerState;
use serde::Serialize;

/// Simulation event capturing a state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    CustomerArrived {
        tick: usize,
        customer_id: usize,
        transaction_time: usize,
    },

    /// Customer turned away because the wait queue was at its limit
    CustomerBalked {
        tick: usize,
        customer_id: usize,
        queue_limit: usize,
    },

    CustomerQueued {
        tick: usize,
        customer_id: usize,
        queue_len: usize,
    },

    ServiceCompleted {
        tick: usize,
        teller_id: usize,
        customer_id: usize,
    },

    /// Teller began serving a customer; `waited` is ticks spent queued
    ServiceStarted {
        tick: usize,
        teller_id: usize,
        customer_id: usize,
        transaction_time: usize,
        waited: usize,
    },

    TellerFinalized {
        tick: usize,
        teller_id: usize,
        state: TellerState,
        total_free_time: usize,
        total_busy_time: usize,
    },
}

impl Event {
    /// Get the tick number when this event occurred
    pub fn tick(&self) -> usize {
        match self {
            Event::CustomerArrived { tick, .. } => *tick,
            Event::CustomerBalked { tick, .. } => *tick,
            Event::CustomerQueued { tick, .. } => *tick,
            Event::ServiceCompleted { tick, .. } => *tick,
            Event::ServiceStarted { tick, .. } => *tick,
            Event::TellerFinalized { tick, .. } => *tick,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::CustomerArrived { .. } => "CustomerArrived",
            Event::CustomerBalked { .. } => "CustomerBalked",
            Event::CustomerQueued { .. } => "CustomerQueued",
            Event::ServiceCompleted { .. } => "ServiceCompleted",
            Event::ServiceStarted { .. } => "ServiceStarted",
            Event::TellerFinalized { .. } => "TellerFinalized",
        }
    }

    /// Get customer ID if event relates to a specific customer
    pub fn customer_id(&self) -> Option<usize> {
        match self {
            Event::CustomerArrived { customer_id, .. }
            | Event::CustomerBalked { customer_id, .. }
            | Event::CustomerQueued { customer_id, .. }
            | Event::ServiceCompleted { customer_id, .. }
            | Event::ServiceStarted { customer_id, .. } => Some(*customer_id),
            Event::TellerFinalized { .. } => None,
        }
    }

    /// Get teller ID if event relates to a specific teller
    pub fn teller_id(&self) -> Option<usize> {
        match self {
            Event::ServiceCompleted { teller_id, .. }
            | Event::ServiceStarted { teller_id, .. }
            | Event::TellerFinalized { teller_id, .. } => Some(*teller_id),
            _ => None,
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::CustomerArrived {
                customer_id,
                transaction_time,
                ..
            } => write!(
                f,
                "Customer #{} arrives with transaction time {} unit(s).",
                customer_id, transaction_time
            ),
            Event::CustomerBalked { customer_id, .. } => {
                write!(f, "Customer queue full. Customer #{} leaves...", customer_id)
            }
            Event::CustomerQueued { customer_id, .. } => {
                write!(f, "Customer #{} waits in the customer queue.", customer_id)
            }
            Event::ServiceCompleted {
                teller_id,
                customer_id,
                ..
            } => write!(
                f,
                "Customer #{} is done. Teller #{} is free.",
                customer_id, teller_id
            ),
            Event::ServiceStarted {
                teller_id,
                customer_id,
                transaction_time,
                ..
            } => write!(
                f,
                "Customer #{} gets teller #{} for {} unit(s).",
                customer_id, teller_id, transaction_time
            ),
            Event::TellerFinalized {
                teller_id, state, ..
            } => write!(f, "Teller #{} closed while {:?}.", teller_id, state),
        }
    }
}

/// Event log for storing and querying simulation events.
///
/// This is a simple wrapper around Vec<Event> with convenience methods.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific tick
    pub fn events_at_tick(&self, tick: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific customer
    pub fn events_for_customer(&self, customer_id: usize) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.customer_id() == Some(customer_id))
            .collect()
    }

    /// Get events for a specific teller
    pub fn events_for_teller(&self, teller_id: usize) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.teller_id() == Some(teller_id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
