//! Domain models for the bank simulator

pub mod customer;
pub mod event;
pub mod service_area;
pub mod teller;

// Re-exports
pub use customer::Customer;
pub use event::{Event, EventLog};
pub use service_area::{ServiceArea, ServiceAreaError, ServiceAreaSummary};
pub use teller::{Teller, TellerError, TellerState};
