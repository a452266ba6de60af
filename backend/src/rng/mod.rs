//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm. Every random draw in a run (arrival
//! rolls, transaction times) goes through this module so a seed fully
//! determines the run.

mod xorshift;

pub use xorshift::RngManager;
