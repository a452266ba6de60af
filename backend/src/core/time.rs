//! Time management for the simulation
//!
//! The simulation operates in discrete ticks over a fixed horizon.
//! Tick indices run from `0` to `horizon - 1`; once the clock reaches the
//! horizon the run is over and no further ticks execute.

use serde::{Deserialize, Serialize};

/// Tracks the current tick against a fixed simulation horizon
///
/// # Example
/// ```
/// use bank_simulator_core_rs::TimeManager;
///
/// let mut time = TimeManager::new(3);
/// assert_eq!(time.current_tick(), 0);
/// assert!(!time.is_finished());
///
/// time.advance_tick();
/// time.advance_tick();
/// time.advance_tick();
/// assert!(time.is_finished());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeManager {
    /// Index of the next tick to execute
    current_tick: usize,
    /// Total ticks in the run
    horizon: usize,
}

impl TimeManager {
    /// Create a clock positioned at tick 0
    ///
    /// A zero horizon is accepted and is finished immediately.
    pub fn new(horizon: usize) -> Self {
        Self {
            current_tick: 0,
            horizon,
        }
    }

    /// Advance time by one tick
    ///
    /// # Panics
    /// Panics if the clock is already at the horizon.
    pub fn advance_tick(&mut self) {
        assert!(
            self.current_tick < self.horizon,
            "cannot advance past simulation horizon"
        );
        self.current_tick += 1;
    }

    /// Get the index of the tick that will execute next
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    /// Get the simulation horizon
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// True once every tick in `0..horizon` has executed
    ///
    /// # Example
    /// ```
    /// use bank_simulator_core_rs::TimeManager;
    ///
    /// let time = TimeManager::new(0);
    /// assert!(time.is_finished());
    /// ```
    pub fn is_finished(&self) -> bool {
        self.current_tick >= self.horizon
    }

    /// Number of ticks still to execute
    pub fn remaining_ticks(&self) -> usize {
        self.horizon - self.current_tick
    }
}
