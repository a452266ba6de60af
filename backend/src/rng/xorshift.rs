//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG with 64-bit state. Same seed → same sequence of
//! arrival rolls and transaction times, which is what makes a simulated
//! business day reproducible from its seed alone.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use bank_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let roll = rng.range_inclusive(1, 100);
/// assert!((1..=100).contains(&roll));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is replaced with 1 since xorshift never leaves the
    /// all-zero state.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Generate random value in range [min, max]
    ///
    /// Used for the arrival roll (`1..=100`) and transaction time
    /// (`1..=max_transaction_time`) draws.
    ///
    /// # Panics
    /// Panics if min > max
    ///
    /// # Example
    /// ```
    /// use bank_simulator_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// assert_eq!(rng.range_inclusive(5, 5), 5);
    /// ```
    pub fn range_inclusive(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "min must not exceed max");
        self.range(min, max + 1)
    }

    /// Get current RNG state
    ///
    /// Feeding the state back into [`RngManager::new`] continues the same
    /// sequence.
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }
}
