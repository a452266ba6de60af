//! Replay arrivals from recorded integer data
//!
//! Data is a whitespace-separated stream of integers consumed two per tick:
//! the first decides the arrival, the second the transaction time.
//!
//! ```text
//! arrived          = (a mod 100) + 1 <= arrival_probability_percent
//! transaction_time = (b mod max_transaction_time) + 1
//! ```
//!
//! Modulo is Euclidean, so negative values still land in range. Once the
//! pairs run out (a trailing unpaired integer is ignored) every further tick
//! reports no arrival.

use super::{Arrival, ArrivalError, ArrivalParams, ArrivalSource};
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Arrivals replayed from a recorded data stream
///
/// # Example
/// ```
/// use bank_simulator_core_rs::arrivals::{ArrivalParams, ArrivalSource, ReplayArrivals};
///
/// let params = ArrivalParams {
///     arrival_probability_percent: 50,
///     max_transaction_time: 10,
/// };
/// let mut source = ReplayArrivals::from_str_data("12 34\n77 5", params).unwrap();
///
/// let first = source.next_arrival(0);
/// assert!(first.arrived);                  // 12 % 100 + 1 = 13 <= 50
/// assert_eq!(first.transaction_time, 5);   // 34 % 10 + 1
///
/// assert!(!source.next_arrival(1).arrived); // 77 % 100 + 1 = 78 > 50
/// assert!(!source.next_arrival(2).arrived); // exhausted
/// ```
#[derive(Debug, Clone)]
pub struct ReplayArrivals {
    params: ArrivalParams,
    pairs: Vec<(i64, i64)>,
    cursor: usize,
    exhausted_logged: bool,
}

impl ReplayArrivals {
    /// Build from already-parsed integer values
    pub fn new(values: Vec<i64>, params: ArrivalParams) -> Result<Self, ArrivalError> {
        params.validate()?;
        let pairs = values
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();

        Ok(Self {
            params,
            pairs,
            cursor: 0,
            exhausted_logged: false,
        })
    }

    /// Parse whitespace-separated integers
    ///
    /// # Errors
    /// [`ArrivalError::InvalidReplayToken`] for the first token that is not
    /// an integer.
    pub fn from_str_data(data: &str, params: ArrivalParams) -> Result<Self, ArrivalError> {
        let values = data
            .split_whitespace()
            .enumerate()
            .map(|(position, token)| {
                token
                    .parse::<i64>()
                    .map_err(|_| ArrivalError::InvalidReplayToken {
                        position,
                        token: token.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(values, params)
    }

    /// Read and parse replay data from any reader
    pub fn from_reader<R: Read>(mut reader: R, params: ArrivalParams) -> Result<Self, ArrivalError> {
        let mut data = String::new();
        reader
            .read_to_string(&mut data)
            .map_err(|e| ArrivalError::Io(e.to_string()))?;
        Self::from_str_data(&data, params)
    }

    /// Read and parse a replay data file
    pub fn from_path<P: AsRef<Path>>(path: P, params: ArrivalParams) -> Result<Self, ArrivalError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| ArrivalError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(file, params)
    }

    /// Pairs not yet consumed
    pub fn remaining(&self) -> usize {
        self.pairs.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.pairs.len()
    }
}

impl ArrivalSource for ReplayArrivals {
    fn next_arrival(&mut self, tick: usize) -> Arrival {
        let Some(&(a, b)) = self.pairs.get(self.cursor) else {
            if !self.exhausted_logged {
                warn!(tick, "replay data exhausted; no further arrivals");
                self.exhausted_logged = true;
            }
            return Arrival::none();
        };
        self.cursor += 1;

        let roll = a.rem_euclid(100) + 1;
        let max_tt = self.params.max_transaction_time as i64;
        Arrival {
            arrived: self.params.is_arrival(roll),
            transaction_time: (b.rem_euclid(max_tt) + 1) as usize,
        }
    }

    fn name(&self) -> &'static str {
        "replay"
    }
}
