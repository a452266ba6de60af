//! Simulation configuration
//!
//! The configuration layer owns the policy bounds (at most 10 tellers, 50
//! queue slots and so on). The engine itself trusts whatever configuration
//! it is handed; call [`SimulationConfig::validate`] before building one.
//!
//! # Example
//!
//! ```rust
//! use bank_simulator_core_rs::config::{ArrivalSourceConfig, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     simulation_horizon: 100,
//!     max_transaction_time: 10,
//!     arrival_probability_percent: 40,
//!     teller_count: 3,
//!     customer_queue_limit: 5,
//!     starting_teller_id: 1,
//!     arrival_source: ArrivalSourceConfig::Random { seed: 42 },
//! };
//!
//! config.validate().unwrap();
//! ```

use crate::arrivals::ArrivalParams;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} = {value} is outside the allowed range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to read config file: {0}")]
    Io(String),
}

/// Where customer arrivals come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArrivalSourceConfig {
    /// Seeded pseudo-random arrivals
    Random { seed: u64 },

    /// Integer pairs replayed from a data file
    Replay { path: PathBuf },
}

impl Default for ArrivalSourceConfig {
    fn default() -> Self {
        ArrivalSourceConfig::Random { seed: 0 }
    }
}

fn default_starting_teller_id() -> usize {
    1
}

/// Complete parameter set for one simulation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of ticks to simulate
    pub simulation_horizon: usize,

    /// Upper bound of customer transaction times
    pub max_transaction_time: usize,

    /// Chance (in percent) that a customer arrives on a given tick
    pub arrival_probability_percent: u32,

    pub teller_count: usize,

    /// Customers allowed to wait at once; arrivals beyond this balk
    pub customer_queue_limit: usize,

    /// Id given to the first teller; the rest follow sequentially
    #[serde(default = "default_starting_teller_id")]
    pub starting_teller_id: usize,

    #[serde(default)]
    pub arrival_source: ArrivalSourceConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulation_horizon: 100,
            max_transaction_time: 10,
            arrival_probability_percent: 50,
            teller_count: 3,
            customer_queue_limit: 5,
            starting_teller_id: default_starting_teller_id(),
            arrival_source: ArrivalSourceConfig::default(),
        }
    }
}

/// Policy bounds for each configurable parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLimits {
    pub simulation_horizon: RangeInclusive<usize>,
    pub max_transaction_time: RangeInclusive<usize>,
    pub arrival_probability_percent: RangeInclusive<u32>,
    pub teller_count: RangeInclusive<usize>,
    pub customer_queue_limit: RangeInclusive<usize>,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            simulation_horizon: 1..=10_000,
            max_transaction_time: 1..=500,
            arrival_probability_percent: 1..=100,
            teller_count: 0..=10,
            customer_queue_limit: 0..=50,
        }
    }
}

fn check_range<T>(field: &'static str, value: T, range: &RangeInclusive<T>) -> Result<(), ConfigError>
where
    T: PartialOrd + Copy + Into<u64>,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value.into(),
            min: (*range.start()).into(),
            max: (*range.end()).into(),
        })
    }
}

impl SimulationConfig {
    /// Validate against the default policy bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_with(&ConfigLimits::default())
    }

    /// Validate against custom policy bounds
    ///
    /// Fields are checked in declaration order; the first violation wins.
    pub fn validate_with(&self, limits: &ConfigLimits) -> Result<(), ConfigError> {
        check_range(
            "simulation_horizon",
            self.simulation_horizon as u64,
            &widen(&limits.simulation_horizon),
        )?;
        check_range(
            "max_transaction_time",
            self.max_transaction_time as u64,
            &widen(&limits.max_transaction_time),
        )?;
        check_range(
            "arrival_probability_percent",
            self.arrival_probability_percent,
            &limits.arrival_probability_percent,
        )?;
        check_range(
            "teller_count",
            self.teller_count as u64,
            &widen(&limits.teller_count),
        )?;
        check_range(
            "customer_queue_limit",
            self.customer_queue_limit as u64,
            &widen(&limits.customer_queue_limit),
        )?;
        Ok(())
    }

    /// Arrival parameters derived from this configuration
    pub fn arrival_params(&self) -> ArrivalParams {
        ArrivalParams {
            arrival_probability_percent: self.arrival_probability_percent,
            max_transaction_time: self.max_transaction_time,
        }
    }

    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}

fn widen(range: &RangeInclusive<usize>) -> RangeInclusive<u64> {
    (*range.start() as u64)..=(*range.end() as u64)
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Uses canonical JSON serialization with sorted keys, so two reports with
/// the same fingerprint were produced from identical parameters.
pub fn config_fingerprint<T: Serialize>(config: &T) -> Result<String, serde_json::Error> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let canonical_value = canonicalize(serde_json::to_value(config)?);
    let json = serde_json::to_string(&canonical_value)?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
