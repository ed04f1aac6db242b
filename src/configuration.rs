//! Config for the pairing behaviors
//!
//! This module provides the tunable parameters of a pairing run.
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override configuration values. All
//! values are optional. Values that cannot be parsed are ignored and the default is kept.
//!
//! - `PAIRING_POOL_TYPE`: `mixed` or `open` (default: `mixed`)
//! - `PAIRING_TIE_THRESHOLD`: average difference reported as a tie (default: `0.5`)
//! - `PAIRING_EPSILON`: near-optimal tolerance when choosing a split (default: `0.01`)
//! - `PAIRING_LEVEL_TOLERANCE`: largest level gap for a repair exchange (default: `3.0`)
//! - `PAIRING_REPAIR_PASSES`: bound on repair passes (default: `5`)
//! - `PAIRING_LOG`: set to `"true"` to log to a file (default: `false`)

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    GENDER_MIX_WEIGHT, LEFT_LEFT_WEIGHT, LEVEL_TOLERANCE, NEAR_OPTIMAL_EPSILON,
    PARTNER_DIFF_WEIGHT, REPAIR_PASSES, SAME_POSITION_WEIGHT, TIE_THRESHOLD,
};

/// Kind of session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolType {
    /// Teams should mix genders.
    #[default]
    Mixed,
    /// No gender preference.
    Open,
}

impl FromStr for PoolType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mixed" => Ok(PoolType::Mixed),
            "open" => Ok(PoolType::Open),
            other => Err(format!("unknown pool type '{other}' (expected 'mixed' or 'open')")),
        }
    }
}

/// Weights of the split metric secondary terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricWeights {
    /// In-team level gap.
    pub partner_diff: f64,
    /// Team sharing an explicit position.
    pub same_position: f64,
    /// Team of two left-handed players.
    pub left_left: f64,
    /// Unmixed teams in a mixed session.
    pub gender_mix: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            partner_diff: PARTNER_DIFF_WEIGHT,
            same_position: SAME_POSITION_WEIGHT,
            left_left: LEFT_LEFT_WEIGHT,
            gender_mix: GENDER_MIX_WEIGHT,
        }
    }
}

/// Configuration for pairing behaviors.
#[derive(Debug, Clone, Copy)]
pub struct Configuration {
    pub(crate) pool_type: PoolType,
    pub(crate) tie_threshold: f64,
    pub(crate) epsilon: f64,
    pub(crate) weights: MetricWeights,
    pub(crate) level_tolerance: f64,
    pub(crate) repair_passes: usize,
    pub(crate) log: bool,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - The pool is mixed.
    /// - Every weight and tolerance comes from [`constants`](crate::constants).
    /// - Logging to file is disabled.
    pub fn new() -> Self {
        Self {
            pool_type: PoolType::Mixed,
            tie_threshold: TIE_THRESHOLD,
            epsilon: NEAR_OPTIMAL_EPSILON,
            weights: MetricWeights::default(),
            level_tolerance: LEVEL_TOLERANCE,
            repair_passes: REPAIR_PASSES,
            log: false,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the [module documentation](self) for the recognized variables. Any variable that is
    /// unset or does not parse leaves the default value in place.
    pub fn from_env() -> Self {
        fn get_env<T: FromStr>(var: &str, default: T) -> T {
            std::env::var(var)
                .ok()
                .and_then(|val| val.trim().parse().ok())
                .unwrap_or(default)
        }

        let defaults = Self::new();
        Self {
            pool_type: get_env("PAIRING_POOL_TYPE", defaults.pool_type),
            tie_threshold: get_env("PAIRING_TIE_THRESHOLD", defaults.tie_threshold),
            epsilon: get_env("PAIRING_EPSILON", defaults.epsilon),
            weights: defaults.weights,
            level_tolerance: get_env("PAIRING_LEVEL_TOLERANCE", defaults.level_tolerance),
            repair_passes: get_env("PAIRING_REPAIR_PASSES", defaults.repair_passes),
            log: match std::env::var("PAIRING_LOG") {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => defaults.log,
            },
        }
    }

    /// Set the pool type.
    pub fn with_pool_type(mut self, value: PoolType) -> Self {
        self.pool_type = value;
        self
    }

    /// Set the largest average difference reported as a tie.
    pub fn with_tie_threshold(mut self, value: f64) -> Self {
        self.tie_threshold = value;
        self
    }

    /// Set the near-optimal tolerance used when choosing among splits.
    pub fn with_epsilon(mut self, value: f64) -> Self {
        self.epsilon = value;
        self
    }

    /// Override the metric weights.
    pub fn with_weights(mut self, value: MetricWeights) -> Self {
        self.weights = value;
        self
    }

    /// Set the largest level gap between two players exchanged by the repair phase.
    pub fn with_level_tolerance(mut self, value: f64) -> Self {
        self.level_tolerance = value;
        self
    }

    /// Set the bound on repair passes.
    pub fn with_repair_passes(mut self, value: usize) -> Self {
        self.repair_passes = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Pool type.
    pub fn pool_type(&self) -> PoolType {
        self.pool_type
    }

    /// Tie threshold.
    pub fn tie_threshold(&self) -> f64 {
        self.tie_threshold
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
