//! Simulation configuration.
//!
//! Defaults model mainnet circa height 850 000 with ten-minute blocks.
//! Every field can come from a JSON document or a `QS_`-prefixed
//! environment variable; the seed makes whole runs reproducible.

use crate::error::{NetworkError, Result};
use qs_02_mempool::MempoolConfig;
use serde::Deserialize;
use shared_types::Height;

/// Top-level simulation parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Chain height at simulation start.
    pub start_height: Height,
    /// Average block interval in seconds, the attacker's time budget.
    pub avg_block_interval_secs: f64,
    /// Seed for all randomness: key material, txid nonces, attack draws.
    pub rng_seed: u64,
    /// Whether the pool honors replace-by-fee.
    pub enable_rbf: bool,
    /// Minimum RBF fee bump percentage.
    pub rbf_min_bump_percent: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            start_height: 850_000,
            avg_block_interval_secs: 600.0,
            rng_seed: 42,
            enable_rbf: true,
            rbf_min_bump_percent: 10,
        }
    }
}

impl NetworkConfig {
    /// Parses a JSON document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `QS_RNG_SEED`, `QS_START_HEIGHT`, and
    /// `QS_BLOCK_INTERVAL_SECS` where set and parseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(seed) = std::env::var("QS_RNG_SEED") {
            if let Ok(seed) = seed.parse() {
                config.rng_seed = seed;
            }
        }
        if let Ok(height) = std::env::var("QS_START_HEIGHT") {
            if let Ok(height) = height.parse() {
                config.start_height = height;
            }
        }
        if let Ok(interval) = std::env::var("QS_BLOCK_INTERVAL_SECS") {
            if let Ok(interval) = interval.parse() {
                config.avg_block_interval_secs = interval;
            }
        }
        config
    }

    /// Checks parameter sanity.
    ///
    /// # Errors
    /// A non-positive block interval leaves attackers with no time axis.
    pub fn validate(&self) -> Result<()> {
        if self.avg_block_interval_secs <= 0.0 {
            return Err(NetworkError::Config(format!(
                "block interval must be positive, got {}",
                self.avg_block_interval_secs
            )));
        }
        Ok(())
    }

    /// The mempool slice of this configuration.
    pub fn mempool(&self) -> MempoolConfig {
        MempoolConfig {
            enable_rbf: self.enable_rbf,
            rbf_min_bump_percent: self.rbf_min_bump_percent,
        }
    }

    /// A fast-block config for tests.
    pub fn for_testing() -> Self {
        Self {
            avg_block_interval_secs: 600.0,
            rng_seed: 42,
            ..Default::default()
        }
    }
}
