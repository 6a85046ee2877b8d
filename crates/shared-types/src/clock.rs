//! Logical chain clock.
//!
//! The simulation has no wall-clock semantics: one block advances height by
//! one and time by the average block interval, nothing else moves time.

use crate::entities::{Height, SimTime};
use serde::{Deserialize, Serialize};

/// Chain height and simulated time, owned by the simulation context and
/// passed explicitly to each round phase. No process-wide singleton.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainClock {
    /// Current block height.
    pub height: Height,
    /// Simulated seconds since simulation start.
    pub now: SimTime,
    /// Average block interval in seconds (the attack window).
    pub block_interval: f64,
}

impl ChainClock {
    /// Creates a clock at the given start height with time zero.
    pub fn new(start_height: Height, block_interval: f64) -> Self {
        Self {
            height: start_height,
            now: 0.0,
            block_interval,
        }
    }

    /// Advances one block: height + 1, time + interval.
    pub fn advance_block(&mut self) {
        self.height += 1;
        self.now += self.block_interval;
    }

    /// Seconds left in the current block window for a transaction that
    /// entered the mempool at `broadcast_time`.
    pub fn remaining_block_time(&self, broadcast_time: SimTime) -> f64 {
        self.block_interval - (self.now - broadcast_time)
    }
}
