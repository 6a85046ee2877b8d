//! # Simulation Runtime
//!
//! The facade tying the subsystems into one round loop:
//!
//! ```text
//! [wallet] ──build──→ [mempool] ──scan──→ [attack engine]
//!                         │                     │
//!                         │              competing spends
//!                         ↓                     ↓
//!                  [block selection] ←──────────┘
//!                         │
//!                         ↓
//!                   BlockSummary ──credit/spend──→ wallet + attackers
//! ```
//!
//! One `QuantumNetwork` owns every piece of mutable state; rounds are
//! `broadcast → run_attack_scan → mine_block`, fully deterministic for a
//! configured seed.

pub mod config;
pub mod error;
pub mod network;
pub mod telemetry;

pub use config::NetworkConfig;
pub use error::{NetworkError, Result};
pub use network::{NetworkStats, QuantumNetwork};
