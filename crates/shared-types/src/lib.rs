//! # Shared Types Crate
//!
//! Core domain entities for the Quantum-Spend simulation, shared across
//! all subsystem crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Snapshot, not state**: A `Transaction` carries the value/key snapshot
//!   of its inputs needed for fee arithmetic; the authoritative exposure and
//!   spent state of a UTXO lives only in the wallet registry.
//! - **Monotonic flags**: `Utxo::expose()` and `Utxo::mark_spent()` only
//!   ever flip `false → true`.

pub mod clock;
pub mod entities;
pub mod ids;

pub use clock::ChainClock;
pub use entities::*;
pub use ids::{digest, KeyPairId, TxId, UtxoId};
