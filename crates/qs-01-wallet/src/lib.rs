//! # Wallet Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Owns all key material and the authoritative UTXO set, and assembles
//! transactions from chosen inputs and outputs.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | A spent output is never selectable as an input | `builder.rs` - spent check in `build_transaction` |
//! | INVARIANT-2 | Key exposure is monotonic (`false → true`, once) | `shared-types` - `Utxo::expose()` |
//! | INVARIANT-3 | `sum(outputs) + fee ≤ sum(inputs)` | `builder.rs` - validated before any mutation |
//! | INVARIANT-4 | A failed build mutates nothing | `builder.rs` - validation pass precedes exposure pass |
//!
//! ## Exposure model
//!
//! An address only reveals a key *hash* until its owner spends; building a
//! transaction is the moment the full public key becomes visible to the
//! network, attackers included. Address reuse bypasses this:
//! `create_reused_output` constructs an output whose key is already public
//! (`exposure_count ≥ 2`), so an attacker can prepare before broadcast.

pub mod builder;
pub mod error;
pub mod keys;
pub mod registry;

pub use error::WalletError;
pub use keys::{KeyPair, KeyStore};
pub use registry::UtxoRegistry;
