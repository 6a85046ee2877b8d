//! # Transaction Pool (Mempool) Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Holds in-flight transactions keyed by id; supports admission, lookup,
//! replace-by-fee, and conflict grouping by spent-input set. The conflict
//! grouping is the authoritative double-spend detector.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | No duplicate transaction ids | `pool.rs` - `admit()` check |
//! | INVARIANT-2 | Only `Created` transactions are admitted | `pool.rs` - status check before broadcast |
//! | INVARIANT-3 | Two transactions conflict iff their input-id *sets* are identical | `pool.rs` - `ConflictKey` is the sorted, deduplicated input set |
//! | INVARIANT-4 | RBF never replaces an opted-out transaction | `pool.rs` - `can_replace()` |
//!
//! ## Lifecycle
//!
//! The pool lives one block: after resolution the runtime drains it and
//! pending transactions are implicitly dropped. No persistence across
//! blocks. An explicit model simplification, not a bug.

pub mod config;
pub mod errors;
pub mod pool;

pub use config::MempoolConfig;
pub use errors::MempoolError;
pub use pool::{ConflictKey, Mempool};
