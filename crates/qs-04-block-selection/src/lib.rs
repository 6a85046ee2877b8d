//! # Subsystem 04: Block Selection
//!
//! Resolves each mempool conflict group under proof-of-fee and produces the
//! block summary. One pool lifetime per block: everything not finalized is
//! discarded with the drained pool.
//!
//! ## Invariants Enforced
//!
//! - INVARIANT-1: Exactly one winner per conflict group (highest fee, ties
//!   to the smallest transaction id)
//! - INVARIANT-2: Per contested group, exactly one wallet-built member
//!   reaches `Confirmed` or `Stolen`; losers keep their status and are
//!   dropped
//! - INVARIANT-3: A winning attack spend settles against its victim: the
//!   victim transitions `Attacked → Stolen` and the theft is recorded

pub mod selector;

pub use selector::{BlockSelector, BlockSummary, Theft};
