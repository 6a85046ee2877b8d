//! # Attack Engine Subsystem
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Runs every registered quantum attacker against every eligible mempool
//! transaction once per round: a time-budget check against the block
//! window, a probabilistic key-derivation attempt, and, on success,
//! injection of a competing double-spend into the pool.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | First successful attacker claims the attack slot | `engine.rs` - outcomes applied in registration order, claimed targets dropped |
//! | INVARIANT-2 | A failed attempt never mutates the target | `engine.rs` - failures only touch attacker counters |
//! | INVARIANT-3 | One attacker's failure never blocks another's attempt | `engine.rs` - evaluation is per-(attacker, target) |
//! | INVARIANT-4 | Outcomes are schedule-independent | `engine.rs` - per-attempt RNG seeded from `(seed, attacker, target)` |
//!
//! ## Concurrency model
//!
//! Attacker evaluation is embarrassingly parallel: each attacker reads a
//! snapshot of the pool and emits outcomes (rayon fan-out). Outcome
//! application, the only writer of transaction status and pool inserts,
//! runs serially afterwards, so the attack-slot rule holds regardless of
//! how the evaluation was scheduled.

pub mod attacker;
pub mod capability;
pub mod engine;

pub use attacker::{AttackStrategy, Attacker, AttackerRegistry};
pub use capability::QuantumCapability;
pub use engine::{AttackEngine, AttackSuccess, ScanReport};
