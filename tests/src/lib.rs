//! # Quantum-Spend Test Suite
//!
//! End-to-end scenarios driving the full round loop through the
//! `QuantumNetwork` facade: honest settlement, the double-spend fee race,
//! address reuse, and replace-by-fee. Unit coverage lives with each
//! subsystem crate; these tests exercise the seams.

pub mod scenarios;
