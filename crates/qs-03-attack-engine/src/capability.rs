//! Quantum computer capability profile.

use serde::{Deserialize, Serialize};

/// Qubit count Shor's algorithm needs for secp256k1 (order of magnitude).
const SHOR_QUBIT_FLOOR: u32 = 2000;

/// Error-rate ceiling for a usable logical-qubit machine.
const SHOR_ERROR_CEILING: f64 = 0.001;

/// Capability profile of an attacker's quantum computer.
///
/// All figures are scenario parameters, not physics; no real quantum
/// algorithm is modeled.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuantumCapability {
    /// Machine name, for reporting ("IBM Quantum-X").
    pub name: String,
    /// Logical qubit count.
    pub qubits: u32,
    /// Gate error rate.
    pub error_rate: f64,
    /// Seconds to derive one private key from an exposed public key.
    pub key_derivation_time: f64,
    /// Probability a completed derivation survives decoherence.
    pub success_probability: f64,
}

impl QuantumCapability {
    /// Whether the machine is plausibly powerful enough for secp256k1.
    ///
    /// Informational readout for reporting. The scan itself is decided by
    /// the time budget and the success draw; a machine below this bar can
    /// still attack, it just narrates as sub-threshold.
    pub fn can_break_secp256k1(&self) -> bool {
        self.qubits >= SHOR_QUBIT_FLOOR && self.error_rate < SHOR_ERROR_CEILING
    }
}
