//! Attacker agents and targeting strategies.

use crate::capability::QuantumCapability;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared_types::Amount;

/// Parallel-break efficiency across multiple exposed keys in one
/// transaction (multisig): N keys cost N × 0.7, not N.
const PARALLEL_EFFICIENCY: f64 = 0.7;

/// Targeting strategy: a pure predicate over public mempool data.
///
/// Strategies read the transaction's total input value, never private
/// key material, which attackers by definition do not have yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackStrategy {
    /// Attack anything over 0.1 coin.
    Aggressive,
    /// Only high-value targets, over 5.0 coins.
    Selective,
    /// Over 1.0 coin, and only half the time.
    Opportunistic,
}

impl AttackStrategy {
    /// Whether a transaction with `total_value` input is worth attacking.
    ///
    /// Opportunistic draws its coin from the given generator; the other
    /// strategies never touch it.
    pub fn worth_attacking(&self, total_value: Amount, rng: &mut impl Rng) -> bool {
        match self {
            Self::Aggressive => total_value > 0.1,
            Self::Selective => total_value > 5.0,
            Self::Opportunistic => total_value > 1.0 && rng.gen::<f64>() > 0.5,
        }
    }
}

/// A quantum attacker: capability profile, strategy, running tallies.
///
/// Created once at simulation start; mutated only by the attack engine
/// (attempt outcomes) and block selection (settlement credit).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attacker {
    /// Unique attacker name.
    pub name: String,
    /// The machine this attacker operates.
    pub quantum_computer: QuantumCapability,
    /// Targeting strategy.
    pub strategy: AttackStrategy,
    /// Attacks that won settlement.
    pub successful_attacks: u32,
    /// Attempts that were too slow or decohered.
    pub failed_attacks: u32,
    /// Cumulative coins stolen.
    pub total_stolen: Amount,
    /// Current balance in coins.
    pub balance: Amount,
}

impl Attacker {
    /// Creates an attacker with zeroed tallies.
    pub fn new(name: impl Into<String>, quantum_computer: QuantumCapability, strategy: AttackStrategy) -> Self {
        Self {
            name: name.into(),
            quantum_computer,
            strategy,
            successful_attacks: 0,
            failed_attacks: 0,
            total_stolen: 0.0,
            balance: 0.0,
        }
    }

    /// Seconds needed to break `num_keys` exposed keys.
    ///
    /// Strictly positive and monotone in the key count; a transaction
    /// always exposes at least one key.
    pub fn estimate_attack_time(&self, num_keys: usize) -> f64 {
        self.quantum_computer.key_derivation_time * num_keys.max(1) as f64 * PARALLEL_EFFICIENCY
    }

    /// Success rate over all attempts, if any were made.
    pub fn success_rate(&self) -> Option<f64> {
        let total = self.successful_attacks + self.failed_attacks;
        (total > 0).then(|| f64::from(self.successful_attacks) / f64::from(total))
    }
}

/// All registered attackers, in registration order.
///
/// Registration order is the documented tie-break: when two attackers
/// independently succeed against the same transaction in one scan, the
/// earlier-registered one claims the attack slot.
#[derive(Debug, Default)]
pub struct AttackerRegistry {
    attackers: Vec<Attacker>,
}

impl AttackerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an attacker.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        quantum_computer: QuantumCapability,
        strategy: AttackStrategy,
    ) {
        let attacker = Attacker::new(name, quantum_computer, strategy);
        tracing::info!(
            name = %attacker.name,
            qubits = attacker.quantum_computer.qubits,
            strategy = ?attacker.strategy,
            "attacker registered"
        );
        self.attackers.push(attacker);
    }

    /// Looks up an attacker by name.
    pub fn get(&self, name: &str) -> Option<&Attacker> {
        self.attackers.iter().find(|a| a.name == name)
    }

    /// Mutable lookup by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Attacker> {
        self.attackers.iter_mut().find(|a| a.name == name)
    }

    /// Credits a settlement win to the named attacker.
    ///
    /// # Panics
    /// An unknown name here means attack metadata referencing an attacker
    /// that was never registered: an internal consistency fault, not a
    /// user error.
    pub fn credit_success(&mut self, name: &str, value: Amount) {
        let attacker = self
            .get_mut(name)
            .unwrap_or_else(|| panic!("unknown attacker '{name}' in attack metadata"));
        attacker.successful_attacks += 1;
        attacker.total_stolen += value;
        attacker.balance += value;
    }

    /// Attackers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Attacker> {
        self.attackers.iter()
    }

    /// Mutable iteration in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Attacker> {
        self.attackers.iter_mut()
    }

    /// Number of registered attackers.
    pub fn len(&self) -> usize {
        self.attackers.len()
    }

    /// True if no attacker is registered.
    pub fn is_empty(&self) -> bool {
        self.attackers.is_empty()
    }
}
