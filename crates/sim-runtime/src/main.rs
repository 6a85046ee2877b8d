//! # Quantum-Spend Simulation
//!
//! Entry point for the demonstration scenario: three attackers with
//! different hardware and targeting strategies race a handful of wallet
//! spends over a few blocks.
//!
//! ## Round Loop
//!
//! 1. Fund outputs and broadcast wallet spends
//! 2. Run the attack scan (every attacker evaluates the pool)
//! 3. Mine: proof-of-fee settlement, one winner per conflict group
//!
//! Configuration comes from `QS_RNG_SEED`, `QS_START_HEIGHT`, and
//! `QS_BLOCK_INTERVAL_SECS`; log filtering from `QS_LOG_LEVEL`.

use sim_runtime::{telemetry, NetworkConfig, NetworkError, QuantumNetwork};

use qs_03_attack_engine::{AttackStrategy, QuantumCapability};
use shared_types::{AddressType, OutputSpec};
use tracing::info;

fn main() -> Result<(), NetworkError> {
    telemetry::init("info");

    let config = NetworkConfig::from_env();
    config.validate()?;

    info!("===========================================");
    info!("  Quantum-Spend Simulation v0.1.0");
    info!("  Proof-of-fee double-spend race model");
    info!("===========================================");

    let mut network = QuantumNetwork::new(config);

    network.register_attacker(
        "QuantumPirate",
        QuantumCapability {
            name: "IBM Quantum-X 4000".into(),
            qubits: 4000,
            error_rate: 0.0005,
            key_derivation_time: 120.0,
            success_probability: 0.95,
        },
        AttackStrategy::Aggressive,
    );
    network.register_attacker(
        "CryptoThief",
        QuantumCapability {
            name: "Google Sycamore-Next".into(),
            qubits: 6000,
            // Sits at the decoherence bar: narrated as sub-threshold
            // hardware, but the race is decided by timing and the draw.
            error_rate: 0.001,
            key_derivation_time: 300.0,
            success_probability: 0.85,
        },
        AttackStrategy::Selective,
    );
    network.register_attacker(
        "Opportunist",
        QuantumCapability {
            name: "IonQ Forte-II".into(),
            qubits: 3000,
            error_rate: 0.0009,
            key_derivation_time: 200.0,
            success_probability: 0.75,
        },
        AttackStrategy::Opportunistic,
    );

    // Round 1: a spread of spend sizes, one per address era.
    let tiny = network.create_output(AddressType::P2pkh, 0.05)?;
    let medium = network.create_output(AddressType::P2wpkh, 8.2)?;
    let large = network.create_output(AddressType::P2tr, 22.0)?;

    network.broadcast_transaction(
        &[tiny.id],
        &[OutputSpec::new("bc1q_coffee_shop", 0.045)],
        0.005,
        false,
    )?;
    network.broadcast_transaction(
        &[medium.id],
        &[OutputSpec::new("bc1q_exchange_hot", 8.1)],
        0.1,
        true,
    )?;
    network.broadcast_transaction(
        &[large.id],
        &[OutputSpec::new("bc1q_otc_desk", 21.8)],
        0.2,
        false,
    )?;

    run_round(&mut network, 1);

    // Round 2: a reused address hands attackers pre-exposed keys, and a
    // multisig spend stretches their time budget.
    let seed_output = network.create_output(AddressType::P2pkh, 1.0)?;
    let reused = network.create_reused_output(AddressType::P2pkh, 15.5, &seed_output.id)?;
    let multisig = network.create_output(AddressType::P2wshMultisig3of5, 50.0)?;

    network.broadcast_transaction(
        &[reused.id],
        &[OutputSpec::new("1LegacyMerchant", 15.3)],
        0.2,
        false,
    )?;
    network.broadcast_transaction(
        &[multisig.id],
        &[OutputSpec::new("bc1q_treasury_cold", 49.5)],
        0.5,
        false,
    )?;

    run_round(&mut network, 2);

    let stats = network.stats();
    info!("=========== FINAL REPORT ===========");
    info!(
        height = stats.height,
        blocks = stats.blocks_mined,
        confirmed = stats.confirmed,
        stolen = stats.stolen,
        "chain state"
    );
    info!(
        stolen_value = stats.total_stolen_value,
        fees = stats.total_fees,
        "value flow"
    );
    for attacker in network.attackers().iter() {
        info!(
            attacker = %attacker.name,
            hardware = %attacker.quantum_computer.name,
            successes = attacker.successful_attacks,
            failures = attacker.failed_attacks,
            stolen = attacker.total_stolen,
            success_rate = ?attacker.success_rate(),
            "attacker tally"
        );
    }

    Ok(())
}

fn run_round(network: &mut QuantumNetwork, round: u32) {
    let report = network.run_attack_scan();
    info!(
        round,
        attempts = report.attempts,
        failures = report.failures,
        successes = report.successes.len(),
        "attack scan complete"
    );

    let block = network.mine_block();
    info!(
        round,
        height = block.height,
        confirmed = block.confirmed.len(),
        stolen = block.stolen.len(),
        discarded = block.discarded.len(),
        fees = block.total_fees(),
        "block mined"
    );
}
