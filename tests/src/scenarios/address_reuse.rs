//! Address reuse: outputs whose key material was already made public.

#[cfg(test)]
mod tests {
    use qs_03_attack_engine::{AttackStrategy, QuantumCapability};
    use shared_types::{AddressType, OutputSpec, TxStatus};
    use sim_runtime::{NetworkConfig, QuantumNetwork};

    fn capability() -> QuantumCapability {
        QuantumCapability {
            name: "IBM Quantum-X".into(),
            qubits: 4000,
            error_rate: 0.0005,
            key_derivation_time: 120.0,
            success_probability: 1.0,
        }
    }

    // =========================================================================
    // REUSED OUTPUT STATE
    // =========================================================================

    #[test]
    fn test_reused_output_arrives_pre_exposed() {
        let mut net = QuantumNetwork::new(NetworkConfig::for_testing());
        let seed = net.create_output(AddressType::P2pkh, 1.0).unwrap();
        let reused = net
            .create_reused_output(AddressType::P2pkh, 15.5, &seed.id)
            .unwrap();

        let stored = net.utxo(&reused.id).unwrap();
        assert!(stored.key_exposed);
        assert!(stored.exposure_count >= 2);
        assert_eq!(stored.keys, net.utxo(&seed.id).unwrap().keys);
    }

    #[test]
    fn test_spending_a_reused_output_keeps_its_exposure_count() {
        let mut net = QuantumNetwork::new(NetworkConfig::for_testing());
        let seed = net.create_output(AddressType::P2pkh, 1.0).unwrap();
        let reused = net
            .create_reused_output(AddressType::P2pkh, 15.5, &seed.id)
            .unwrap();
        let before = net.utxo(&reused.id).unwrap().exposure_count;

        net.broadcast_transaction(
            &[reused.id],
            &[OutputSpec::new("1LegacyMerchant", 15.3)],
            0.2,
            false,
        )
        .unwrap();

        // Exposure is monotonic: spending an already-exposed output never
        // bumps the counter again.
        assert_eq!(net.utxo(&reused.id).unwrap().exposure_count, before);
    }

    // =========================================================================
    // REUSE UNDER ATTACK
    // =========================================================================

    #[test]
    fn test_reused_high_value_spend_is_stolen() {
        let mut net = QuantumNetwork::new(NetworkConfig::for_testing());
        net.register_attacker("QuantumPirate", capability(), AttackStrategy::Aggressive);

        let seed = net.create_output(AddressType::P2pkh, 1.0).unwrap();
        let reused = net
            .create_reused_output(AddressType::P2pkh, 15.5, &seed.id)
            .unwrap();
        let txid = net
            .broadcast_transaction(
                &[reused.id],
                &[OutputSpec::new("1LegacyMerchant", 15.3)],
                0.2,
                false,
            )
            .unwrap();

        let report = net.run_attack_scan();
        assert_eq!(report.successes.len(), 1);

        net.mine_block();
        assert_eq!(net.transaction(&txid).unwrap().status, TxStatus::Stolen);
        // min(10 × 0.2, 0.5 × 15.5) = 2.0; 13.5 stolen.
        let pirate = net.attackers().get("QuantumPirate").unwrap();
        assert!((pirate.total_stolen - 13.5).abs() < 1e-9);
    }
}
