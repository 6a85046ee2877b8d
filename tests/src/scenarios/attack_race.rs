//! The double-spend fee race, end to end.

#[cfg(test)]
mod tests {
    use qs_03_attack_engine::{AttackStrategy, QuantumCapability};
    use shared_types::{AddressType, OutputSpec, TxKind, TxStatus};
    use sim_runtime::{NetworkConfig, QuantumNetwork};

    fn capability(key_derivation_time: f64, success_probability: f64) -> QuantumCapability {
        QuantumCapability {
            name: "IBM Quantum-X".into(),
            qubits: 4000,
            error_rate: 0.0005,
            key_derivation_time,
            success_probability,
        }
    }

    fn network() -> QuantumNetwork {
        QuantumNetwork::new(NetworkConfig::for_testing())
    }

    // =========================================================================
    // FULL RACE: BROADCAST → SCAN → MINE
    // =========================================================================

    #[test]
    fn test_high_value_spend_loses_the_fee_race() {
        let mut net = network();
        net.register_attacker(
            "QuantumPirate",
            capability(120.0, 1.0),
            AttackStrategy::Aggressive,
        );

        let utxo = net.create_output(AddressType::P2tr, 22.0).unwrap();
        let txid = net
            .broadcast_transaction(
                &[utxo.id],
                &[OutputSpec::new("bc1q_otc_desk", 21.8)],
                0.2,
                false,
            )
            .unwrap();

        let report = net.run_attack_scan();
        assert_eq!(report.successes.len(), 1);
        let competing_id = report.successes[0].competing;

        // Both rivals are live in the pool until the block settles.
        assert_eq!(net.pool().len(), 2);
        assert_eq!(net.transaction(&txid).unwrap().status, TxStatus::Attacked);

        let block = net.mine_block();
        assert!(block.confirmed.is_empty());
        assert_eq!(block.stolen[0].txid, txid);
        assert_eq!(block.attack_spends[0].txid, competing_id);
        assert_eq!(
            block.attack_spends[0].kind,
            TxKind::AttackSpend { victim: txid }
        );

        // The attacker out-bid 0.2 with min(10 × 0.2, 11.0) = 2.0 and keeps
        // the 20.0 remainder.
        let victim = net.transaction(&txid).unwrap();
        assert_eq!(victim.status, TxStatus::Stolen);
        let meta = victim.attack.as_ref().unwrap();
        assert!((meta.attack_fee - 2.0).abs() < 1e-9);
        assert!((meta.value - 20.0).abs() < 1e-9);

        let pirate = net.attackers().get("QuantumPirate").unwrap();
        assert_eq!(pirate.successful_attacks, 1);
        assert!((pirate.balance - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_dust_spend_confirms_under_aggressive_attacker() {
        let mut net = network();
        net.register_attacker(
            "QuantumPirate",
            capability(120.0, 1.0),
            AttackStrategy::Aggressive,
        );

        // 0.05 sits below even the aggressive 0.1 threshold.
        let utxo = net.create_output(AddressType::P2pkh, 0.05).unwrap();
        let txid = net
            .broadcast_transaction(
                &[utxo.id],
                &[OutputSpec::new("bc1q_coffee_shop", 0.045)],
                0.005,
                false,
            )
            .unwrap();

        let report = net.run_attack_scan();
        assert_eq!(report.attempts, 0);

        let block = net.mine_block();
        assert_eq!(block.confirmed_ids(), vec![txid]);
    }

    #[test]
    fn test_multisig_spend_outlasts_a_slow_attacker() {
        let mut net = network();
        // 250 s/key over five keys: 875 s of work against a 600 s window.
        net.register_attacker(
            "EdgeRunner",
            capability(250.0, 1.0),
            AttackStrategy::Aggressive,
        );

        let utxo = net
            .create_output(AddressType::P2wshMultisig3of5, 50.0)
            .unwrap();
        let txid = net
            .broadcast_transaction(
                &[utxo.id],
                &[OutputSpec::new("bc1q_treasury_cold", 49.5)],
                0.5,
                false,
            )
            .unwrap();

        let report = net.run_attack_scan();
        assert_eq!(report.failures, 1);

        let block = net.mine_block();
        assert_eq!(block.confirmed_ids(), vec![txid]);
        assert_eq!(net.attackers().get("EdgeRunner").unwrap().failed_attacks, 1);
    }

    // =========================================================================
    // STRATEGY FILTERING
    // =========================================================================

    #[test]
    fn test_selective_attacker_leaves_mid_value_spends_alone() {
        let mut net = network();
        // Registered first, but 3.0 coins sits under the selective 5.0 bar.
        net.register_attacker(
            "CryptoThief",
            capability(120.0, 1.0),
            AttackStrategy::Selective,
        );
        net.register_attacker(
            "QuantumPirate",
            capability(120.0, 1.0),
            AttackStrategy::Aggressive,
        );

        let utxo = net.create_output(AddressType::P2wpkh, 3.0).unwrap();
        net.broadcast_transaction(&[utxo.id], &[OutputSpec::new("bc1q_shop", 2.9)], 0.1, false)
            .unwrap();

        let report = net.run_attack_scan();
        assert_eq!(report.successes.len(), 1);
        assert_eq!(report.successes[0].attacker, "QuantumPirate");
        assert_eq!(net.attackers().get("CryptoThief").unwrap().failed_attacks, 0);
    }

    // =========================================================================
    // MIXED POOLS
    // =========================================================================

    #[test]
    fn test_attack_on_one_group_spares_the_other() {
        let mut net = network();
        net.register_attacker(
            "CryptoThief",
            capability(120.0, 1.0),
            AttackStrategy::Selective,
        );

        let small = net.create_output(AddressType::P2wpkh, 2.0).unwrap();
        let large = net.create_output(AddressType::P2tr, 22.0).unwrap();
        let bystander = net
            .broadcast_transaction(&[small.id], &[OutputSpec::new("bc1q_shop", 1.9)], 0.1, false)
            .unwrap();
        let victim = net
            .broadcast_transaction(
                &[large.id],
                &[OutputSpec::new("bc1q_otc_desk", 21.8)],
                0.2,
                false,
            )
            .unwrap();

        net.run_attack_scan();
        let block = net.mine_block();

        assert_eq!(block.confirmed_ids(), vec![bystander]);
        assert_eq!(block.stolen[0].txid, victim);
        assert!(net.utxo(&small.id).unwrap().spent);
        assert!(net.utxo(&large.id).unwrap().spent);
    }

    // =========================================================================
    // DETERMINISM
    // =========================================================================

    #[test]
    fn test_full_two_round_run_replays_identically() {
        let run = || {
            let mut net = network();
            net.register_attacker(
                "Opportunist",
                capability(200.0, 0.75),
                AttackStrategy::Opportunistic,
            );

            let mut outcomes = Vec::new();
            for round in 0..2u32 {
                let amount = 10.0 + f64::from(round);
                let utxo = net.create_output(AddressType::P2wpkh, amount).unwrap();
                let txid = net
                    .broadcast_transaction(
                        &[utxo.id],
                        &[OutputSpec::new("bc1q_shop", amount - 0.1)],
                        0.1,
                        false,
                    )
                    .unwrap();
                net.run_attack_scan();
                net.mine_block();
                outcomes.push((txid, net.transaction(&txid).unwrap().status));
            }
            outcomes
        };

        assert_eq!(run(), run());
    }
}
