//! Honest settlement: no attackers registered, every broadcast confirms.

#[cfg(test)]
mod tests {
    use shared_types::{AddressType, OutputSpec, TxStatus};
    use sim_runtime::{NetworkConfig, NetworkError, QuantumNetwork};

    // =========================================================================
    // CONFIRMATION FLOW
    // =========================================================================

    #[test]
    fn test_two_blocks_of_honest_traffic_all_confirm() {
        let mut net = QuantumNetwork::new(NetworkConfig::for_testing());

        let a = net.create_output(AddressType::P2pkh, 15.5).unwrap();
        let b = net.create_output(AddressType::P2wpkh, 8.2).unwrap();
        let first = net
            .broadcast_transaction(&[a.id], &[OutputSpec::new("1Merchant", 15.4)], 0.1, false)
            .unwrap();
        let second = net
            .broadcast_transaction(&[b.id], &[OutputSpec::new("bc1q_shop", 8.1)], 0.1, false)
            .unwrap();

        let block_one = net.mine_block();
        assert_eq!(block_one.confirmed.len(), 2);
        assert_eq!(block_one.height, 850_001);

        let c = net.create_output(AddressType::P2tr, 22.0).unwrap();
        let third = net
            .broadcast_transaction(&[c.id], &[OutputSpec::new("bc1p_vault", 21.8)], 0.2, false)
            .unwrap();

        let block_two = net.mine_block();
        assert_eq!(block_two.confirmed_ids(), vec![third]);

        for txid in [first, second, third] {
            assert_eq!(net.transaction(&txid).unwrap().status, TxStatus::Confirmed);
        }

        let stats = net.stats();
        assert_eq!(stats.confirmed, 3);
        assert_eq!(stats.stolen, 0);
        assert_eq!(stats.blocks_mined, 2);
        assert_eq!(stats.height, 850_002);
        assert!((stats.now - 1200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_confirmed_inputs_are_never_spendable_again() {
        let mut net = QuantumNetwork::new(NetworkConfig::for_testing());
        let utxo = net.create_output(AddressType::P2wpkh, 8.2).unwrap();

        net.broadcast_transaction(&[utxo.id], &[OutputSpec::new("bc1q_shop", 8.1)], 0.1, false)
            .unwrap();
        net.mine_block();

        assert!(net.utxo(&utxo.id).unwrap().spent);
        let result = net.broadcast_transaction(
            &[utxo.id],
            &[OutputSpec::new("bc1q_other", 8.1)],
            0.1,
            false,
        );
        assert!(matches!(result, Err(NetworkError::Wallet(_))));
    }

    // =========================================================================
    // VALIDATION AT THE FACADE
    // =========================================================================

    #[test]
    fn test_wallet_rejections_surface_through_the_facade() {
        let mut net = QuantumNetwork::new(NetworkConfig::for_testing());
        let utxo = net.create_output(AddressType::P2wpkh, 1.0).unwrap();

        // Outputs plus fee exceed the input.
        let result = net.broadcast_transaction(
            &[utxo.id],
            &[OutputSpec::new("bc1q_shop", 1.5)],
            0.1,
            false,
        );
        assert!(matches!(result, Err(NetworkError::Wallet(_))));

        // The failed build must not leave the output exposed.
        assert!(!net.utxo(&utxo.id).unwrap().key_exposed);
    }
}
