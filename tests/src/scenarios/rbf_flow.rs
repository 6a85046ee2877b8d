//! Replace-by-fee through the full round loop.

#[cfg(test)]
mod tests {
    use qs_02_mempool::MempoolError;
    use shared_types::{AddressType, OutputSpec, TxStatus};
    use sim_runtime::{NetworkConfig, NetworkError, QuantumNetwork};

    // =========================================================================
    // REPLACEMENT FLOW
    // =========================================================================

    #[test]
    fn test_replacement_confirms_and_original_is_archived() {
        let mut net = QuantumNetwork::new(NetworkConfig::for_testing());
        let utxo = net.create_output(AddressType::P2wpkh, 8.2).unwrap();

        let original = net
            .broadcast_transaction(&[utxo.id], &[OutputSpec::new("bc1q_shop", 8.1)], 0.1, true)
            .unwrap();
        let replacement = net
            .replace_by_fee(&[utxo.id], &[OutputSpec::new("bc1q_shop", 8.0)], 0.2)
            .unwrap();

        assert_eq!(net.pool().len(), 1);
        assert_eq!(
            net.transaction(&original).unwrap().status,
            TxStatus::RbfReplaced
        );

        let block = net.mine_block();
        assert_eq!(block.confirmed_ids(), vec![replacement]);
        assert_eq!(
            net.transaction(&replacement).unwrap().status,
            TxStatus::Confirmed
        );
    }

    #[test]
    fn test_insufficient_bump_leaves_the_original_standing() {
        let mut net = QuantumNetwork::new(NetworkConfig::for_testing());
        let utxo = net.create_output(AddressType::P2wpkh, 8.2).unwrap();

        let original = net
            .broadcast_transaction(&[utxo.id], &[OutputSpec::new("bc1q_shop", 8.1)], 0.1, true)
            .unwrap();
        // 5% against the default 10% minimum.
        let result = net.replace_by_fee(&[utxo.id], &[OutputSpec::new("bc1q_shop", 8.0)], 0.105);

        assert!(matches!(
            result,
            Err(NetworkError::Mempool(MempoolError::InsufficientFeeBump { .. }))
        ));
        assert_eq!(net.pool().len(), 1);
        assert!(net.pool().contains(&original));
    }

    // =========================================================================
    // RBF DISABLED NETWORK-WIDE
    // =========================================================================

    #[test]
    fn test_disabled_rbf_rejects_every_replacement() {
        let config = NetworkConfig {
            enable_rbf: false,
            ..NetworkConfig::for_testing()
        };
        let mut net = QuantumNetwork::new(config);
        let utxo = net.create_output(AddressType::P2wpkh, 8.2).unwrap();

        // Even an opted-in original cannot be replaced on this network.
        net.broadcast_transaction(&[utxo.id], &[OutputSpec::new("bc1q_shop", 8.1)], 0.1, true)
            .unwrap();
        let result = net.replace_by_fee(&[utxo.id], &[OutputSpec::new("bc1q_shop", 7.0)], 1.0);

        assert!(matches!(
            result,
            Err(NetworkError::Mempool(MempoolError::RbfDisabled(_)))
        ));
    }
}
