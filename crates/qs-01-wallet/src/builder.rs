//! Transaction assembly.
//!
//! Validation runs in full before any mutation: a build that fails leaves
//! every exposure flag exactly as it found it.

use crate::error::{Result, WalletError};
use crate::registry::UtxoRegistry;
use shared_types::{
    Amount, OutputSpec, SimTime, Transaction, TxId, TxInput, TxKind, TxStatus, AMOUNT_EPSILON,
};
use std::collections::BTreeSet;

impl UtxoRegistry {
    /// Builds a transaction spending `inputs` into `outputs` with `fee`.
    ///
    /// Side effect, observable externally: every not-yet-exposed input has
    /// its key material flipped to public, the moment of vulnerability
    /// the attack engine feeds on.
    ///
    /// The txid derives from the input id multiset plus a nonce from the
    /// seeded generator; signatures derive from `(txid, privkey)` and are
    /// opaque strings, not real signatures.
    ///
    /// # Errors
    /// `UnknownUtxo`, `DuplicateInput`, `SpentInput` on bad input
    /// references; `InvalidAmount` on a negative fee; `InsufficientFunds`
    /// if `sum(outputs) + fee > sum(inputs)`. No error mutates state.
    pub fn build_transaction(
        &mut self,
        inputs: &[shared_types::UtxoId],
        outputs: &[OutputSpec],
        fee: Amount,
        rbf: bool,
        now: SimTime,
    ) -> Result<Transaction> {
        if fee < 0.0 {
            return Err(WalletError::InvalidAmount { amount: fee });
        }

        // Validation pass: existence, uniqueness, spendability.
        let mut seen = BTreeSet::new();
        let mut total_in: Amount = 0.0;
        for id in inputs {
            let utxo = self.get(id).ok_or(WalletError::UnknownUtxo(*id))?;
            if !seen.insert(*id) {
                return Err(WalletError::DuplicateInput(*id));
            }
            if utxo.spent {
                return Err(WalletError::SpentInput(*id));
            }
            total_in += utxo.amount;
        }

        let total_out: Amount = outputs.iter().map(|o| o.amount).sum();
        if total_out + fee > total_in + AMOUNT_EPSILON {
            return Err(WalletError::InsufficientFunds {
                required: total_out + fee,
                available: total_in,
            });
        }

        // Txid from the input id multiset plus a nonce.
        let nonce: u64 = rand::Rng::gen(self.rng());
        let mut material: Vec<u8> = Vec::new();
        for id in inputs {
            material.extend_from_slice(&id.as_bytes());
        }
        material.extend_from_slice(&nonce.to_le_bytes());
        let txid = TxId::derive(&[&material]);

        // Exposure pass: all checks passed, mutations are safe now.
        let mut tx_inputs = Vec::with_capacity(inputs.len());
        let mut signatures = Vec::new();
        for id in inputs {
            let utxo = self.get_mut(id).expect("validated above");
            if !utxo.key_exposed {
                tracing::debug!(utxo = %id, address = %utxo.address, "exposing public key");
            }
            utxo.expose();
            let amount = utxo.amount;
            let keys = utxo.keys.clone();

            for key in &keys {
                let pair = self.key_store().get(key).expect("registry-allocated key");
                let sig_material = format!("{txid}{}", pair.privkey);
                let signature: String = shared_types::digest(&[sig_material.as_bytes()])
                    .iter()
                    .map(|b| format!("{b:02x}"))
                    .collect();
                signatures.push(signature);
            }

            tx_inputs.push(TxInput {
                utxo: *id,
                amount,
                keys,
            });
        }

        Ok(Transaction {
            txid,
            inputs: tx_inputs,
            outputs: outputs.to_vec(),
            fee,
            signatures,
            status: TxStatus::Created,
            broadcast_time: now,
            rbf_enabled: rbf,
            kind: TxKind::Regular,
            competing_txs: Vec::new(),
            attack: None,
        })
    }
}
