//! The authoritative UTXO set.
//!
//! Owns every output's mutable state (exposure, spent flag). Other
//! subsystems hold `UtxoId`s and value snapshots, never this state.

use crate::error::{Result, WalletError};
use crate::keys::KeyStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::{AddressType, Amount, Height, KeyPairId, TxId, Utxo, UtxoId};
use std::collections::BTreeMap;

/// UTXO registry plus the key store behind it.
///
/// Seeded: every id, key, and address of a run reproduces from the seed.
#[derive(Debug)]
pub struct UtxoRegistry {
    utxos: BTreeMap<UtxoId, Utxo>,
    keys: KeyStore,
    rng: StdRng,
}

impl UtxoRegistry {
    /// Creates an empty registry with a seeded generator.
    pub fn new(seed: u64) -> Self {
        Self {
            utxos: BTreeMap::new(),
            keys: KeyStore::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Allocates fresh key material and a funded output at `height`.
    ///
    /// Multisig address types allocate their full key set. The address
    /// string is derived deterministically from the key material, with the
    /// prefix and program length depending on the script template.
    ///
    /// # Errors
    /// `InvalidAmount` if `amount ≤ 0`.
    pub fn create_output(
        &mut self,
        address_type: AddressType,
        amount: Amount,
        height: Height,
    ) -> Result<Utxo> {
        if amount <= 0.0 {
            return Err(WalletError::InvalidAmount { amount });
        }

        let keys: Vec<KeyPairId> = (0..address_type.key_count())
            .map(|_| self.keys.allocate(&mut self.rng))
            .collect();

        let utxo = self.assemble(address_type, amount, height, keys, false, 0);
        Ok(utxo)
    }

    /// Constructs an output on *reused* key material.
    ///
    /// The new output shares the source's keys and starts already exposed
    /// with `exposure_count ≥ 2`: the public key went on the wire when the
    /// source address was first spent, so an attacker can begin deriving
    /// the private key before this output's spend is even broadcast. This
    /// deliberately bypasses the exposure-on-spend rule.
    ///
    /// # Errors
    /// `InvalidAmount` if `amount ≤ 0`; `UnknownUtxo` if the source is not
    /// in the registry.
    pub fn create_reused_output(
        &mut self,
        address_type: AddressType,
        amount: Amount,
        height: Height,
        source: &UtxoId,
    ) -> Result<Utxo> {
        if amount <= 0.0 {
            return Err(WalletError::InvalidAmount { amount });
        }
        let source = self
            .utxos
            .get(source)
            .ok_or(WalletError::UnknownUtxo(*source))?;
        let keys = source.keys.clone();
        let exposure_count = source.exposure_count.max(1) + 1;

        tracing::warn!(
            source = %source.id,
            exposure_count,
            "address reuse: key material is already public"
        );

        let utxo = self.assemble(address_type, amount, height, keys, true, exposure_count);
        Ok(utxo)
    }

    fn assemble(
        &mut self,
        address_type: AddressType,
        amount: Amount,
        height: Height,
        keys: Vec<KeyPairId>,
        key_exposed: bool,
        exposure_count: u32,
    ) -> Utxo {
        let nonce: u64 = self.rng.gen();
        let origin = TxId::derive(&[b"coinbase", &nonce.to_le_bytes()]);
        let id = UtxoId::new(origin, 0);
        let address = self.derive_address(address_type, &keys);

        let utxo = Utxo {
            id,
            address,
            address_type,
            amount,
            keys,
            key_exposed,
            exposure_count,
            created_height: height,
            spent: false,
        };
        self.utxos.insert(id, utxo.clone());
        utxo
    }

    /// Derives the address string for a key set.
    ///
    /// Prefix and program length per template; multisig addresses commit to
    /// the digest of all public keys.
    fn derive_address(&self, address_type: AddressType, keys: &[KeyPairId]) -> String {
        let program: String = if keys.len() == 1 {
            self.keys
                .get(&keys[0])
                .map(|k| k.pubkey_hash.clone())
                .unwrap_or_default()
        } else {
            let material: Vec<u8> = keys
                .iter()
                .flat_map(|k| {
                    self.keys
                        .get(k)
                        .map(|p| p.pubkey.clone().into_bytes())
                        .unwrap_or_default()
                })
                .collect();
            shared_types::digest(&[&material])
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect()
        };

        match address_type {
            AddressType::P2pkh => format!("1{}", &program[..33]),
            AddressType::P2wpkh => format!("bc1q{}", &program[..38]),
            AddressType::P2tr => format!("bc1p{}", &program[..58]),
            AddressType::P2shMultisig2of3 => format!("3{}", &program[..33]),
            AddressType::P2wshMultisig3of5 => format!("bc1q{}", &program[..58]),
        }
    }

    /// Looks up an output.
    pub fn get(&self, id: &UtxoId) -> Option<&Utxo> {
        self.utxos.get(id)
    }

    /// Mutable lookup, for the builder's exposure pass.
    pub(crate) fn get_mut(&mut self, id: &UtxoId) -> Option<&mut Utxo> {
        self.utxos.get_mut(id)
    }

    /// The key store (signature derivation).
    pub(crate) fn key_store(&self) -> &KeyStore {
        &self.keys
    }

    /// Seeded generator handle (txid nonces).
    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Marks an output spent after block inclusion. Monotonic; unknown ids
    /// are ignored (synthetic attack spends reference victim inputs that
    /// are always present, so this is only hit by tests).
    pub fn mark_spent(&mut self, id: &UtxoId) {
        if let Some(utxo) = self.utxos.get_mut(id) {
            utxo.mark_spent();
        }
    }

    /// All outputs, for reporting.
    pub fn iter(&self) -> impl Iterator<Item = &Utxo> {
        self.utxos.values()
    }

    /// Total value across all outputs, in coins.
    pub fn total_value(&self) -> Amount {
        self.utxos.values().map(|u| u.amount).sum()
    }

    /// Total value of spent outputs, in coins.
    pub fn spent_value(&self) -> Amount {
        self.utxos.values().filter(|u| u.spent).map(|u| u.amount).sum()
    }

    /// Number of outputs ever created.
    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    /// True if no output was ever created.
    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }
}
