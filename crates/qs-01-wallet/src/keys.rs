//! Key material.
//!
//! Keys are opaque hex strings derived with SHA-256 from seeded random
//! bytes, standing in for real key pairs; no real cryptography is modeled.
//! Private halves never leave this module except as signature inputs.

use rand::RngCore;
use shared_types::{digest, KeyPairId};
use std::collections::HashMap;

/// Hex-encodes a digest.
fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// A simulated key pair.
#[derive(Clone, Debug)]
pub struct KeyPair {
    /// Public identifier other subsystems reference.
    pub id: KeyPairId,
    /// Private key, hex. Known only to the wallet (and, after a successful
    /// quantum derivation, to an attacker).
    pub privkey: String,
    /// Public key, hex. Visible to the network once exposed.
    pub pubkey: String,
    /// Digest of the public key, hex. What an address commits to.
    pub pubkey_hash: String,
}

impl KeyPair {
    /// Generates a fresh pair from the wallet's seeded generator.
    pub fn generate(rng: &mut impl RngCore) -> Self {
        let mut seed_bytes = [0u8; 32];
        rng.fill_bytes(&mut seed_bytes);

        let privkey = hex(&seed_bytes);
        let pubkey = hex(&digest(&[privkey.as_bytes()]));
        let pubkey_hash = hex(&digest(&[pubkey.as_bytes()]));
        let id = KeyPairId::derive(pubkey.as_bytes());

        Self {
            id,
            privkey,
            pubkey,
            pubkey_hash,
        }
    }
}

/// All key pairs the wallet has ever allocated, by id.
#[derive(Debug, Default)]
pub struct KeyStore {
    keys: HashMap<KeyPairId, KeyPair>,
}

impl KeyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh key pair and returns its id.
    pub fn allocate(&mut self, rng: &mut impl RngCore) -> KeyPairId {
        let pair = KeyPair::generate(rng);
        let id = pair.id;
        self.keys.insert(id, pair);
        id
    }

    /// Looks up a key pair.
    pub fn get(&self, id: &KeyPairId) -> Option<&KeyPair> {
        self.keys.get(id)
    }

    /// Number of allocated pairs.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if nothing has been allocated.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
