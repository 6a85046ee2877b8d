//! Identifier types.
//!
//! All identifiers are 32-byte SHA-256 digests of deterministic material,
//! so a seeded run reproduces the same ids end to end.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Computes a 32-byte SHA-256 digest over a sequence of byte slices.
pub fn digest(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// A transaction identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxId(pub [u8; 32]);

impl TxId {
    /// Derives a txid from arbitrary byte material.
    pub fn derive(parts: &[&[u8]]) -> Self {
        Self(digest(parts))
    }

    /// First eight hex characters, for log lines.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self.short())
    }
}

/// An unspent output identifier: origin transaction plus output index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UtxoId {
    /// Transaction that created the output.
    pub txid: TxId,
    /// Output index within that transaction.
    pub vout: u32,
}

impl UtxoId {
    /// Creates an output id.
    pub fn new(txid: TxId, vout: u32) -> Self {
        Self { txid, vout }
    }

    /// Byte form used when deriving dependent ids (conflict keys, txids).
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut bytes = self.txid.0.to_vec();
        bytes.extend_from_slice(&self.vout.to_le_bytes());
        bytes
    }
}

impl fmt::Display for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

impl fmt::Debug for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UtxoId({}:{})", self.txid.short(), self.vout)
    }
}

/// A key-pair identifier (digest of the public key).
///
/// Subsystems other than the wallet never see private key material; they
/// reference keys through this id alone.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyPairId(pub [u8; 32]);

impl KeyPairId {
    /// Derives a key id from the public key bytes.
    pub fn derive(pubkey: &[u8]) -> Self {
        Self(digest(&[pubkey]))
    }

    /// First eight hex characters, for log lines.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for KeyPairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPairId({})", self.short())
    }
}
