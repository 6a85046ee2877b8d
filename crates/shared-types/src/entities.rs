//! # Core Domain Entities
//!
//! Defines the UTXO, transaction, and attack-metadata entities plus the
//! transaction status machine shared by every subsystem.
//!
//! ## Clusters
//!
//! - **Value**: `Utxo`, `OutputSpec`, `AddressType`
//! - **Spending**: `Transaction`, `TxInput`, `TxKind`, `TxStatus`
//! - **Attack**: `AttackMetadata`
//!
//! ## Status machine
//!
//! ```text
//! [CREATED] ──broadcast──→ [BROADCAST] ──attack──→ [ATTACKED]
//!                              │    │                   │
//!                              │    └──rbf──→ [RBF_REPLACED]
//!                              │                        │
//!                              └──→ [CONFIRMED]    [STOLEN]
//! ```
//!
//! `Attacked` is reachable only from `Broadcast`; `Stolen` only from
//! `Attacked`. Conflict-group losers are never transitioned; they are
//! simply excluded from the confirmed set when the pool is cleared.

use crate::ids::{KeyPairId, TxId, UtxoId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value in whole coins. The simulation works in coin units, not satoshis.
pub type Amount = f64;

/// Simulated time in seconds since simulation start (logical clock).
pub type SimTime = f64;

/// Block height.
pub type Height = u64;

/// Slack for floating-point amount comparisons.
pub const AMOUNT_EPSILON: f64 = 1e-9;

// =============================================================================
// CLUSTER A: VALUE
// =============================================================================

/// Script template of an output's address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressType {
    /// Legacy pay-to-pubkey-hash (`1…`).
    P2pkh,
    /// Native segwit pay-to-witness-pubkey-hash (`bc1q…`).
    P2wpkh,
    /// Taproot pay-to-taproot (`bc1p…`).
    P2tr,
    /// 2-of-3 script-hash multisig (`3…`).
    P2shMultisig2of3,
    /// 3-of-5 witness-script-hash multisig (`bc1q…`, long program).
    P2wshMultisig3of5,
}

impl AddressType {
    /// Number of key pairs the output commits to.
    ///
    /// Multisig outputs allocate the full key set, not one key: an
    /// attacker racing a multisig spend has that many keys to break.
    pub fn key_count(&self) -> usize {
        match self {
            Self::P2pkh | Self::P2wpkh | Self::P2tr => 1,
            Self::P2shMultisig2of3 => 3,
            Self::P2wshMultisig3of5 => 5,
        }
    }

    /// True for script-hash multisig templates.
    pub fn is_multisig(&self) -> bool {
        matches!(self, Self::P2shMultisig2of3 | Self::P2wshMultisig3of5)
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::P2pkh => "P2PKH (Legacy)",
            Self::P2wpkh => "P2WPKH (SegWit)",
            Self::P2tr => "P2TR (Taproot)",
            Self::P2shMultisig2of3 => "P2SH Multisig 2-of-3",
            Self::P2wshMultisig3of5 => "P2WSH Multisig 3-of-5",
        };
        f.write_str(name)
    }
}

/// An unspent transaction output.
///
/// The registry copy is authoritative for `key_exposed`, `exposure_count`,
/// and `spent`; transactions reference outputs by id and never duplicate
/// this mutable state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Utxo {
    /// Unique output id (origin txid + vout).
    pub id: UtxoId,
    /// Owning address string, derived from the key material.
    pub address: String,
    /// Script template of the address.
    pub address_type: AddressType,
    /// Value in coins (non-negative).
    pub amount: Amount,
    /// Key pairs committed to by this output (N for multisig).
    pub keys: Vec<KeyPairId>,
    /// True once a public key for this output has been made visible.
    pub key_exposed: bool,
    /// How many times the key material has been exposed (address reuse).
    pub exposure_count: u32,
    /// Block height at creation.
    pub created_height: Height,
    /// True once spent in a finalized block; never selectable again.
    pub spent: bool,
}

impl Utxo {
    /// Marks the key material exposed.
    ///
    /// Monotonic: the flag only ever flips `false → true`, and the counter
    /// only increments on the first normal exposure. Pre-exposed (reused)
    /// outputs keep their higher counter.
    pub fn expose(&mut self) {
        if !self.key_exposed {
            self.key_exposed = true;
            self.exposure_count += 1;
        }
    }

    /// Marks the output spent. Monotonic.
    pub fn mark_spent(&mut self) {
        self.spent = true;
    }
}

/// A transaction output descriptor: destination and value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Destination address string.
    pub address: String,
    /// Value in coins.
    pub amount: Amount,
}

impl OutputSpec {
    /// Creates an output descriptor.
    pub fn new(address: impl Into<String>, amount: Amount) -> Self {
        Self {
            address: address.into(),
            amount,
        }
    }
}

// =============================================================================
// CLUSTER B: SPENDING
// =============================================================================

/// A transaction's view of one input.
///
/// Carries the id plus the value/key snapshot needed for fee arithmetic and
/// attack-time estimation. Exposure and spent state stay in the registry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TxInput {
    /// Referenced output.
    pub utxo: UtxoId,
    /// Value of the referenced output, in coins.
    pub amount: Amount,
    /// Keys whose public halves this spend makes visible.
    pub keys: Vec<KeyPairId>,
}

/// Transaction status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    /// Built but not yet broadcast.
    Created,
    /// In the mempool, visible to every node, attackers included.
    Broadcast,
    /// A quantum attacker has claimed this transaction's attack slot.
    Attacked,
    /// Finalized in a block.
    Confirmed,
    /// Lost the double-spend race to a quantum attacker.
    Stolen,
    /// Superseded by a higher-fee replacement before confirmation.
    RbfReplaced,
}

impl TxStatus {
    /// True for states no transition leaves.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Stolen | Self::RbfReplaced)
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "Created",
            Self::Broadcast => "Broadcast to mempool",
            Self::Attacked => "Under quantum attack",
            Self::Confirmed => "Confirmed in block",
            Self::Stolen => "Stolen by quantum attacker",
            Self::RbfReplaced => "Replaced by fee",
        };
        f.write_str(name)
    }
}

/// Provenance of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxKind {
    /// Built by a wallet through the transaction builder.
    Regular,
    /// Synthesized by an attacker to double-spend a victim's inputs.
    AttackSpend {
        /// The transaction whose inputs this spend races.
        victim: TxId,
    },
}

/// Metadata attached to an `Attacked` transaction for later settlement.
///
/// Present only while `status == Attacked` (and on the `Stolen` terminal
/// state it leads to); at most one record per transaction; the attack
/// slot admits a single claimant per scan and the pool is cleared every
/// block.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttackMetadata {
    /// Name of the attacker that claimed the attack slot.
    pub attacker: String,
    /// Id of the synthesized competing transaction.
    pub competing_txid: TxId,
    /// Fee the competing transaction bids.
    pub attack_fee: Amount,
    /// Destination address the attacker pays itself.
    pub destination: String,
    /// Value the attacker stands to steal (inputs minus attack fee).
    pub value: Amount,
}

/// A transaction: an ordered spend of UTXOs with a fee bid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique id derived from the input id multiset plus a nonce.
    pub txid: TxId,
    /// Ordered input references.
    pub inputs: Vec<TxInput>,
    /// Ordered output descriptors.
    pub outputs: Vec<OutputSpec>,
    /// Fee in coins (non-negative).
    pub fee: Amount,
    /// Opaque signature strings, one per input key.
    pub signatures: Vec<String>,
    /// Current status.
    pub status: TxStatus,
    /// Logical time of broadcast (set at build, the round's clock).
    pub broadcast_time: SimTime,
    /// Whether this transaction opts in to replace-by-fee.
    pub rbf_enabled: bool,
    /// Builder-made or attacker-synthesized.
    pub kind: TxKind,
    /// Ids of transactions spending this exact input set.
    pub competing_txs: Vec<TxId>,
    /// Attack settlement record, present only once `Attacked`.
    pub attack: Option<AttackMetadata>,
}

impl Transaction {
    /// Sum of input values, in coins.
    pub fn total_input_value(&self) -> Amount {
        self.inputs.iter().map(|i| i.amount).sum()
    }

    /// Sum of output values, in coins.
    pub fn total_output_value(&self) -> Amount {
        self.outputs.iter().map(|o| o.amount).sum()
    }

    /// Fee as a fraction of input value (informational ordering key).
    pub fn fee_rate(&self) -> f64 {
        let total = self.total_input_value();
        if total <= 0.0 {
            0.0
        } else {
            self.fee / total
        }
    }

    /// All key ids this spend makes visible.
    pub fn exposed_keys(&self) -> Vec<KeyPairId> {
        self.inputs.iter().flat_map(|i| i.keys.clone()).collect()
    }

    /// Sorted input-id set, the conflict key. Two transactions conflict
    /// iff these are identical (overlap alone is not a conflict).
    pub fn input_set(&self) -> Vec<UtxoId> {
        let mut ids: Vec<UtxoId> = self.inputs.iter().map(|i| i.utxo).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Moves `Created → Broadcast`.
    ///
    /// # Errors
    /// Returns an error unless the transaction is freshly created.
    pub fn mark_broadcast(&mut self) -> Result<(), &'static str> {
        if self.status != TxStatus::Created {
            return Err("Transaction already broadcast");
        }
        self.status = TxStatus::Broadcast;
        Ok(())
    }

    /// Moves `Broadcast → Attacked`, attaching the settlement record and
    /// registering the competing spend.
    ///
    /// # Errors
    /// Returns an error unless the transaction sits in the mempool
    /// unclaimed; the first successful attacker takes the slot.
    pub fn mark_attacked(&mut self, meta: AttackMetadata) -> Result<(), &'static str> {
        if self.status != TxStatus::Broadcast {
            return Err("Attack slot requires an unclaimed broadcast transaction");
        }
        self.status = TxStatus::Attacked;
        self.competing_txs.push(meta.competing_txid);
        self.attack = Some(meta);
        Ok(())
    }

    /// Moves `Broadcast → Confirmed`.
    pub fn mark_confirmed(&mut self) -> Result<(), &'static str> {
        if self.status != TxStatus::Broadcast {
            return Err("Only a broadcast transaction can confirm");
        }
        self.status = TxStatus::Confirmed;
        Ok(())
    }

    /// Moves `Attacked → Stolen`.
    pub fn mark_stolen(&mut self) -> Result<(), &'static str> {
        if self.status != TxStatus::Attacked {
            return Err("Only an attacked transaction can be stolen");
        }
        self.status = TxStatus::Stolen;
        Ok(())
    }

    /// Moves `Broadcast → RbfReplaced`.
    pub fn mark_rbf_replaced(&mut self) -> Result<(), &'static str> {
        if self.status != TxStatus::Broadcast {
            return Err("Only a broadcast transaction can be replaced");
        }
        self.status = TxStatus::RbfReplaced;
        Ok(())
    }
}
