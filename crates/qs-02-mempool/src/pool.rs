//! # Transaction Pool - Admission, Conflict Grouping, RBF
//!
//! ## Data Structures
//!
//! - `by_id`: ordered lookup by transaction id (`BTreeMap`, deterministic
//!   iteration for reproducible rounds)
//! - conflict groups are computed on demand from the live pool; with one
//!   pool lifetime per block there is nothing to keep incrementally
//!
//! ## Invariants Enforced
//!
//! - INVARIANT-1: No duplicate ids (checked in `admit()`)
//! - INVARIANT-2: Only `Created` transactions admitted
//! - INVARIANT-3: Conflict iff identical input-id sets
//! - INVARIANT-4: RBF respects the opt-in flag and minimum fee bump

use crate::config::MempoolConfig;
use crate::errors::MempoolError;
use shared_types::{Transaction, TxId, TxStatus, UtxoId};
use std::collections::BTreeMap;

/// The sorted, deduplicated input-id set of a transaction.
///
/// Two transactions are double-spends iff their conflict keys are equal;
/// overlapping but unequal sets do not conflict in this model.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConflictKey(Vec<UtxoId>);

impl ConflictKey {
    /// Computes the conflict key of a transaction.
    pub fn of(tx: &Transaction) -> Self {
        Self(tx.input_set())
    }

    /// The input ids forming the key.
    pub fn inputs(&self) -> &[UtxoId] {
        &self.0
    }
}

/// In-flight transactions awaiting block inclusion.
#[derive(Debug, Default)]
pub struct Mempool {
    config: MempoolConfig,
    by_id: BTreeMap<TxId, Transaction>,
}

impl Mempool {
    /// Creates an empty pool.
    pub fn new(config: MempoolConfig) -> Self {
        Self {
            config,
            by_id: BTreeMap::new(),
        }
    }

    /// Creates a pool with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(MempoolConfig::default())
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &MempoolConfig {
        &self.config
    }

    /// Number of transactions in the pool.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Gets a transaction by id.
    pub fn get(&self, txid: &TxId) -> Option<&Transaction> {
        self.by_id.get(txid)
    }

    /// Gets a mutable transaction by id.
    pub fn get_mut(&mut self, txid: &TxId) -> Option<&mut Transaction> {
        self.by_id.get_mut(txid)
    }

    /// Checks membership.
    pub fn contains(&self, txid: &TxId) -> bool {
        self.by_id.contains_key(txid)
    }

    /// Iterates the pool in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.by_id.values()
    }

    /// Admits a freshly created transaction: sets status to `Broadcast`
    /// and stores it by id.
    ///
    /// # Errors
    /// - `DuplicateId` if the id is already present
    /// - `InvalidStatus` unless the transaction is `Created`
    pub fn admit(&mut self, mut tx: Transaction) -> Result<TxId, MempoolError> {
        if self.by_id.contains_key(&tx.txid) {
            return Err(MempoolError::DuplicateId(tx.txid));
        }
        tx.mark_broadcast()
            .map_err(|_| MempoolError::InvalidStatus {
                txid: tx.txid,
                status: tx.status,
            })?;

        tracing::debug!(
            txid = %tx.txid.short(),
            fee = tx.fee,
            value = tx.total_input_value(),
            "transaction broadcast to mempool"
        );

        let txid = tx.txid;
        self.by_id.insert(txid, tx);
        Ok(txid)
    }

    /// Replaces a pool member via replace-by-fee.
    ///
    /// Every live member spending the replacement's exact input set must
    /// have opted in, and the replacement's fee must clear the configured
    /// minimum bump over each of them. Replaced members transition to
    /// `RbfReplaced` and are evicted; the replacement is admitted. The
    /// evicted transactions are returned so callers can archive them.
    ///
    /// Synthetic attack spends bypass this path through `admit`: a
    /// double-spend race needs both competitors live in the pool.
    ///
    /// # Errors
    /// `NothingToReplace`, `RbfDisabled`, `InsufficientFeeBump`, plus the
    /// `admit` errors. Validation failure leaves the pool untouched.
    pub fn replace_by_fee(
        &mut self,
        tx: Transaction,
    ) -> Result<(TxId, Vec<Transaction>), MempoolError> {
        // The replacement must be admissible before anything is evicted;
        // an error on this path must leave every original in place.
        if self.by_id.contains_key(&tx.txid) {
            return Err(MempoolError::DuplicateId(tx.txid));
        }
        if tx.status != TxStatus::Created {
            return Err(MempoolError::InvalidStatus {
                txid: tx.txid,
                status: tx.status,
            });
        }

        let key = ConflictKey::of(&tx);
        let conflicting: Vec<TxId> = self
            .by_id
            .values()
            .filter(|existing| ConflictKey::of(existing) == key)
            .map(|existing| existing.txid)
            .collect();

        if conflicting.is_empty() {
            return Err(MempoolError::NothingToReplace(tx.txid));
        }

        for txid in &conflicting {
            let existing = &self.by_id[txid];
            self.can_replace(existing, &tx)?;
        }

        let mut evicted = Vec::with_capacity(conflicting.len());
        for txid in &conflicting {
            let mut replaced = self.by_id.remove(txid).expect("collected above");
            replaced
                .mark_rbf_replaced()
                .expect("pool members are broadcast");
            tracing::info!(
                old = %replaced.txid.short(),
                new = %tx.txid.short(),
                old_fee = replaced.fee,
                new_fee = tx.fee,
                "transaction replaced by fee"
            );
            evicted.push(replaced);
        }

        let txid = self.admit(tx)?;
        Ok((txid, evicted))
    }

    /// Checks whether `new` may replace `existing` via RBF.
    fn can_replace(&self, existing: &Transaction, new: &Transaction) -> Result<(), MempoolError> {
        if !self.config.enable_rbf || !existing.rbf_enabled {
            return Err(MempoolError::RbfDisabled(existing.txid));
        }
        let min_new_fee = existing.fee * (100 + self.config.rbf_min_bump_percent) as f64 / 100.0;
        if new.fee < min_new_fee {
            return Err(MempoolError::InsufficientFeeBump {
                old_fee: existing.fee,
                new_fee: new.fee,
                min_bump_percent: self.config.rbf_min_bump_percent,
            });
        }
        Ok(())
    }

    /// Groups all stored transactions by conflict key.
    ///
    /// This is the authoritative double-spend detector: a group of size
    /// greater than one is a live double-spend race. Group members are
    /// listed in id order.
    pub fn conflict_groups(&self) -> BTreeMap<ConflictKey, Vec<TxId>> {
        let mut groups: BTreeMap<ConflictKey, Vec<TxId>> = BTreeMap::new();
        for tx in self.by_id.values() {
            groups.entry(ConflictKey::of(tx)).or_default().push(tx.txid);
        }
        groups
    }

    /// Pool contents ordered by `fee / total input value`, descending
    /// (informational priority listing; ties in id order).
    pub fn by_fee_rate(&self) -> Vec<&Transaction> {
        let mut txs: Vec<&Transaction> = self.by_id.values().collect();
        txs.sort_by(|a, b| {
            b.fee_rate()
                .partial_cmp(&a.fee_rate())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.txid.cmp(&b.txid))
        });
        txs
    }

    /// Empties the pool, returning everything that was in it. Called once
    /// per block after resolution; whatever was not finalized is dropped
    /// with the returned transactions.
    pub fn drain(&mut self) -> Vec<Transaction> {
        let drained = std::mem::take(&mut self.by_id);
        drained.into_values().collect()
    }

    /// Empties the pool, discarding contents.
    pub fn clear(&mut self) {
        self.by_id.clear();
    }
}
