//! Mempool error types.
//!
//! Defines all error conditions for the mempool subsystem.

use shared_types::{Amount, TxId, TxStatus};

/// Mempool error type.
#[derive(Clone, Debug, PartialEq)]
pub enum MempoolError {
    /// Transaction id already present in the pool.
    DuplicateId(TxId),

    /// Transaction is not in the status the operation requires.
    InvalidStatus {
        /// Offending transaction.
        txid: TxId,
        /// Its current status.
        status: TxStatus,
    },

    /// Replacement target did not opt in to replace-by-fee.
    RbfDisabled(TxId),

    /// Replacement fee does not clear the minimum bump.
    InsufficientFeeBump {
        /// Fee of the transaction being replaced.
        old_fee: Amount,
        /// Fee of the proposed replacement.
        new_fee: Amount,
        /// Configured minimum bump, percent.
        min_bump_percent: u64,
    },

    /// No pool member spends the replacement's input set.
    NothingToReplace(TxId),
}

impl std::fmt::Display for MempoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(txid) => {
                write!(f, "Duplicate transaction id: {}", txid.short())
            }
            Self::InvalidStatus { txid, status } => {
                write!(f, "Transaction {} has status '{}'", txid.short(), status)
            }
            Self::RbfDisabled(txid) => {
                write!(f, "Transaction {} did not opt in to RBF", txid.short())
            }
            Self::InsufficientFeeBump {
                old_fee,
                new_fee,
                min_bump_percent,
            } => {
                write!(
                    f,
                    "Fee bump {old_fee} -> {new_fee} below minimum of {min_bump_percent}%"
                )
            }
            Self::NothingToReplace(txid) => {
                write!(f, "No conflicting transaction to replace for {}", txid.short())
            }
        }
    }
}

impl std::error::Error for MempoolError {}
