//! Error types for the wallet subsystem

use shared_types::{Amount, UtxoId};
use thiserror::Error;

/// Result type alias for wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;

/// Errors that can occur while creating outputs or building transactions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    /// Output amount must be strictly positive
    #[error("Invalid amount: {amount} (must be > 0)")]
    InvalidAmount {
        /// The offending amount
        amount: Amount,
    },

    /// Outputs plus fee exceed the value of the inputs
    #[error("Insufficient funds: outputs + fee = {required}, inputs = {available}")]
    InsufficientFunds {
        /// Total of outputs plus fee
        required: Amount,
        /// Total input value
        available: Amount,
    },

    /// Input references an output that was already spent
    #[error("Input {0} is already spent")]
    SpentInput(UtxoId),

    /// The same output appears twice in the input list
    #[error("Duplicate input {0}")]
    DuplicateInput(UtxoId),

    /// Input references an output the registry does not know
    #[error("Unknown UTXO {0}")]
    UnknownUtxo(UtxoId),
}
