//! Runtime error type, aggregating every subsystem failure.

use qs_01_wallet::WalletError;
use qs_02_mempool::MempoolError;
use thiserror::Error;

/// Any failure surfaced by the network facade.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Wallet rejected the request.
    #[error("wallet: {0}")]
    Wallet(#[from] WalletError),

    /// Mempool rejected the transaction.
    #[error("mempool: {0}")]
    Mempool(#[from] MempoolError),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration document failed to parse.
    #[error("configuration parse: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result alias for the runtime.
pub type Result<T> = std::result::Result<T, NetworkError>;
