use alloy::primitives::B256;
use alloy::transports::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(#[from] TransportError),

    #[error("Pending transaction error: {0}")]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),

    #[error("ABI error: {0}")]
    Abi(#[from] alloy::dyn_abi::Error),

    #[error("Transaction {0} reverted")]
    Reverted(B256),

    #[error("No contract address in receipt of {0}")]
    MissingContractInReceipt(B256),

    #[error("Failed to load artifact for {source_name}: {reason}")]
    Artifact { source_name: String, reason: String },

    #[error("Invalid RPC url: {0}")]
    RpcUrlParseError(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
}
