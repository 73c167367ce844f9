use thiserror::Error;

use crate::chain::ChainError;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Invalid function signature '{signature}': {reason}")]
    InvalidSignature { signature: String, reason: String },

    #[error("Invalid arguments for {contract}.{function}: {reason}")]
    InvalidArguments { contract: String, function: String, reason: String },

    #[error("Failed to read {contract}.{function}: {source}")]
    ReadFailed {
        contract: String,
        function: String,
        #[source]
        source: ChainError,
    },

    #[error("{contract}.{function} returned no value")]
    EmptyRead { contract: String, function: String },

    #[error("Failed to invoke {contract}.{function}: {source}")]
    WriteFailed {
        contract: String,
        function: String,
        #[source]
        source: ChainError,
    },

    #[error("Operation cancelled by the operator ({0})")]
    OperatorAborted(String),
}
