pub mod artifact;
pub mod error;
pub mod ethereum;

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::Function;
use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;

pub use error::ChainError;
pub use ethereum::EthereumChainClient;

/// Inclusion data of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionOutcome {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployedContract {
    pub address: Address,
    pub transaction: TransactionOutcome,
}

/// Access to the chain the contracts live on, as seen by the single operating account.
///
/// Every call resolves fully before returning: `send` and `deploy` only return once the
/// transaction is included.
#[automock]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the account signing every transaction.
    fn account(&self) -> Address;

    /// Should perform a read-only call and return the decoded outputs of `function`.
    async fn call(&self, target: Address, function: &Function, args: &[DynSolValue])
        -> Result<Vec<DynSolValue>, ChainError>;

    /// Should send a state mutating call and wait for it to be included.
    async fn send(&self, target: Address, function: &Function, args: &[DynSolValue])
        -> Result<TransactionOutcome, ChainError>;

    /// Should deploy a new instance of the `source` artifact with the given constructor arguments.
    async fn deploy(&self, source: &str, constructor_args: &[DynSolValue]) -> Result<DeployedContract, ChainError>;
}
