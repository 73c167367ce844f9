use std::path::PathBuf;

use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::Function;
use alloy::network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::eth::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use url::Url;

use crate::chain::artifact::Artifact;
use crate::chain::{ChainClient, ChainError, DeployedContract, TransactionOutcome};

/// [`ChainClient`] backed by an Ethereum JSON-RPC endpoint and a local private key.
pub struct EthereumChainClient {
    provider: DynProvider,
    account: Address,
    artifacts_dir: PathBuf,
}

impl EthereumChainClient {
    pub fn new(rpc_url: &str, private_key: &str, artifacts_dir: PathBuf) -> Result<Self, ChainError> {
        let rpc_url: Url = rpc_url.parse().map_err(|_| ChainError::RpcUrlParseError(rpc_url.to_string()))?;
        let signer: PrivateKeySigner =
            private_key.parse().map_err(|e| ChainError::InvalidPrivateKey(format!("{e}")))?;
        let account = signer.address();

        let provider = ProviderBuilder::new().wallet(EthereumWallet::from(signer)).connect_http(rpc_url).erased();

        Ok(Self { provider, account, artifacts_dir })
    }

    async fn send_and_wait(&self, tx: TransactionRequest) -> Result<TransactionReceipt, ChainError> {
        let receipt = self.provider.send_transaction(tx).await?.get_receipt().await?;
        if !ReceiptResponse::status(&receipt) {
            return Err(ChainError::Reverted(receipt.transaction_hash));
        }
        log::trace!("txn {:?} included in block {:?}", receipt.transaction_hash, receipt.block_number);
        Ok(receipt)
    }
}

#[async_trait]
impl ChainClient for EthereumChainClient {
    fn account(&self) -> Address {
        self.account
    }

    async fn call(
        &self,
        target: Address,
        function: &Function,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, ChainError> {
        let input = function.abi_encode_input(args)?;
        let tx = TransactionRequest::default().with_to(target).with_input(input);
        let output = self.provider.call(tx).await?;
        Ok(function.abi_decode_output(&output)?)
    }

    async fn send(
        &self,
        target: Address,
        function: &Function,
        args: &[DynSolValue],
    ) -> Result<TransactionOutcome, ChainError> {
        let input = function.abi_encode_input(args)?;
        let tx = TransactionRequest::default().with_from(self.account).with_to(target).with_input(input);
        let receipt = self.send_and_wait(tx).await?;

        Ok(TransactionOutcome { transaction_hash: receipt.transaction_hash, block_number: receipt.block_number })
    }

    async fn deploy(&self, source: &str, constructor_args: &[DynSolValue]) -> Result<DeployedContract, ChainError> {
        let artifact = Artifact::load(&self.artifacts_dir, source)?;
        let deploy_code = artifact.deploy_code(source, constructor_args)?;

        let tx = TransactionRequest::default().with_from(self.account).with_deploy_code(deploy_code);
        let receipt = self.send_and_wait(tx).await?;
        let address =
            receipt.contract_address.ok_or(ChainError::MissingContractInReceipt(receipt.transaction_hash))?;

        Ok(DeployedContract {
            address,
            transaction: TransactionOutcome {
                transaction_hash: receipt.transaction_hash,
                block_number: receipt.block_number,
            },
        })
    }
}
