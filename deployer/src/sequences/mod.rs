//! The deployment sequences built on top of the [`Deployer`](crate::deployer::Deployer) registry
//! and the [`Reconciler`](crate::reconciler::Reconciler).

pub mod add_synths;
pub mod configure_synths;
pub mod deploy_synths;
pub mod system_status;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256};
use serde::Serialize;

use crate::chain::ChainClient;
use crate::error::{DeployerError, DeployerResult};
use crate::reconciler::{parse_function, ReconcileError};
use crate::types::{ContractHandle, CurrencyKey};
pub use add_synths::add_synths;
pub use configure_synths::configure_synths;
pub use deploy_synths::{deploy_synths, DeploySynthsOptions, DeploySynthsOutput};
pub use system_status::read_system_suspended;

/// A freshly deployed synth waiting to be registered in the `Issuer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthToAdd {
    pub synth: ContractHandle,
    pub currency_key: B256,
}

pub fn bytes32(key: &CurrencyKey) -> DynSolValue {
    DynSolValue::FixedBytes(key.to_bytes32(), 32)
}

pub fn synth_name(key: &CurrencyKey) -> String {
    format!("Zasset{key}")
}

pub fn token_state_name(key: &CurrencyKey) -> String {
    format!("TokenState{key}")
}

pub fn proxy_name(key: &CurrencyKey) -> String {
    format!("Proxy{key}")
}

pub const PROXY_ERC20_ZUSD: &str = "ProxyERC20zUSD";

pub(crate) const TOTAL_SUPPLY: &str = "function totalSupply() view returns (uint256)";

/// Reads a single value outside of a reconciliation step.
pub(crate) async fn read_value(
    client: &dyn ChainClient,
    contract: &ContractHandle,
    signature: &str,
    args: &[DynSolValue],
) -> DeployerResult<DynSolValue> {
    let function = parse_function(signature)?;
    let values = client.call(contract.address, &function, args).await.map_err(|source| {
        ReconcileError::ReadFailed { contract: contract.name.clone(), function: function.name.clone(), source }
    })?;
    values
        .into_iter()
        .next()
        .ok_or_else(|| ReconcileError::EmptyRead { contract: contract.name.clone(), function: function.name }.into())
}

pub(crate) fn expect_address(contract: &ContractHandle, function: &str, value: DynSolValue) -> DeployerResult<Address> {
    value.as_address().ok_or_else(|| DeployerError::UnexpectedValue {
        contract: contract.name.clone(),
        function: function.to_string(),
        value: format!("{value:?}"),
    })
}
