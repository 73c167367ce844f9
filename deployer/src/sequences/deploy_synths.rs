use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use serde::Serialize;

use super::{
    bytes32, proxy_name, read_value, synth_name, token_state_name, SynthToAdd, PROXY_ERC20_ZUSD, TOTAL_SUPPLY,
};
use crate::config::SynthConfig;
use crate::confirm::Confirm;
use crate::deployer::{DeployRequest, Deployer};
use crate::error::{DeployerError, DeployerResult};
use crate::reconciler::{ExecutionContext, ReconcileError};
use crate::types::Network;

const READ_PROXY_ADDRESS_RESOLVER: &str = "ReadProxyAddressResolver";

#[derive(Debug, Clone, Copy, Default)]
pub struct DeploySynthsOptions {
    /// Deploy token states, proxies and synths that have no previous deployment.
    pub add_new_synths: bool,
    /// Tolerate flagged synths that have no previous deployment to carry the supply from.
    pub fresh_deploy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeploySynthsOutput {
    pub synths_to_add: Vec<SynthToAdd>,
}

/// Deploys (or reuses) the token state, proxies and contract of every synth, in order.
pub async fn deploy_synths(
    deployer: &mut Deployer<'_>,
    confirm: &dyn Confirm,
    context: &ExecutionContext,
    synths: &[SynthConfig],
    options: DeploySynthsOptions,
) -> DeployerResult<DeploySynthsOutput> {
    log::info!("⏳ Deploying synths");
    let account = DynSolValue::Address(deployer.account());
    let mut synths_to_add = Vec::new();

    for synth in synths {
        let key = &synth.name;
        let source = synth.subclass.as_deref().unwrap_or("Synth");
        log::info!("⏳ Zasset {key} ({source})");

        let token_state = deployer
            .deploy_contract(
                DeployRequest::new(
                    token_state_name(key),
                    "TokenState",
                    vec![account.clone(), DynSolValue::Address(Address::ZERO)],
                )
                .force(options.add_new_synths),
            )
            .await?;

        // zUSD keeps its legacy proxy on mainnet, next to a dedicated ERC20 proxy
        let legacy_proxy = key.is_base() && context.network == Network::Mainnet;
        let proxy_source = if legacy_proxy { "Proxy" } else { "ProxyERC20" };
        let proxy = deployer
            .deploy_contract(
                DeployRequest::new(proxy_name(key), proxy_source, vec![account.clone()]).force(options.add_new_synths),
            )
            .await?;

        let proxy_erc20 = if key.is_base() {
            Some(
                deployer
                    .deploy_contract(
                        DeployRequest::new(PROXY_ERC20_ZUSD, "ProxyERC20", vec![account.clone()])
                            .force(options.add_new_synths),
                    )
                    .await?,
            )
        } else {
            None
        };

        let name = synth_name(key);
        let flagged = deployer.is_flagged_for_deploy(&name);
        let original_total_supply =
            if flagged { existing_total_supply(deployer, &name, options.fresh_deploy).await? } else { U256::ZERO };

        if flagged
            && original_total_supply > U256::ZERO
            && !context.system_suspended
            && !context.generate_solidity
            && !context.use_fork
        {
            log::warn!(
                "⚠ The system is not suspended! Adding a synth here without using a migration contract is \
                 potentially problematic. {}: {} totalSupply is {}",
                context.network,
                name,
                original_total_supply
            );
            if !context.yes && !confirm.confirm("Do you want to continue?") {
                log::warn!("Operation cancelled");
                return Err(ReconcileError::OperatorAborted(format!("deploy {name}")).into());
            }
        }

        let resolver =
            deployer.deployed(READ_PROXY_ADDRESS_RESOLVER).map_or(Address::ZERO, |resolver| resolver.address);

        let args = vec![
            DynSolValue::Address(proxy_erc20.as_ref().unwrap_or(&proxy).address),
            DynSolValue::Address(token_state.address),
            DynSolValue::String(format!("Zasset {key}")),
            DynSolValue::String(key.to_string()),
            account.clone(),
            bytes32(key),
            DynSolValue::Uint(original_total_supply, 256),
            DynSolValue::Address(resolver),
        ];
        let deps = vec![
            token_state_name(key),
            proxy_name(key),
            "Synthetix".to_string(),
            "FeePool".to_string(),
            READ_PROXY_ADDRESS_RESOLVER.to_string(),
        ];
        let deployed_synth = deployer
            .deploy_contract(DeployRequest::new(name, source, args).deps(deps).force(options.add_new_synths))
            .await?;

        if deployer.deployed("Issuer").is_some() {
            synths_to_add.push(SynthToAdd { synth: deployed_synth, currency_key: key.to_bytes32() });
        }
    }

    Ok(DeploySynthsOutput { synths_to_add })
}

/// Supply of the synth being replaced, carried over to its new deployment.
async fn existing_total_supply(deployer: &Deployer<'_>, name: &str, fresh_deploy: bool) -> DeployerResult<U256> {
    let supply = match deployer.get_existing_contract(name) {
        Ok(existing) => {
            read_value(deployer.client(), existing, TOTAL_SUPPLY, &[]).await.and_then(|value| {
                value.as_uint().map(|(supply, _)| supply).ok_or_else(|| DeployerError::UnexpectedValue {
                    contract: name.to_string(),
                    function: "totalSupply".to_string(),
                    value: format!("{value:?}"),
                })
            })
        }
        Err(err) => Err(err),
    };

    match supply {
        Err(err) if fresh_deploy => {
            log::debug!("No supply to carry over for {name}: {err}");
            Ok(U256::ZERO)
        }
        supply => supply,
    }
}
