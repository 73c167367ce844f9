use std::collections::HashMap;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};

use super::{bytes32, proxy_name, synth_name, token_state_name, PROXY_ERC20_ZUSD};
use crate::config::{FeedConfig, SynthConfig};
use crate::deployer::Deployer;
use crate::error::DeployerResult;
use crate::reconciler::{ConfigurationStep, CustomSolidity, Reconciler};
use crate::types::{ContractHandle, CurrencyKey};

const ASSOCIATED_CONTRACT: &str = "function associatedContract() view returns (address)";
const SET_ASSOCIATED_CONTRACT: &str = "function setAssociatedContract(address _associatedContract)";
const TARGET: &str = "function target() view returns (address)";
const SET_TARGET: &str = "function setTarget(address _target)";
const PROXY: &str = "function proxy() view returns (address)";
const SET_PROXY: &str = "function setProxy(address _proxy)";
const AGGREGATORS: &str = "function aggregators(bytes32) view returns (address)";
const ADD_AGGREGATOR: &str = "function addAggregator(bytes32 currencyKey, address aggregatorAddress)";
const SET_TOTAL_SUPPLY: &str = "function setTotalSupply(uint256 amount)";

/// Wires every synth to its token state and proxies and registers its price feed.
pub async fn configure_synths(
    reconciler: &mut Reconciler<'_>,
    deployer: &Deployer<'_>,
    synths: &[SynthConfig],
    feeds: &HashMap<String, FeedConfig>,
) -> DeployerResult<()> {
    log::info!("⏳ Configuring synths");
    let exchange_rates = deployer.deployed("ExchangeRates");

    for synth_config in synths {
        let key = &synth_config.name;
        log::info!("⏳ Zasset {key}");

        let synth = deployer.deployed(&synth_name(key));
        let token_state = deployer.deployed(&token_state_name(key));
        let proxy = deployer.deployed(&proxy_name(key));
        let proxy_erc20 = if key.is_base() { deployer.deployed(PROXY_ERC20_ZUSD) } else { None };

        if let Some(synth) = synth {
            if reconciler.context().generate_solidity {
                if let Ok(existing) = deployer.get_existing_contract(&synth.name) {
                    if existing.address != synth.address {
                        copy_total_supply(reconciler, key, existing, synth).await?;
                    }
                }
            }

            if token_state.is_some() {
                reconciler
                    .reconcile(
                        ConfigurationStep::new(token_state_name(key), token_state, SET_ASSOCIATED_CONTRACT)
                            .read(ASSOCIATED_CONTRACT)
                            .expect_eq(DynSolValue::Address(synth.address))
                            .write_arg(DynSolValue::Address(synth.address))
                            .comment(format!("Ensure the {key} synth can write to its TokenState")),
                    )
                    .await?;
            }

            if let Some(proxy) = proxy {
                reconciler
                    .reconcile(
                        ConfigurationStep::new(proxy_name(key), Some(proxy), SET_TARGET)
                            .read(TARGET)
                            .expect_eq(DynSolValue::Address(synth.address))
                            .write_arg(DynSolValue::Address(synth.address))
                            .comment(format!("Ensure the {key} synth Proxy is correctly connected to the Synth")),
                    )
                    .await?;

                // when a dedicated ERC20 proxy exists the synth must point at it
                let synth_proxy = proxy_erc20.unwrap_or(proxy);
                reconciler
                    .reconcile(
                        ConfigurationStep::new(synth_name(key), Some(synth), SET_PROXY)
                            .read(PROXY)
                            .expect_eq(DynSolValue::Address(synth_proxy.address))
                            .write_arg(DynSolValue::Address(synth_proxy.address))
                            .comment(format!("Ensure the {key} synth is connected to its Proxy")),
                    )
                    .await?;

                if let Some(proxy_erc20) = proxy_erc20 {
                    reconciler
                        .reconcile(
                            ConfigurationStep::new(PROXY_ERC20_ZUSD, Some(proxy_erc20), SET_TARGET)
                                .read(TARGET)
                                .expect_eq(DynSolValue::Address(synth.address))
                                .write_arg(DynSolValue::Address(synth.address))
                                .comment("Ensure the special ERC20 proxy for zUSD has its target set to the Synth"),
                        )
                        .await?;
                }
            }
        }

        let feed = feeds
            .get(&synth_config.asset)
            .and_then(|config| config.feed.as_deref())
            .and_then(|feed| feed.parse::<Address>().ok());
        if let (Some(feed), Some(exchange_rates)) = (feed, exchange_rates) {
            reconciler
                .reconcile(
                    ConfigurationStep::new("ExchangeRates", Some(exchange_rates), ADD_AGGREGATOR)
                        .read(AGGREGATORS)
                        .read_arg(bytes32(key))
                        .expect_eq(DynSolValue::Address(feed))
                        .write_arg(bytes32(key))
                        .write_arg(DynSolValue::Address(feed))
                        .comment(format!("Ensure the ExchangeRates contract has the feed for {key}")),
                )
                .await?;
        }
    }

    Ok(())
}

/// Records a migration function copying the supply of the replaced synth onto the new one.
///
/// The supply is read when the migration executes, the call argument is only a placeholder.
async fn copy_total_supply(
    reconciler: &mut Reconciler<'_>,
    key: &CurrencyKey,
    existing: &ContractHandle,
    synth: &ContractHandle,
) -> DeployerResult<()> {
    let context = reconciler.context();
    let instructions = [
        context.explorer_comment(existing.address),
        Some(format!("Zasset existingSynth = Zasset({})", existing.address)),
        context.explorer_comment(synth.address),
        Some(format!("Zasset newSynth = Zasset({})", synth.address)),
        Some("newSynth.setTotalSupply(existingSynth.totalSupply())".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    reconciler
        .reconcile(
            ConfigurationStep::new(synth_name(key), Some(synth), SET_TOTAL_SUPPLY)
                .write_arg(DynSolValue::Uint(U256::ZERO, 256))
                .comment("Ensure the new synth has the totalSupply from the previous one")
                .custom_solidity(CustomSolidity { name: format!("copyTotalSupplyFrom_{key}"), instructions }),
        )
        .await?;
    Ok(())
}
