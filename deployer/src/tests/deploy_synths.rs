use std::collections::HashMap;
use std::path::PathBuf;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use assert_matches::assert_matches;
use rstest::*;

use super::fake_chain::{FakeChain, DEPLOYER_ACCOUNT};
use super::*;
use crate::confirm::MockConfirm;
use crate::deployer::Deployer;
use crate::error::DeployerError;
use crate::reconciler::{ExecutionContext, ReconcileError};
use crate::sequences::{deploy_synths, DeploySynthsOptions};
use crate::types::Network;

const OLD_ZEUR: Address = Address::with_last_byte(0xe0);

const ADD_NEW: DeploySynthsOptions = DeploySynthsOptions { add_new_synths: true, fresh_deploy: false };

fn no_confirm() -> MockConfirm {
    let mut confirm = MockConfirm::new();
    confirm.expect_confirm().never();
    confirm
}

fn sources(chain: &FakeChain) -> Vec<String> {
    chain.deploys().into_iter().map(|(source, _, _)| source).collect()
}

#[rstest]
#[case::testnet(Network::Testnet, "ProxyERC20")]
#[case::local(Network::Local, "ProxyERC20")]
#[case::mainnet(Network::Mainnet, "Proxy")]
#[tokio::test]
async fn test_zusd_proxies(#[case] network: Network, #[case] proxy_source: &str) {
    let dir = tempfile::tempdir().unwrap();
    let chain = FakeChain::new();
    let mut deployer = Deployer::new(&chain, HashMap::new(), write_deployment(&dir, &core_contracts())).unwrap();
    deployer.use_existing_targets();
    let context = ExecutionContext { network, ..Default::default() };

    let output = deploy_synths(&mut deployer, &no_confirm(), &context, &[synth("zUSD", "USD")], ADD_NEW).await.unwrap();

    assert_eq!(sources(&chain), vec!["TokenState", proxy_source, "ProxyERC20", "Synth"]);
    let proxy_erc20 = deployer.deployed("ProxyERC20zUSD").unwrap().address;
    let token_state = deployer.deployed("TokenStatezUSD").unwrap().address;
    let synth = deployer.deployed("ZassetzUSD").unwrap().clone();

    let (_, _, args) = chain.deploys().pop().unwrap();
    assert_eq!(
        args,
        vec![
            DynSolValue::Address(proxy_erc20),
            DynSolValue::Address(token_state),
            DynSolValue::String("Zasset zUSD".to_string()),
            DynSolValue::String("zUSD".to_string()),
            DynSolValue::Address(DEPLOYER_ACCOUNT),
            DynSolValue::FixedBytes(key("zUSD").to_bytes32(), 32),
            DynSolValue::Uint(U256::ZERO, 256),
            DynSolValue::Address(RESOLVER),
        ]
    );
    assert_eq!(output.synths_to_add.len(), 1);
    assert_eq!(output.synths_to_add[0].synth, synth);
    assert_eq!(output.synths_to_add[0].currency_key, key("zUSD").to_bytes32());
}

#[rstest]
#[tokio::test]
async fn test_non_base_synth_has_no_erc20_proxy() {
    let dir = tempfile::tempdir().unwrap();
    let chain = FakeChain::new();
    let mut deployer = Deployer::new(&chain, HashMap::new(), write_deployment(&dir, &core_contracts())).unwrap();
    deployer.use_existing_targets();
    let mut zbtc = synth("zBTC", "BTC");
    zbtc.subclass = Some("MultiCollateralSynth".to_string());

    deploy_synths(&mut deployer, &no_confirm(), &ExecutionContext::default(), &[zbtc], ADD_NEW).await.unwrap();

    assert_eq!(sources(&chain), vec!["TokenState", "ProxyERC20", "MultiCollateralSynth"]);
    assert!(deployer.deployed("ProxyERC20zUSD").is_none());
    let (_, _, args) = chain.deploys().pop().unwrap();
    assert_eq!(args[0], DynSolValue::Address(deployer.deployed("ProxyzBTC").unwrap().address));
}

#[rstest]
#[tokio::test]
async fn test_existing_synths_are_reused_without_issuer_registration() {
    let dir = tempfile::tempdir().unwrap();
    let chain = FakeChain::new();
    let mut handles: Vec<_> =
        core_contracts().into_iter().filter(|contract| contract.name != "Issuer").collect();
    handles.push(handle("TokenStatezEUR", "TokenState", Address::with_last_byte(0xe1)));
    handles.push(handle("ProxyzEUR", "ProxyERC20", Address::with_last_byte(0xe2)));
    handles.push(handle("ZassetzEUR", "Synth", OLD_ZEUR));
    let mut deployer = Deployer::new(&chain, HashMap::new(), write_deployment(&dir, &handles)).unwrap();
    deployer.use_existing_targets();

    let output = deploy_synths(
        &mut deployer,
        &no_confirm(),
        &ExecutionContext::default(),
        &[synth("zEUR", "EUR")],
        DeploySynthsOptions::default(),
    )
    .await
    .unwrap();

    assert!(chain.deploys().is_empty());
    assert!(output.synths_to_add.is_empty());
}

fn zeur_without_resolver(dir: &tempfile::TempDir) -> PathBuf {
    let mut handles: Vec<_> =
        core_contracts().into_iter().filter(|contract| contract.name != "ReadProxyAddressResolver").collect();
    handles.push(handle("TokenStatezEUR", "TokenState", Address::with_last_byte(0xe1)));
    handles.push(handle("ProxyzEUR", "ProxyERC20", Address::with_last_byte(0xe2)));
    handles.push(handle("ZassetzEUR", "Synth", OLD_ZEUR));
    write_deployment(dir, &handles)
}

#[rstest]
#[tokio::test]
async fn test_reused_synth_needs_no_resolver() {
    let dir = tempfile::tempdir().unwrap();
    let chain = FakeChain::new();
    let mut deployer = Deployer::new(&chain, HashMap::new(), zeur_without_resolver(&dir)).unwrap();
    deployer.use_existing_targets();

    let output = deploy_synths(
        &mut deployer,
        &no_confirm(),
        &ExecutionContext::default(),
        &[synth("zEUR", "EUR")],
        DeploySynthsOptions::default(),
    )
    .await
    .unwrap();

    assert!(chain.deploys().is_empty());
    assert_eq!(output.synths_to_add.len(), 1);
    assert_eq!(output.synths_to_add[0].synth.address, OLD_ZEUR);
}

#[rstest]
#[tokio::test]
async fn test_deployed_synth_requires_resolver() {
    let dir = tempfile::tempdir().unwrap();
    let chain = FakeChain::new();
    let mut deployer = Deployer::new(&chain, flags(&["ZassetzEUR"]), zeur_without_resolver(&dir)).unwrap();
    deployer.use_existing_targets();

    let result = deploy_synths(
        &mut deployer,
        &no_confirm(),
        &ExecutionContext { system_suspended: true, ..Default::default() },
        &[synth("zEUR", "EUR")],
        DeploySynthsOptions::default(),
    )
    .await;

    assert_matches!(
        result,
        Err(DeployerError::MissingDependency { contract, dependency })
            if contract == "ZassetzEUR" && dependency == "ReadProxyAddressResolver"
    );
    assert!(chain.deploys().is_empty());
}

struct Replacement {
    dir: tempfile::TempDir,
    chain: FakeChain,
}

/// A deployment where `ZassetzEUR` is flagged for redeploy and the current one holds 1000 tokens.
fn replacement() -> Replacement {
    let dir = tempfile::tempdir().unwrap();
    let mut handles = core_contracts();
    handles.push(handle("TokenStatezEUR", "TokenState", Address::with_last_byte(0xe1)));
    handles.push(handle("ProxyzEUR", "ProxyERC20", Address::with_last_byte(0xe2)));
    handles.push(handle("ZassetzEUR", "Synth", OLD_ZEUR));
    write_deployment(&dir, &handles);

    let chain = FakeChain::new();
    chain.set(OLD_ZEUR, "totalSupply", &[], DynSolValue::Uint(U256::from(1000u64), 256));
    Replacement { dir, chain }
}

impl Replacement {
    fn deployer(&self) -> Deployer<'_> {
        let mut deployer =
            Deployer::new(&self.chain, flags(&["ZassetzEUR"]), self.dir.path().join("deployment.json")).unwrap();
        deployer.use_existing_targets();
        deployer
    }
}

#[rstest]
#[tokio::test]
async fn test_safety_gate_declined_stops_the_deployment() {
    let replacement = replacement();
    let mut deployer = replacement.deployer();
    let mut confirm = MockConfirm::new();
    confirm.expect_confirm().times(1).return_const(false);
    let context = ExecutionContext { network: Network::Mainnet, ..Default::default() };

    let result = deploy_synths(
        &mut deployer,
        &confirm,
        &context,
        &[synth("zEUR", "EUR"), synth("zJPY", "JPY")],
        DeploySynthsOptions::default(),
    )
    .await;

    assert_matches!(result, Err(DeployerError::ReconcileError(ReconcileError::OperatorAborted(_))));
    assert!(replacement.chain.deploys().is_empty());
    assert_eq!(deployer.deployed("ZassetzEUR").unwrap().address, OLD_ZEUR);
}

#[rstest]
#[case::confirmed(ExecutionContext { network: Network::Mainnet, ..Default::default() }, Some(true))]
#[case::yes(ExecutionContext { network: Network::Mainnet, yes: true, ..Default::default() }, None)]
#[case::suspended(ExecutionContext { network: Network::Mainnet, system_suspended: true, ..Default::default() }, None)]
#[case::fork(ExecutionContext { network: Network::Mainnet, use_fork: true, ..Default::default() }, None)]
#[case::solidity(ExecutionContext { network: Network::Mainnet, generate_solidity: true, ..Default::default() }, None)]
#[tokio::test]
async fn test_replaced_synth_carries_total_supply(#[case] context: ExecutionContext, #[case] answer: Option<bool>) {
    let replacement = replacement();
    let mut deployer = replacement.deployer();
    let mut confirm = MockConfirm::new();
    match answer {
        Some(answer) => confirm.expect_confirm().times(1).return_const(answer),
        None => confirm.expect_confirm().never(),
    };

    deploy_synths(&mut deployer, &confirm, &context, &[synth("zEUR", "EUR")], DeploySynthsOptions::default())
        .await
        .unwrap();

    let deploys = replacement.chain.deploys();
    assert_eq!(deploys.len(), 1);
    let (source, address, args) = &deploys[0];
    assert_eq!(source, "Synth");
    assert_ne!(*address, OLD_ZEUR);
    assert_eq!(args[6], DynSolValue::Uint(U256::from(1000u64), 256));
    assert_eq!(deployer.get_existing_contract("ZassetzEUR").unwrap().address, OLD_ZEUR);
}

#[rstest]
#[case::strict(false)]
#[case::fresh(true)]
#[tokio::test]
async fn test_flagged_synth_without_previous_deployment(#[case] fresh_deploy: bool) {
    let dir = tempfile::tempdir().unwrap();
    let chain = FakeChain::new();
    let mut deployer = Deployer::new(&chain, flags(&["ZassetzEUR"]), write_deployment(&dir, &core_contracts())).unwrap();
    deployer.use_existing_targets();
    let options = DeploySynthsOptions { add_new_synths: true, fresh_deploy };

    let result =
        deploy_synths(&mut deployer, &no_confirm(), &ExecutionContext::default(), &[synth("zEUR", "EUR")], options)
            .await;

    if fresh_deploy {
        assert_eq!(result.unwrap().synths_to_add.len(), 1);
        let (_, _, args) = chain.deploys().pop().unwrap();
        assert_eq!(args[6], DynSolValue::Uint(U256::ZERO, 256));
    } else {
        assert_matches!(result, Err(DeployerError::MissingContract(name)) if name == "ZassetzEUR");
        // token state and proxy were already deployed when the synth failed
        assert_eq!(sources(&chain), vec!["TokenState", "ProxyERC20"]);
    }
}
