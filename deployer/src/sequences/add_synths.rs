use alloy::dyn_abi::DynSolValue;

use super::{expect_address, read_value, SynthToAdd};
use crate::deployer::Deployer;
use crate::error::DeployerResult;
use crate::reconciler::{ConfigurationStep, Outcome, Reconciler};

const SYNTHS: &str = "function synths(bytes32) view returns (address)";
const ADD_SYNTHS: &str = "function addSynths(address[] synthsToAdd)";

/// Registers in the `Issuer` the synths it does not point at yet, in a single call.
///
/// Returns `None` when there is no `Issuer` or nothing left to register.
pub async fn add_synths(
    reconciler: &mut Reconciler<'_>,
    deployer: &Deployer<'_>,
    synths_to_add: &[SynthToAdd],
) -> DeployerResult<Option<Outcome>> {
    let Some(issuer) = deployer.deployed("Issuer") else {
        log::debug!("Skipping synth registration: no Issuer deployed");
        return Ok(None);
    };

    let mut pending = Vec::new();
    for SynthToAdd { synth, currency_key } in synths_to_add {
        let value =
            read_value(reconciler.client(), issuer, SYNTHS, &[DynSolValue::FixedBytes(*currency_key, 32)]).await?;
        if expect_address(issuer, "synths", value)? == synth.address {
            log::info!("✓ Issuer already has {} registered", synth.name);
        } else {
            pending.push(synth);
        }
    }

    if pending.is_empty() {
        return Ok(None);
    }

    let names = pending.iter().map(|synth| synth.name.as_str()).collect::<Vec<_>>().join(", ");
    let addresses = pending.iter().map(|synth| DynSolValue::Address(synth.address)).collect();
    let outcome = reconciler
        .reconcile(
            ConfigurationStep::new("Issuer", Some(issuer), ADD_SYNTHS)
                .write_arg(DynSolValue::Array(addresses))
                .comment(format!("Add synths to the Issuer contract - batch {names}")),
        )
        .await?;
    Ok(Some(outcome))
}
