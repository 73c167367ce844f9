use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use serde::Serialize;

use crate::chain::ChainClient;
use crate::config::DeployerConfig;
use crate::confirm::Confirm;
use crate::deployer::Deployer;
use crate::error::DeployerResult;
use crate::reconciler::{ExecutionContext, MigrationInstruction, Reconciler};
use crate::sequences::{
    add_synths, configure_synths, deploy_synths, read_system_suspended, DeploySynthsOptions, SynthToAdd,
};
use crate::types::{ContractHandle, Network};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Deploy the synths, configure them and register them in the Issuer.
    Deploy,
    DeploySynths,
    ConfigureSynths,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub generate_solidity: bool,
    pub use_fork: bool,
    pub yes: bool,
    pub add_new_synths: bool,
    pub fresh_deploy: bool,
    /// Where the migration contract goes, defaults to `Migration_{network}.sol` next to the deployment file.
    pub solidity_output_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub stage: Stage,
    pub network: Network,
    pub account: Address,
    pub system_suspended: bool,
    pub newly_deployed: Vec<ContractHandle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synths_to_add: Option<Vec<SynthToAdd>>,
    /// Writes sent or recorded by the reconciliation steps.
    pub configuration_writes: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub migration_instructions: Vec<MigrationInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration_path: Option<PathBuf>,
}

pub fn migration_contract_name(network: Network) -> String {
    format!("Migration_{network}")
}

fn default_migration_path(deployment_path: &Path, network: Network) -> PathBuf {
    deployment_path.with_file_name(format!("{}.sol", migration_contract_name(network)))
}

/// Runs `stage` against the deployment described by `config`.
pub async fn run(
    stage: Stage,
    config: &DeployerConfig,
    options: &RunOptions,
    client: &dyn ChainClient,
    confirm: &dyn Confirm,
) -> DeployerResult<PipelineOutput> {
    let mut deployer = Deployer::new(client, config.contracts.clone(), config.deployment_path.clone())?;
    deployer.use_existing_targets();

    let system_suspended = read_system_suspended(&deployer, config.system_suspended).await?;
    let context = ExecutionContext {
        network: config.network,
        generate_solidity: options.generate_solidity,
        use_fork: options.use_fork,
        yes: options.yes,
        system_suspended,
        explorer_link_prefix: config.explorer_link_prefix.clone(),
    };
    log::info!(
        "⏳ Running {:?} on {} as {} (generate solidity: {}, fork: {})",
        stage,
        config.network,
        client.account(),
        context.generate_solidity,
        context.use_fork
    );

    let deploy_options =
        DeploySynthsOptions { add_new_synths: options.add_new_synths, fresh_deploy: options.fresh_deploy };
    let mut reconciler = Reconciler::new(client, confirm, context.clone());
    let mut synths_to_add = None;

    match stage {
        Stage::Deploy => {
            let output = deploy_synths(&mut deployer, confirm, &context, &config.synths, deploy_options).await?;
            configure_synths(&mut reconciler, &deployer, &config.synths, &config.feeds).await?;
            add_synths(&mut reconciler, &deployer, &output.synths_to_add).await?;
            synths_to_add = Some(output.synths_to_add);
        }
        Stage::DeploySynths => {
            let output = deploy_synths(&mut deployer, confirm, &context, &config.synths, deploy_options).await?;
            synths_to_add = Some(output.synths_to_add);
        }
        Stage::ConfigureSynths => {
            configure_synths(&mut reconciler, &deployer, &config.synths, &config.feeds).await?;
        }
    }
    let configuration_writes = reconciler.writes();

    let migration = reconciler.into_migration();
    let mut migration_path = None;
    if context.generate_solidity && !migration.is_empty() {
        let path = options
            .solidity_output_path
            .clone()
            .unwrap_or_else(|| default_migration_path(&config.deployment_path, config.network));
        migration.write_to(&path, &migration_contract_name(config.network), &config.explorer_link_prefix)?;
        log::info!(
            "📝 Migration contract with {} instructions written to {}",
            migration.instructions().len(),
            path.display()
        );
        migration_path = Some(path);
    }

    log::info!("✅ {:?} completed, {} contracts deployed", stage, deployer.newly_deployed().len());
    Ok(PipelineOutput {
        stage,
        network: config.network,
        account: client.account(),
        system_suspended,
        newly_deployed: deployer.newly_deployed().to_vec(),
        synths_to_add,
        configuration_writes,
        migration_instructions: migration.instructions().to_vec(),
        migration_path,
    })
}
