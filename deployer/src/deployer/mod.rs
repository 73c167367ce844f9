//! Registry of the contracts taking part in a deployment.
//!
//! Contracts are deployed when the configuration flags them, or when forced and nothing is
//! deployed yet. Otherwise the address from the deployment file is reused. Every new deployment
//! is written to the deployment file right away.

pub mod deployment;

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use alloy::dyn_abi::DynSolValue;

use crate::chain::ChainClient;
use crate::config::ContractConfig;
use crate::error::{DeployerError, DeployerResult};
use crate::types::ContractHandle;
pub use deployment::{DeploymentFile, DeploymentTarget};

#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub name: String,
    pub source: String,
    pub args: Vec<DynSolValue>,
    /// Contracts that must be available before this one can be deployed.
    pub deps: Vec<String>,
    /// Deploy even without a deploy flag when no previous deployment exists.
    pub force: bool,
}

impl DeployRequest {
    pub fn new(name: impl Into<String>, source: impl Into<String>, args: Vec<DynSolValue>) -> Self {
        Self { name: name.into(), source: source.into(), args, deps: Vec::new(), force: false }
    }

    pub fn deps(mut self, deps: Vec<String>) -> Self {
        self.deps = deps;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

pub struct Deployer<'a> {
    client: &'a dyn ChainClient,
    contracts: HashMap<String, ContractConfig>,
    deployment_path: PathBuf,
    deployment: DeploymentFile,
    // deployment file content as it was before this run
    existing: BTreeMap<String, ContractHandle>,
    deployed_contracts: BTreeMap<String, ContractHandle>,
    newly_deployed: Vec<ContractHandle>,
}

impl<'a> Deployer<'a> {
    pub fn new(
        client: &'a dyn ChainClient,
        contracts: HashMap<String, ContractConfig>,
        deployment_path: PathBuf,
    ) -> DeployerResult<Self> {
        let deployment = DeploymentFile::load(&deployment_path)?;
        let existing = deployment.targets.values().map(|target| (target.name.clone(), target.handle())).collect();
        Ok(Self {
            client,
            contracts,
            deployment_path,
            deployment,
            existing,
            deployed_contracts: BTreeMap::new(),
            newly_deployed: Vec::new(),
        })
    }

    pub fn client(&self) -> &'a dyn ChainClient {
        self.client
    }

    pub fn account(&self) -> alloy::primitives::Address {
        self.client.account()
    }

    /// Whether the configuration asks for a fresh deployment of `name`.
    pub fn is_flagged_for_deploy(&self, name: &str) -> bool {
        self.contracts.get(name).is_some_and(|config| config.deploy)
    }

    pub async fn deploy_contract(&mut self, request: DeployRequest) -> DeployerResult<ContractHandle> {
        let existing = self.existing.get(&request.name).cloned();
        let should_deploy = self.is_flagged_for_deploy(&request.name) || (request.force && existing.is_none());

        if !should_deploy {
            let handle = existing.ok_or_else(|| DeployerError::MissingContract(request.name.clone()))?;
            log::info!("✓ {} already deployed at {}", handle.name, handle.address);
            self.deployed_contracts.insert(handle.name.clone(), handle.clone());
            return Ok(handle);
        }

        if let Some(missing) = request.deps.iter().find(|dep| self.deployed(dep).is_none()) {
            return Err(DeployerError::MissingDependency { contract: request.name, dependency: missing.clone() });
        }

        log::info!("⏳ Deploying {} ({})", request.name, request.source);
        let deployed = self.client.deploy(&request.source, &request.args).await?;
        let handle = ContractHandle::new(request.name, request.source, deployed.address);

        self.deployment.record(&handle);
        self.deployment.save(&self.deployment_path)?;
        log::info!("✅ {} deployed at {} [tx: {:?}]", handle.name, handle.address, deployed.transaction.transaction_hash);

        self.deployed_contracts.insert(handle.name.clone(), handle.clone());
        self.newly_deployed.push(handle.clone());
        Ok(handle)
    }

    /// The deployment of `name` recorded before this run started.
    pub fn get_existing_contract(&self, name: &str) -> DeployerResult<&ContractHandle> {
        self.existing.get(name).ok_or_else(|| DeployerError::MissingContract(name.to_string()))
    }

    /// Registers every previously deployed contract as part of this run.
    pub fn use_existing_targets(&mut self) {
        for (name, handle) in &self.existing {
            self.deployed_contracts.entry(name.clone()).or_insert_with(|| handle.clone());
        }
    }

    pub fn deployed(&self, name: &str) -> Option<&ContractHandle> {
        self.deployed_contracts.get(name)
    }

    pub fn newly_deployed(&self) -> &[ContractHandle] {
        &self.newly_deployed
    }
}
