use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DeployerResult};
use crate::types::{CurrencyKey, Network};

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_ARTIFACTS_DIR: &str = "build-artifacts";
pub const DEFAULT_DEPLOYMENT_PATH: &str = "deployment.json";

/// One synth of the deployment. `subclass` overrides the `Synth` contract source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthConfig {
    pub name: CurrencyKey,
    pub asset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subclass: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub feed: Option<String>,
}

/// Per contract deployment flags, keyed by logical name (e.g. `ZassetzBTC`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    #[serde(default)]
    pub deploy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigBuilder {
    pub rpc_url: Option<String>,
    pub private_key: Option<String>,
    pub network: Network,
    pub explorer_link_prefix: Option<String>,
    pub artifacts_dir: Option<PathBuf>,
    pub deployment_path: Option<PathBuf>,
    pub system_suspended: bool,
    pub synths: Vec<SynthConfig>,
    pub feeds: HashMap<String, FeedConfig>,
    pub contracts: HashMap<String, ContractConfig>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            rpc_url: Some(DEFAULT_RPC_URL.to_string()),
            private_key: None,
            network: Network::Local,
            explorer_link_prefix: None,
            artifacts_dir: Some(PathBuf::from(DEFAULT_ARTIFACTS_DIR)),
            deployment_path: Some(PathBuf::from(DEFAULT_DEPLOYMENT_PATH)),
            system_suspended: false,
            synths: Vec::new(),
            feeds: HashMap::new(),
            contracts: HashMap::new(),
        }
    }
}

impl ConfigBuilder {
    pub fn from_file(path: &Path) -> DeployerResult<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn merge_with_env(self) -> Self {
        self.merge_with_vars(|key| std::env::var(key).ok())
    }

    /// Overrides connection and path settings with the values `lookup` finds.
    pub fn merge_with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(rpc_url) = lookup("ETH_RPC") {
            self.rpc_url = Some(rpc_url);
        }
        if let Some(private_key) = lookup("DEPLOYER_PRIVATE_KEY") {
            self.private_key = Some(private_key);
        }
        if let Some(deployment_path) = lookup("DEPLOYMENT_PATH") {
            self.deployment_path = Some(PathBuf::from(deployment_path));
        }
        if let Some(artifacts_dir) = lookup("ARTIFACTS_DIR") {
            self.artifacts_dir = Some(PathBuf::from(artifacts_dir));
        }
        self
    }

    pub fn build(self) -> Result<DeployerConfig, ConfigError> {
        let mut seen = HashSet::new();
        for synth in &self.synths {
            if !seen.insert(synth.name.as_str()) {
                return Err(ConfigError::DuplicateSynth(synth.name.to_string()));
            }
        }

        Ok(DeployerConfig {
            rpc_url: self.rpc_url.ok_or(ConfigError::MissingField("ETH_RPC"))?,
            private_key: self.private_key.ok_or(ConfigError::MissingField("DEPLOYER_PRIVATE_KEY"))?,
            explorer_link_prefix: self
                .explorer_link_prefix
                .unwrap_or_else(|| self.network.default_explorer_link_prefix().to_string()),
            network: self.network,
            artifacts_dir: self.artifacts_dir.ok_or(ConfigError::MissingField("ARTIFACTS_DIR"))?,
            deployment_path: self.deployment_path.ok_or(ConfigError::MissingField("DEPLOYMENT_PATH"))?,
            system_suspended: self.system_suspended,
            synths: self.synths,
            feeds: self.feeds,
            contracts: self.contracts,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DeployerConfig {
    pub rpc_url: String,
    pub private_key: String,
    pub network: Network,
    pub explorer_link_prefix: String,
    pub artifacts_dir: PathBuf,
    pub deployment_path: PathBuf,
    /// Used when the deployment has no `SystemStatus` contract to ask.
    pub system_suspended: bool,
    pub synths: Vec<SynthConfig>,
    pub feeds: HashMap<String, FeedConfig>,
    pub contracts: HashMap<String, ContractConfig>,
}
