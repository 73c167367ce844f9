pub mod currency_key;

use std::fmt;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

pub use currency_key::{CurrencyKey, CurrencyKeyError, BASE_CURRENCY_KEY};

/// A contract instance known to the deployer.
///
/// `name` is the logical identifier (`ZassetzBTC`, `ProxyzBTC`, ...) and survives redeploys,
/// `source` is the artifact the instance was built from and `address` changes on every redeploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractHandle {
    pub name: String,
    pub source: String,
    pub address: Address,
}

impl ContractHandle {
    pub fn new(name: impl Into<String>, source: impl Into<String>, address: Address) -> Self {
        Self { name: name.into(), source: source.into(), address }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    #[default]
    Local,
}

impl Network {
    /// Live writes on a production network are gated behind operator confirmation.
    pub fn is_production(self) -> bool {
        matches!(self, Network::Mainnet)
    }

    pub fn default_explorer_link_prefix(self) -> &'static str {
        match self {
            Network::Mainnet => "https://etherscan.io",
            Network::Testnet => "https://sepolia.etherscan.io",
            Network::Local => "",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Local => "local",
        };
        f.write_str(name)
    }
}
