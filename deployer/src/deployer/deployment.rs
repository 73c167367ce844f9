use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DeployerResult;
use crate::types::ContractHandle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentTarget {
    pub name: String,
    pub source: String,
    pub address: Address,
    pub timestamp: DateTime<Utc>,
}

impl DeploymentTarget {
    pub fn handle(&self) -> ContractHandle {
        ContractHandle::new(self.name.clone(), self.source.clone(), self.address)
    }
}

/// Addresses of every contract of a deployment, keyed by logical name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentFile {
    #[serde(default)]
    pub targets: BTreeMap<String, DeploymentTarget>,
}

impl DeploymentFile {
    /// Loads the file at `path`. A missing file is an empty deployment.
    pub fn load(path: &Path) -> DeployerResult<Self> {
        if !path.exists() {
            log::debug!("No deployment file at {}, starting from an empty deployment", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> DeployerResult<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn record(&mut self, handle: &ContractHandle) {
        self.targets.insert(
            handle.name.clone(),
            DeploymentTarget {
                name: handle.name.clone(),
                source: handle.source.clone(),
                address: handle.address,
                timestamp: Utc::now(),
            },
        );
    }

    pub fn handle(&self, name: &str) -> Option<ContractHandle> {
        self.targets.get(name).map(DeploymentTarget::handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let deployment = DeploymentFile::load(&dir.path().join("deployment.json")).unwrap();
        assert!(deployment.targets.is_empty());
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testnet").join("deployment.json");

        let mut deployment = DeploymentFile::default();
        deployment.record(&ContractHandle::new("ProxyzUSD", "ProxyERC20", Address::with_last_byte(7)));
        deployment.save(&path).unwrap();

        let reloaded = DeploymentFile::load(&path).unwrap();
        assert_eq!(reloaded, deployment);
        assert_eq!(
            reloaded.handle("ProxyzUSD"),
            Some(ContractHandle::new("ProxyzUSD", "ProxyERC20", Address::with_last_byte(7)))
        );
        assert_eq!(reloaded.handle("ZassetzUSD"), None);
    }

    #[test]
    fn test_reads_existing_format() {
        let json = r#"{
            "targets": {
                "ZassetzBTC": {
                    "name": "ZassetzBTC",
                    "source": "MultiCollateralSynth",
                    "address": "0x00000000000000000000000000000000000000b7",
                    "timestamp": "2024-05-01T10:00:00Z"
                }
            }
        }"#;
        let deployment: DeploymentFile = serde_json::from_str(json).unwrap();
        let handle = deployment.handle("ZassetzBTC").unwrap();
        assert_eq!(handle.source, "MultiCollateralSynth");
        assert_eq!(handle.address, Address::with_last_byte(0xb7));
    }
}
