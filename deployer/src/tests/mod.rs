
mod deploy_synths;

use std::collections::HashMap;
use std::path::PathBuf;

use alloy::primitives::Address;

use crate::config::{ContractConfig, SynthConfig};
use crate::deployer::DeploymentFile;
use crate::types::{ContractHandle, CurrencyKey};

pub const RESOLVER: Address = Address::with_last_byte(0x01);
pub const SYNTHETIX: Address = Address::with_last_byte(0x02);
pub const FEE_POOL: Address = Address::with_last_byte(0x03);
pub const ISSUER: Address = Address::with_last_byte(0x04);
pub const EXCHANGE_RATES: Address = Address::with_last_byte(0x05);

pub fn handle(name: &str, source: &str, address: Address) -> ContractHandle {
    ContractHandle::new(name, source, address)
}

/// Protocol contracts every synth deployment relies on.
pub fn core_contracts() -> Vec<ContractHandle> {
    vec![
        handle("ReadProxyAddressResolver", "ReadProxy", RESOLVER),
        handle("Synthetix", "Synthetix", SYNTHETIX),
        handle("FeePool", "FeePool", FEE_POOL),
        handle("Issuer", "Issuer", ISSUER),
        handle("ExchangeRates", "ExchangeRates", EXCHANGE_RATES),
    ]
}

pub fn synth(key: &str, asset: &str) -> SynthConfig {
    SynthConfig { name: CurrencyKey::new(key).unwrap(), asset: asset.to_string(), subclass: None }
}

pub fn key(key: &str) -> CurrencyKey {
    CurrencyKey::new(key).unwrap()
}

pub fn flags(names: &[&str]) -> HashMap<String, ContractConfig> {
    names.iter().map(|name| (name.to_string(), ContractConfig { deploy: true })).collect()
}

/// Writes a deployment file holding `handles` into `dir`.
pub fn write_deployment(dir: &tempfile::TempDir, handles: &[ContractHandle]) -> PathBuf {
    let path = dir.path().join("deployment.json");
    let mut deployment = DeploymentFile::default();
    for handle in handles {
        deployment.record(handle);
    }
    deployment.save(&path).unwrap();
    path
}
