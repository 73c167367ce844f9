use std::path::{Path, PathBuf};

use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use serde::Deserialize;

use crate::chain::ChainError;

/// Compiled contract as produced by `forge build`.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    pub abi: JsonAbi,
    pub bytecode: BytecodeObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BytecodeObject {
    pub object: Bytes,
}

impl Artifact {
    /// Foundry layout: `{artifacts_dir}/{Source}.sol/{Source}.json`
    pub fn path_for(artifacts_dir: &Path, source: &str) -> PathBuf {
        artifacts_dir.join(format!("{source}.sol")).join(format!("{source}.json"))
    }

    pub fn load(artifacts_dir: &Path, source: &str) -> Result<Self, ChainError> {
        let path = Self::path_for(artifacts_dir, source);
        let content = std::fs::read_to_string(&path).map_err(|e| ChainError::Artifact {
            source_name: source.to_string(),
            reason: format!("{}: {e}", path.display()),
        })?;
        let artifact: Artifact = serde_json::from_str(&content)
            .map_err(|e| ChainError::Artifact { source_name: source.to_string(), reason: e.to_string() })?;

        if artifact.bytecode.object.is_empty() {
            return Err(ChainError::Artifact {
                source_name: source.to_string(),
                reason: "artifact has no bytecode (abstract contract or interface?)".to_string(),
            });
        }
        Ok(artifact)
    }

    /// Creation code followed by the ABI encoded constructor arguments.
    pub fn deploy_code(&self, source: &str, constructor_args: &[DynSolValue]) -> Result<Vec<u8>, ChainError> {
        let mut code = self.bytecode.object.to_vec();
        match self.abi.constructor() {
            Some(constructor) => code.extend(constructor.abi_encode_input(constructor_args)?),
            None if constructor_args.is_empty() => {}
            None => {
                return Err(ChainError::Artifact {
                    source_name: source.to_string(),
                    reason: format!("{} constructor arguments given but the ABI has no constructor", constructor_args.len()),
                })
            }
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, Address};
    use assert_matches::assert_matches;

    use super::*;

    const PROXY_ARTIFACT: &str = r#"{
        "abi": [
            {
                "type": "constructor",
                "inputs": [{ "name": "_owner", "type": "address", "internalType": "address" }],
                "stateMutability": "nonpayable"
            },
            {
                "type": "function",
                "name": "target",
                "inputs": [],
                "outputs": [{ "name": "", "type": "address", "internalType": "contract Proxyable" }],
                "stateMutability": "view"
            }
        ],
        "bytecode": { "object": "0x6080604052" }
    }"#;

    fn write_artifact(dir: &Path, source: &str, content: &str) {
        let path = Artifact::path_for(dir, source);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_deploy_code_appends_constructor_args() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "ProxyERC20", PROXY_ARTIFACT);

        let artifact = Artifact::load(dir.path(), "ProxyERC20").unwrap();
        let owner: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let code = artifact.deploy_code("ProxyERC20", &[DynSolValue::Address(owner)]).unwrap();

        assert_eq!(&code[..5], &[0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(code.len(), 5 + 32);
        assert_eq!(&code[5 + 12..], owner.as_slice());
    }

    #[test]
    fn test_wrong_constructor_args_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "ProxyERC20", PROXY_ARTIFACT);

        let artifact = Artifact::load(dir.path(), "ProxyERC20").unwrap();
        assert_matches!(artifact.deploy_code("ProxyERC20", &[]), Err(ChainError::Abi(_)));
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            Artifact::load(dir.path(), "TokenState"),
            Err(ChainError::Artifact { source_name, .. }) if source_name == "TokenState"
        );
    }

    #[test]
    fn test_empty_bytecode_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "ISynth", r#"{ "abi": [], "bytecode": { "object": "0x" } }"#);
        assert_matches!(Artifact::load(dir.path(), "ISynth"), Err(ChainError::Artifact { .. }));
    }
}
