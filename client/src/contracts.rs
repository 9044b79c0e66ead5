use std::fs;
use std::path::Path;

use ethers::abi::Abi;
use ethers::contract::abigen;
use ethers::types::Bytes;
use eyre::Result;
use serde::Deserialize;

use crate::errors::ClientError;

abigen!(
    InputBox,
    r#"[
        function addInput(address _dapp, bytes _input) external returns (bytes32)
        event InputAdded(address indexed dapp, uint256 indexed inputIndex, address sender, bytes input)
    ]"#
);

abigen!(
    Erc20Portal,
    r#"[
        function depositERC20Tokens(address _token, address _dapp, uint256 _amount, bytes _execLayerData) external
    ]"#
);

abigen!(
    MintableErc20,
    r#"[
        function mint(address to, uint256 amount) external
        function approve(address spender, uint256 amount) external returns (bool)
    ]"#
);

/// Compiled contract as emitted by hardhat or foundry.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    pub abi: Abi,
    #[serde(deserialize_with = "deserialize_bytecode")]
    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|err| ClientError::ReadFile(path.to_path_buf(), err))?;
        let artifact = serde_json::from_str(&contents)
            .map_err(|err| ClientError::ParseFile(path.to_path_buf(), err))?;
        Ok(artifact)
    }
}

// foundry nests the bytecode as `{ "object": "0x..." }`, hardhat stores the hex string directly
fn deserialize_bytecode<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Bytecode {
        Hex(Bytes),
        Object { object: Bytes },
    }

    match Bytecode::deserialize(deserializer)? {
        Bytecode::Hex(bytes) => Ok(bytes),
        Bytecode::Object { object } => Ok(object),
    }
}
