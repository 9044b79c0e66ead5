use std::fs;
use std::path::{Path, PathBuf};

use ethers::types::Address;
use eyre::Result;
use serde::Deserialize;
use tracing::debug;

use config::Config;

use crate::errors::ClientError;

/// Rollup contracts the benchmark talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployments {
    pub input_box: Address,
    pub erc20_portal: Address,
    pub dapp: Address,
}

// only the field we need from a hardhat-deploy export
#[derive(Deserialize)]
struct DeploymentFile {
    address: Address,
}

impl Deployments {
    /// Resolves every contract from `config`, falling back to `<name>.json` in the deployments
    /// directory for addresses that are not configured explicitly.
    pub fn resolve(config: &Config) -> Result<Self> {
        let dir = &config.deployments_dir;

        Ok(Deployments {
            input_box: address_or_load(config.input_box, dir, "InputBox")?,
            erc20_portal: address_or_load(config.erc20_portal, dir, "ERC20Portal")?,
            dapp: address_or_load(config.dapp, dir, "dapp")?,
        })
    }

    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Deployments {
            input_box: load_address(dir, "InputBox")?,
            erc20_portal: load_address(dir, "ERC20Portal")?,
            dapp: load_address(dir, "dapp")?,
        })
    }
}

fn address_or_load(address: Option<Address>, dir: &Path, name: &'static str) -> Result<Address> {
    match address {
        Some(address) => Ok(address),
        None => load_address(dir, name),
    }
}

fn load_address(dir: &Path, name: &'static str) -> Result<Address> {
    let path: PathBuf = dir.join(format!("{name}.json"));
    if !path.exists() {
        return Err(ClientError::MissingAddress(name, path).into());
    }

    let contents =
        fs::read_to_string(&path).map_err(|err| ClientError::ReadFile(path.clone(), err))?;
    let deployment: DeploymentFile =
        serde_json::from_str(&contents).map_err(|err| ClientError::ParseFile(path.clone(), err))?;

    debug!(target: "rollup_bench::client", "{} deployed at {:?}", name, deployment.address);
    Ok(deployment.address)
}
