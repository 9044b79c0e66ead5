use std::default::Default;
use std::path::PathBuf;

use serde::Serialize;

use common::types::{ConfirmWith, Correlation};

/// First funded account of a local hardhat or anvil node.
pub const DEV_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub const DEFAULT_STREAM_NUMBER: u64 = 25_000;

/// The base configuration, targeting a local devnet and indexer database.
#[derive(Serialize, Debug, Clone)]
pub struct BaseConfig {
    pub rpc_url: String,
    pub private_key: String,
    pub deployments_dir: PathBuf,
    pub token_artifact: PathBuf,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u64,
    pub correlation: Correlation,
    pub confirm_with: ConfirmWith,
    pub stream_number: u64,
}

impl Default for BaseConfig {
    fn default() -> Self {
        BaseConfig {
            rpc_url: "http://localhost:8545".to_string(),
            private_key: DEV_PRIVATE_KEY.to_string(),
            deployments_dir: PathBuf::from("deployments/localhost"),
            token_artifact: PathBuf::from("artifacts/ERC20Mintable.json"),
            db_host: "localhost".to_string(),
            db_port: 5432,
            db_user: "postgres".to_string(),
            db_password: "password".to_string(),
            db_name: "postgres".to_string(),
            poll_interval_ms: 50,
            max_poll_attempts: 12_000,
            correlation: Correlation::default(),
            confirm_with: ConfirmWith::default(),
            stream_number: DEFAULT_STREAM_NUMBER,
        }
    }
}
