use std::{collections::HashMap, path::PathBuf};

use ethers::types::Address;
use figment::{providers::Serialized, value::Value};
use serde::{Deserialize, Serialize};

use common::types::{ConfirmWith, Correlation};

/// Cli Config
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CliConfig {
    pub rpc_url: Option<String>,
    pub private_key: Option<String>,
    pub chain_id: Option<u64>,
    pub deployments_dir: Option<PathBuf>,
    pub token_artifact: Option<PathBuf>,
    pub token: Option<Address>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_name: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub max_poll_attempts: Option<u64>,
    pub correlation: Option<Correlation>,
    pub confirm_with: Option<ConfirmWith>,
    pub stream_number: Option<u64>,
}

impl CliConfig {
    pub fn as_provider(&self, network: &str) -> Serialized<HashMap<&str, Value>> {
        let mut user_dict = HashMap::new();

        if let Some(rpc) = &self.rpc_url {
            user_dict.insert("rpc_url", Value::from(rpc.clone()));
        }

        if let Some(key) = &self.private_key {
            user_dict.insert("private_key", Value::from(key.clone()));
        }

        if let Some(chain_id) = self.chain_id {
            user_dict.insert("chain_id", Value::from(chain_id));
        }

        if let Some(dir) = &self.deployments_dir {
            user_dict.insert("deployments_dir", Value::from(dir.display().to_string()));
        }

        if let Some(artifact) = &self.token_artifact {
            user_dict.insert("token_artifact", Value::from(artifact.display().to_string()));
        }

        if let Some(token) = self.token {
            user_dict.insert("token", Value::from(format!("{token:#x}")));
        }

        if let Some(host) = &self.db_host {
            user_dict.insert("db_host", Value::from(host.clone()));
        }

        if let Some(port) = self.db_port {
            user_dict.insert("db_port", Value::from(port));
        }

        if let Some(user) = &self.db_user {
            user_dict.insert("db_user", Value::from(user.clone()));
        }

        if let Some(password) = &self.db_password {
            user_dict.insert("db_password", Value::from(password.clone()));
        }

        if let Some(name) = &self.db_name {
            user_dict.insert("db_name", Value::from(name.clone()));
        }

        if let Some(interval) = self.poll_interval_ms {
            user_dict.insert("poll_interval_ms", Value::from(interval));
        }

        if let Some(attempts) = self.max_poll_attempts {
            user_dict.insert("max_poll_attempts", Value::from(attempts));
        }

        if let Some(correlation) = self.correlation {
            user_dict.insert("correlation", Value::from(correlation.to_string()));
        }

        if let Some(confirm_with) = self.confirm_with {
            user_dict.insert("confirm_with", Value::from(confirm_with.to_string()));
        }

        if let Some(stream_number) = self.stream_number {
            user_dict.insert("stream_number", Value::from(stream_number));
        }

        Serialized::from(user_dict, network)
    }
}
