use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ethers::types::Address;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

use common::types::{ConfirmWith, Correlation};
use common::utils::hex_str_to_bytes;

use crate::base::BaseConfig;
use crate::cli::CliConfig;
use crate::errors::ConfigError;
use crate::utils::string_or_number;

pub const ENV_PREFIX: &str = "ROLLUP_BENCH_";

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub rpc_url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub private_key: String,
    pub chain_id: Option<u64>,
    pub deployments_dir: PathBuf,
    pub token_artifact: PathBuf,
    pub token: Option<Address>,
    pub input_box: Option<Address>,
    pub erc20_portal: Option<Address>,
    pub dapp: Option<Address>,
    #[serde(deserialize_with = "string_or_number")]
    pub db_host: String,
    pub db_port: u16,
    #[serde(deserialize_with = "string_or_number")]
    pub db_user: String,
    #[serde(deserialize_with = "string_or_number")]
    pub db_password: String,
    #[serde(deserialize_with = "string_or_number")]
    pub db_name: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u64,
    pub correlation: Correlation,
    pub confirm_with: ConfirmWith,
    pub stream_number: u64,
}

/// Connection parameters of the indexer database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl Config {
    /// Layers the base defaults, the `network` profile of the TOML file, `ROLLUP_BENCH_*`
    /// environment variables and the command line, in increasing order of precedence.
    pub fn from_file(
        config_path: &Path,
        network: &str,
        cli_config: &CliConfig,
    ) -> Result<Self, ConfigError> {
        let base_provider = Serialized::from(BaseConfig::default(), network);
        let toml_provider = Toml::file(config_path).nested();
        let env_provider = Env::prefixed(ENV_PREFIX).profile(network);
        let cli_provider = cli_config.as_provider(network);

        let config: Config = Figment::new()
            .merge(base_provider)
            .merge(toml_provider)
            .merge(env_provider)
            .merge(cli_provider)
            .select(network)
            .extract()
            .map_err(Box::new)?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.rpc_url)
            .map_err(|err| ConfigError::InvalidRpcUrl(self.rpc_url.clone(), err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidRpcUrl(
                self.rpc_url.clone(),
                format!("unsupported scheme {}", url.scheme()),
            ));
        }

        match hex_str_to_bytes(&self.private_key) {
            Ok(key) if key.len() == 32 => {}
            _ => return Err(ConfigError::InvalidPrivateKey),
        }

        if self.max_poll_attempts == 0 {
            return Err(ConfigError::InvalidPollAttempts);
        }

        if self.stream_number == 0 {
            return Err(ConfigError::InvalidStreamNumber);
        }

        if self.db_port == 0 {
            return Err(ConfigError::InvalidDatabasePort(self.db_port));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            name: self.db_name.clone(),
        }
    }
}

impl From<BaseConfig> for Config {
    fn from(base: BaseConfig) -> Self {
        Config {
            rpc_url: base.rpc_url,
            private_key: base.private_key,
            chain_id: None,
            deployments_dir: base.deployments_dir,
            token_artifact: base.token_artifact,
            token: None,
            input_box: None,
            erc20_portal: None,
            dapp: None,
            db_host: base.db_host,
            db_port: base.db_port,
            db_user: base.db_user,
            db_password: base.db_password,
            db_name: base.db_name,
            poll_interval_ms: base.poll_interval_ms,
            max_poll_attempts: base.max_poll_attempts,
            correlation: base.correlation,
            confirm_with: base.confirm_with,
            stream_number: base.stream_number,
        }
    }
}

// secrets stay out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .field("chain_id", &self.chain_id)
            .field("deployments_dir", &self.deployments_dir)
            .field("token_artifact", &self.token_artifact)
            .field("token", &self.token)
            .field("input_box", &self.input_box)
            .field("erc20_portal", &self.erc20_portal)
            .field("dapp", &self.dapp)
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .field("correlation", &self.correlation)
            .field("confirm_with", &self.confirm_with)
            .field("stream_number", &self.stream_number)
            .finish()
    }
}

impl fmt::Display for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "postgres://{}@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}
