use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ethers::middleware::{NonceManagerMiddleware, SignerMiddleware};
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use eyre::{eyre, Result};
use tracing::info;

use config::Config;

use crate::deployments::Deployments;
use crate::errors::ClientError;
use crate::BenchClient;

#[derive(Default)]
pub struct ClientBuilder {
    pub rpc_url: Option<String>,
    pub private_key: Option<String>,
    pub chain_id: Option<u64>,
    pub deployments: Option<Deployments>,
    pub token_artifact: Option<PathBuf>,
    pub config: Option<Config>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rpc_url(mut self, rpc_url: &str) -> Self {
        self.rpc_url = Some(rpc_url.to_string());
        self
    }

    pub fn private_key(mut self, private_key: &str) -> Self {
        self.private_key = Some(private_key.to_string());
        self
    }

    /// Skips the `eth_chainId` request when building.
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn deployments(mut self, deployments: Deployments) -> Self {
        self.deployments = Some(deployments);
        self
    }

    pub fn token_artifact(mut self, path: PathBuf) -> Self {
        self.token_artifact = Some(path);
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub async fn build(self) -> Result<BenchClient> {
        let base_config = self.config.as_ref();

        let rpc_url = self
            .rpc_url
            .or_else(|| base_config.map(|config| config.rpc_url.clone()))
            .ok_or(eyre!("missing rpc url"))?;

        let private_key = self
            .private_key
            .or_else(|| base_config.map(|config| config.private_key.clone()))
            .ok_or(eyre!("missing private key"))?;

        let token_artifact = self
            .token_artifact
            .or_else(|| base_config.map(|config| config.token_artifact.clone()))
            .ok_or(eyre!("missing token artifact"))?;

        let deployments = match (self.deployments, base_config) {
            (Some(deployments), _) => deployments,
            (None, Some(config)) => Deployments::resolve(config)?,
            (None, None) => return Err(eyre!("missing deployments")),
        };

        let wallet = private_key
            .parse::<LocalWallet>()
            .map_err(|_| ClientError::InvalidPrivateKey)?;

        let provider = Provider::<Http>::try_from(rpc_url.as_str())?
            .interval(Duration::from_millis(10));

        let chain_id = match self
            .chain_id
            .or_else(|| base_config.and_then(|config| config.chain_id))
        {
            Some(chain_id) => chain_id,
            None => provider.get_chainid().await?.as_u64(),
        };

        let wallet = wallet.with_chain_id(chain_id);
        let address = wallet.address();
        let signer = SignerMiddleware::new(provider, wallet);
        let client = Arc::new(NonceManagerMiddleware::new(signer, address));

        info!(
            target: "rollup_bench::client",
            "signing as {:?} on chain {} via {}", address, chain_id, rpc_url
        );

        Ok(BenchClient::new(client, deployments, token_artifact))
    }
}
