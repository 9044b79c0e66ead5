use std::sync::Arc;

use async_trait::async_trait;
use ethers::types::{Address, U256};
use ethers::utils::parse_ether;
use eyre::Result;
use tracing::info;

use client::BenchClient;
use config::Config;
use store::RecordStore;
use timing::{Coordinator, Measurement};

/// Lifetime of every stream the benchmark opens, in seconds.
pub const STREAM_DURATION: u64 = 3600;

/// On-chain actions the benchmark times.
#[async_trait]
pub trait Actions: Send + Sync {
    async fn deploy_token(&self, name: &str, symbol: &str) -> Result<Address>;
    async fn mint_token(&self, token: Address, amount: U256) -> Result<()>;
    async fn portal_deposit(&self, token: Address, amount: U256) -> Result<()>;
    async fn stream(&self, token: Address, receiver: Address, amount: U256) -> Result<()>;
    async fn stream_test(
        &self,
        token: Address,
        receiver: Address,
        amount: U256,
        split_number: u64,
    ) -> Result<()>;
}

#[async_trait]
impl Actions for BenchClient {
    async fn deploy_token(&self, name: &str, symbol: &str) -> Result<Address> {
        BenchClient::deploy_token(self, name, symbol).await
    }

    async fn mint_token(&self, token: Address, amount: U256) -> Result<()> {
        BenchClient::mint_token(self, token, amount).await
    }

    async fn portal_deposit(&self, token: Address, amount: U256) -> Result<()> {
        BenchClient::portal_deposit(self, token, amount).await?;
        Ok(())
    }

    async fn stream(&self, token: Address, receiver: Address, amount: U256) -> Result<()> {
        BenchClient::stream(self, token, receiver, amount, STREAM_DURATION, 0)?
            .wait()
            .await?;
        Ok(())
    }

    async fn stream_test(
        &self,
        token: Address,
        receiver: Address,
        amount: U256,
        split_number: u64,
    ) -> Result<()> {
        BenchClient::stream_test(self, token, receiver, amount, STREAM_DURATION, 0, split_number)?
            .wait()
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct BenchReport {
    pub token: Address,
    /// `None` when the benchmark ran against an already funded token.
    pub deposit: Option<Measurement>,
    pub stream_test: Measurement,
    pub stream: Measurement,
}

pub struct Benchmark<A: Actions, S: RecordStore> {
    actions: A,
    coordinator: Coordinator<S>,
    token: Option<Address>,
    stream_number: u64,
}

impl<A: Actions, S: RecordStore> Benchmark<A, S> {
    pub fn new(actions: A, store: Arc<S>, config: &Config) -> Self {
        Benchmark {
            actions,
            coordinator: Coordinator::from_config(store, config),
            token: config.token,
            stream_number: config.stream_number,
        }
    }

    pub async fn run(&self) -> Result<BenchReport> {
        let one_token = parse_ether(1)?;

        info!(
            target: "rollup_bench::runner",
            "test with {} consecutive streams", self.stream_number
        );
        info!(
            target: "rollup_bench::runner",
            "running benchmark tests on {}", self.coordinator.store().name()
        );

        let (token, deposit) = match self.token {
            Some(token) => (token, None),
            None => {
                let (token, deposit) = self.setup_token().await?;
                (token, Some(deposit))
            }
        };

        let actions = &self.actions;
        let split_number = self.stream_number;

        let stream_test = self
            .coordinator
            .measure(|| async move {
                actions
                    .stream_test(token, Address::zero(), one_token, split_number)
                    .await
            })
            .await?;
        info!(
            target: "rollup_bench::runner",
            "added {} streams in {} time units", split_number, stream_test.duration
        );

        let stream = self
            .coordinator
            .measure(|| async move {
                actions.stream(token, Address::zero(), one_token).await
            })
            .await?;
        info!(
            target: "rollup_bench::runner",
            "adding a new stream takes {} time units with {} on-going streams",
            stream.duration,
            split_number
        );

        Ok(BenchReport {
            token,
            deposit,
            stream_test,
            stream,
        })
    }

    // deploys and funds a fresh token, timing its deposit into the dapp
    async fn setup_token(&self) -> Result<(Address, Measurement)> {
        let amount = parse_ether(100)?;
        let actions = &self.actions;

        let token = actions.deploy_token("test", "test").await?;
        actions.mint_token(token, amount).await?;

        let deposit = self
            .coordinator
            .measure(|| async move { actions.portal_deposit(token, amount).await })
            .await?;
        info!(target: "rollup_bench::runner", "deposit duration: {} time units", deposit.duration);

        Ok((token, deposit))
    }
}
