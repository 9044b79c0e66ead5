use std::path::PathBuf;
use std::sync::Arc;

use ethers::contract::{parse_log, ContractFactory};
use ethers::middleware::{NonceManagerMiddleware, SignerMiddleware};
use ethers::providers::{Http, JsonRpcClient, Middleware, PendingTransaction, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, TransactionReceipt, H256, U256, U64};
use eyre::Result;
use tracing::{debug, info};

use crate::contracts::{ContractArtifact, Erc20Portal, InputAddedFilter, InputBox, MintableErc20};
use crate::deployments::Deployments;
use crate::errors::ClientError;
use crate::payload::DappCall;
use crate::submission::PendingSubmission;

/// Signing middleware stack every benchmark transaction goes through.
pub type SignerClient = NonceManagerMiddleware<SignerMiddleware<Provider<Http>, LocalWallet>>;

/// Issues the on-chain actions of the benchmark.
///
/// Every method except [`BenchClient::submit_input`] returns once the transaction is mined.
#[derive(Debug, Clone)]
pub struct BenchClient {
    client: Arc<SignerClient>,
    deployments: Deployments,
    token_artifact: PathBuf,
}

impl BenchClient {
    pub(crate) fn new(
        client: Arc<SignerClient>,
        deployments: Deployments,
        token_artifact: PathBuf,
    ) -> Self {
        Self {
            client,
            deployments,
            token_artifact,
        }
    }

    /// Address of the signing account.
    pub fn address(&self) -> Address {
        self.client.inner().signer().address()
    }

    pub fn deployments(&self) -> &Deployments {
        &self.deployments
    }

    pub async fn deploy_token(&self, name: &str, symbol: &str) -> Result<Address> {
        let artifact = ContractArtifact::load(&self.token_artifact)?;
        let factory = ContractFactory::new(artifact.abi, artifact.bytecode, self.client.clone());

        let contract = factory
            .deploy((name.to_string(), symbol.to_string()))?
            .send()
            .await?;

        let address = contract.address();
        info!(target: "rollup_bench::client", "token {} deployed at {:?}", symbol, address);
        Ok(address)
    }

    /// Mints `amount` of `token` to the signer.
    pub async fn mint_token(&self, token: Address, amount: U256) -> Result<()> {
        let token = MintableErc20::new(token, self.client.clone());
        let call = token.mint(self.address(), amount);
        let receipt = confirm(call.send().await?).await?;

        debug!(target: "rollup_bench::client", "minted {} in {:?}", amount, receipt.transaction_hash);
        Ok(())
    }

    pub async fn approve_token(&self, token: Address, spender: Address, amount: U256) -> Result<()> {
        let token = MintableErc20::new(token, self.client.clone());
        let call = token.approve(spender, amount);
        let receipt = confirm(call.send().await?).await?;

        debug!(
            target: "rollup_bench::client",
            "approved {:?} for {} in {:?}", spender, amount, receipt.transaction_hash
        );
        Ok(())
    }

    /// Approves the portal and deposits `amount` of `token` into the dapp.
    pub async fn portal_deposit(&self, token: Address, amount: U256) -> Result<H256> {
        let portal = self.deployments.erc20_portal;
        self.approve_token(token, portal, amount).await?;

        let portal = Erc20Portal::new(portal, self.client.clone());
        let call = portal.deposit_erc20_tokens(
            token,
            self.deployments.dapp,
            amount,
            Bytes::from(vec![0u8]),
        );
        let receipt = confirm(call.send().await?).await?;

        info!(target: "rollup_bench::client", "deposited {} tokens in {:?}", amount, receipt.transaction_hash);
        Ok(receipt.transaction_hash)
    }

    /// Adds `payload` to the dapp's input feed and waits for it to be mined.
    pub async fn add_input(&self, payload: Bytes) -> Result<H256> {
        send_input(self.input_box(), self.deployments.dapp, payload).await
    }

    /// Starts an input submission without waiting for it.
    pub fn submit_input(&self, payload: Bytes) -> PendingSubmission {
        let input_box = self.input_box();
        let dapp = self.deployments.dapp;
        PendingSubmission::new(tokio::spawn(send_input(input_box, dapp, payload)))
    }

    pub fn submit_call(&self, call: &DappCall) -> Result<PendingSubmission> {
        debug!(
            target: "rollup_bench::client",
            "submitting {} as {}", call.method(), call.to_hex()?
        );
        Ok(self.submit_input(call.encode()?))
    }

    pub fn stream(
        &self,
        token: Address,
        receiver: Address,
        amount: U256,
        duration: u64,
        start: u64,
    ) -> Result<PendingSubmission> {
        self.submit_call(&DappCall::Stream {
            token,
            receiver,
            amount,
            duration,
            start,
        })
    }

    pub fn stream_test(
        &self,
        token: Address,
        receiver: Address,
        amount: U256,
        duration: u64,
        start: u64,
        split_number: u64,
    ) -> Result<PendingSubmission> {
        self.submit_call(&DappCall::StreamTest {
            token,
            receiver,
            amount,
            duration,
            start,
            split_number,
        })
    }

    fn input_box(&self) -> InputBox<SignerClient> {
        InputBox::new(self.deployments.input_box, self.client.clone())
    }
}

async fn send_input(
    input_box: InputBox<SignerClient>,
    dapp: Address,
    payload: Bytes,
) -> Result<H256> {
    let call = input_box.add_input(dapp, payload);
    let receipt = confirm(call.send().await?).await?;

    let input_index = receipt
        .logs
        .iter()
        .find_map(|log| parse_log::<InputAddedFilter>(log.clone()).ok())
        .map(|event| event.input_index);

    debug!(
        target: "rollup_bench::client",
        "input {:?} added in {:?}", input_index, receipt.transaction_hash
    );
    Ok(receipt.transaction_hash)
}

async fn confirm<P: JsonRpcClient>(pending: PendingTransaction<'_, P>) -> Result<TransactionReceipt> {
    let tx_hash = pending.tx_hash();
    let receipt = pending.await?.ok_or(ClientError::MissingReceipt(tx_hash))?;

    if receipt.status == Some(U64::zero()) {
        return Err(ClientError::Reverted(tx_hash).into());
    }

    Ok(receipt)
}
