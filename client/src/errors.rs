use std::path::PathBuf;

use ethers::types::H256;
use thiserror::Error;

/// Errors that can occur while submitting benchmark actions
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot read {0}: {1}")]
    ReadFile(PathBuf, std::io::Error),
    #[error("cannot parse {0}: {1}")]
    ParseFile(PathBuf, serde_json::Error),
    #[error("no address configured for {0} and no deployment at {1}")]
    MissingAddress(&'static str, PathBuf),
    #[error("transaction {0:?} dropped before it was mined")]
    MissingReceipt(H256),
    #[error("transaction {0:?} reverted")]
    Reverted(H256),
    #[error("invalid private key")]
    InvalidPrivateKey,
    #[error("submission task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
