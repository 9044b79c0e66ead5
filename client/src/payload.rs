use ethers::types::{Address, Bytes, U256};
use eyre::Result;
use serde::Serialize;

use common::utils::bytes_to_hex_string;

use crate::serde_utils::{checksum, checksum_pair, decimal};

/// A dapp method call, carried in an input as UTF-8 JSON `{"method": ..., "args": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "args", rename_all = "snake_case")]
pub enum DappCall {
    Stream {
        #[serde(serialize_with = "checksum")]
        token: Address,
        #[serde(serialize_with = "checksum")]
        receiver: Address,
        #[serde(serialize_with = "decimal")]
        amount: U256,
        duration: u64,
        start: u64,
    },
    /// Creates `split_number` streams from a single input.
    StreamTest {
        #[serde(serialize_with = "checksum")]
        token: Address,
        #[serde(serialize_with = "checksum")]
        receiver: Address,
        #[serde(serialize_with = "decimal")]
        amount: U256,
        duration: u64,
        start: u64,
        split_number: u64,
    },
    Withdraw {
        #[serde(serialize_with = "checksum")]
        token: Address,
        #[serde(serialize_with = "decimal")]
        amount: U256,
    },
    CancelStream {
        #[serde(serialize_with = "checksum")]
        token: Address,
        #[serde(skip_serializing_if = "Option::is_none")]
        parent_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stream_id: Option<String>,
    },
    AddLiquidity {
        #[serde(serialize_with = "checksum")]
        token_a: Address,
        #[serde(serialize_with = "checksum")]
        token_b: Address,
        #[serde(serialize_with = "decimal")]
        token_a_desired: U256,
        #[serde(serialize_with = "decimal")]
        token_b_desired: U256,
        #[serde(serialize_with = "decimal")]
        token_a_min: U256,
        #[serde(serialize_with = "decimal")]
        token_b_min: U256,
        #[serde(serialize_with = "checksum")]
        to: Address,
    },
    RemoveLiquidity {
        #[serde(serialize_with = "checksum")]
        token_a: Address,
        #[serde(serialize_with = "checksum")]
        token_b: Address,
        #[serde(serialize_with = "decimal")]
        liquidity: U256,
        #[serde(serialize_with = "decimal")]
        amount_a_min: U256,
        #[serde(serialize_with = "decimal")]
        amount_b_min: U256,
        #[serde(serialize_with = "checksum")]
        to: Address,
    },
    Swap {
        #[serde(serialize_with = "decimal")]
        amount_in: U256,
        #[serde(serialize_with = "decimal")]
        amount_out_min: U256,
        #[serde(serialize_with = "checksum_pair")]
        path: [Address; 2],
        duration: u64,
        start: u64,
        #[serde(serialize_with = "checksum")]
        to: Address,
    },
}

impl DappCall {
    pub fn method(&self) -> &'static str {
        match self {
            Self::Stream { .. } => "stream",
            Self::StreamTest { .. } => "stream_test",
            Self::Withdraw { .. } => "withdraw",
            Self::CancelStream { .. } => "cancel_stream",
            Self::AddLiquidity { .. } => "add_liquidity",
            Self::RemoveLiquidity { .. } => "remove_liquidity",
            Self::Swap { .. } => "swap",
        }
    }

    pub fn encode(&self) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }

    pub fn to_hex(&self) -> Result<String> {
        Ok(bytes_to_hex_string(&self.encode()?))
    }
}
