use ethers::types::{Address, U256};
use ethers::utils::to_checksum;
use serde::ser::SerializeSeq;
use serde::Serializer;

pub fn checksum<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_checksum(address, None))
}

pub fn checksum_pair<S>(addresses: &[Address; 2], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(addresses.len()))?;
    for address in addresses {
        seq.serialize_element(&to_checksum(address, None))?;
    }
    seq.end()
}

/// Base-10 string, so amounts above 2^53 survive JSON consumers.
pub fn decimal<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}
