use core::fmt;
use std::str::FromStr;

use chaintrace_serialization::{NumBytes, Read, ReadError, Write, WriteError};
use serde::{Deserialize, Deserializer, Serialize};

use crate::chain::error::ChainError;

/// 32-byte transaction or block identifier. Block ids carry the block
/// number in their first 4 bytes, big-endian.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id(pub [u8; 32]);

impl Id {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Extract the block number from a block id.
    #[inline]
    pub fn block_num(&self) -> u32 {
        u32::from_be_bytes(self.0[0..4].try_into().unwrap_or_default())
    }

    /// Build a block id for tests and tools: block number in the first 4
    /// bytes, the remainder filled from `fill`.
    pub fn for_block(block_num: u32, fill: u8) -> Self {
        let mut bytes = [fill; 32];
        bytes[0..4].copy_from_slice(&block_num.to_be_bytes());
        Id(bytes)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Id {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = hex::decode(s).map_err(|e| ChainError::ParseError(e.to_string()))?;
        Id::try_from(value.as_slice())
    }
}

impl TryFrom<&[u8]> for Id {
    type Error = ChainError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.len() != 32 {
            return Err(ChainError::ParseError(format!(
                "expected 32 bytes for id, got {}",
                value.len()
            )));
        }
        let mut id = [0u8; 32];
        id.copy_from_slice(value);
        Ok(Id(id))
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Id::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl NumBytes for Id {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        32
    }
}

impl Read for Id {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        if *pos + 32 > bytes.len() {
            return Err(ReadError::NotEnoughBytes);
        }
        let mut id = [0u8; 32];
        id.copy_from_slice(&bytes[*pos..*pos + 32]);
        *pos += 32;
        Ok(Id(id))
    }
}

impl Write for Id {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        if *pos + 32 > bytes.len() {
            return Err(WriteError::NotEnoughSpace);
        }
        bytes[*pos..*pos + 32].copy_from_slice(&self.0);
        *pos += 32;
        Ok(())
    }
}
