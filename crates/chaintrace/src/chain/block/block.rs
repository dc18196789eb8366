use chaintrace_serialization::{NumBytes, Write, WriteError};
use serde::Serialize;

use crate::chain::{
    BlockTimestamp, Digest, Id, Name, Signature, TransactionReceipt, error::ChainError,
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BlockHeader {
    pub timestamp: BlockTimestamp,
    pub producer: Name,
    pub confirmed: u16,
    pub previous: Id,
    pub transaction_mroot: Digest,
    pub action_mroot: Digest,
    pub schedule_version: u32,
}

impl BlockHeader {
    fn digest(&self) -> Result<Digest, ChainError> {
        let packed = self
            .pack()
            .map_err(|e| ChainError::SerializationError(e.to_string()))?;
        Ok(Digest::hash(&packed))
    }

    pub fn block_num(&self) -> u32 {
        self.previous.block_num() + 1
    }

    /// Block id: header digest with the first 4 bytes overwritten by the
    /// big-endian block number.
    pub fn calculate_id(&self) -> Result<Id, ChainError> {
        let mut result = self.digest()?;
        result.0[0..4].copy_from_slice(&self.block_num().to_be_bytes());
        Ok(result.into())
    }
}

impl NumBytes for BlockHeader {
    fn num_bytes(&self) -> usize {
        self.timestamp.num_bytes()
            + self.producer.num_bytes()
            + self.confirmed.num_bytes()
            + self.previous.num_bytes()
            + self.transaction_mroot.num_bytes()
            + self.action_mroot.num_bytes()
            + self.schedule_version.num_bytes()
    }
}

impl Write for BlockHeader {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        self.timestamp.write(bytes, pos)?;
        self.producer.write(bytes, pos)?;
        self.confirmed.write(bytes, pos)?;
        self.previous.write(bytes, pos)?;
        self.transaction_mroot.write(bytes, pos)?;
        self.action_mroot.write(bytes, pos)?;
        self.schedule_version.write(bytes, pos)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SignedBlockHeader {
    #[serde(flatten)]
    pub header: BlockHeader,
    pub producer_signature: Signature,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SignedBlock {
    #[serde(flatten)]
    pub signed_block_header: SignedBlockHeader,
    pub transactions: Vec<TransactionReceipt>,
}

impl SignedBlock {
    pub fn header(&self) -> &BlockHeader {
        &self.signed_block_header.header
    }
}

/// A validated block together with its derived identity, as handed to the
/// accepted-block notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    pub block: SignedBlock,
    pub id: Id,
    pub block_num: u32,
}

impl BlockState {
    pub fn new(block: SignedBlock) -> Result<Self, ChainError> {
        let id = block.header().calculate_id()?;
        let block_num = block.header().block_num();
        Ok(Self {
            block,
            id,
            block_num,
        })
    }

    pub fn block_num(&self) -> u32 {
        self.block_num
    }

    pub fn id(&self) -> &Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_id_encodes_block_num() {
        let header = BlockHeader {
            previous: Id::for_block(41, 0),
            ..Default::default()
        };
        let id = header.calculate_id().unwrap();
        assert_eq!(id.block_num(), 42);
        assert_eq!(header.block_num(), 42);
    }

    #[test]
    fn block_state_derives_identity_from_header() {
        let block = SignedBlock {
            signed_block_header: SignedBlockHeader {
                header: BlockHeader {
                    previous: Id::for_block(6, 0xCC),
                    ..Default::default()
                },
                ..Default::default()
            },
            transactions: vec![],
        };
        let state = BlockState::new(block.clone()).unwrap();
        assert_eq!(state.block_num(), 7);
        assert_eq!(*state.id(), block.header().calculate_id().unwrap());
    }
}
