use chaintrace_serialization::{NumBytes, Read, ReadError, VarUint32, Write, WriteError};
use serde::{Deserialize, Serialize};

use crate::chain::TimePointSec;

/// Shared header of every transaction: expiration, TaPoS reference block
/// fields, resource limits, and delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TransactionHeader {
    pub expiration: TimePointSec,
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub max_net_usage_words: VarUint32,
    pub max_cpu_usage_ms: u8,
    pub delay_sec: VarUint32,
}

impl TransactionHeader {
    pub fn new(
        expiration: TimePointSec,
        ref_block_num: u16,
        ref_block_prefix: u32,
        max_net_usage_words: VarUint32,
        max_cpu_usage_ms: u8,
        delay_sec: VarUint32,
    ) -> Self {
        Self {
            expiration,
            ref_block_num,
            ref_block_prefix,
            max_net_usage_words,
            max_cpu_usage_ms,
            delay_sec,
        }
    }
}

impl NumBytes for TransactionHeader {
    fn num_bytes(&self) -> usize {
        self.expiration.num_bytes()
            + self.ref_block_num.num_bytes()
            + self.ref_block_prefix.num_bytes()
            + self.max_net_usage_words.num_bytes()
            + self.max_cpu_usage_ms.num_bytes()
            + self.delay_sec.num_bytes()
    }
}

impl Read for TransactionHeader {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        Ok(Self {
            expiration: TimePointSec::read(bytes, pos)?,
            ref_block_num: u16::read(bytes, pos)?,
            ref_block_prefix: u32::read(bytes, pos)?,
            max_net_usage_words: VarUint32::read(bytes, pos)?,
            max_cpu_usage_ms: u8::read(bytes, pos)?,
            delay_sec: VarUint32::read(bytes, pos)?,
        })
    }
}

impl Write for TransactionHeader {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        self.expiration.write(bytes, pos)?;
        self.ref_block_num.write(bytes, pos)?;
        self.ref_block_prefix.write(bytes, pos)?;
        self.max_net_usage_words.write(bytes, pos)?;
        self.max_cpu_usage_ms.write(bytes, pos)?;
        self.delay_sec.write(bytes, pos)
    }
}
