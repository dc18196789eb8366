use chaintrace_serialization::{NumBytes, Read, ReadError, Write, WriteError};
use serde::Serialize;

use crate::chain::{Action, Digest, Id, TransactionHeader, error::ChainError};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Transaction {
    pub header: TransactionHeader,
    pub context_free_actions: Vec<Action>,
    pub actions: Vec<Action>,
}

impl Transaction {
    pub fn new(
        header: TransactionHeader,
        context_free_actions: Vec<Action>,
        actions: Vec<Action>,
    ) -> Self {
        Self {
            header,
            context_free_actions,
            actions,
        }
    }

    /// Transaction identity: digest of the packed, unsigned form.
    pub fn id(&self) -> Result<Id, ChainError> {
        let packed = self
            .pack()
            .map_err(|e| ChainError::SerializationError(e.to_string()))?;
        Ok(Digest::hash(packed).into())
    }
}

impl NumBytes for Transaction {
    fn num_bytes(&self) -> usize {
        self.header.num_bytes()
            + self.context_free_actions.num_bytes()
            + self.actions.num_bytes()
    }
}

impl Read for Transaction {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        Ok(Self {
            header: TransactionHeader::read(bytes, pos)?,
            context_free_actions: Vec::<Action>::read(bytes, pos)?,
            actions: Vec::<Action>::read(bytes, pos)?,
        })
    }
}

impl Write for Transaction {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        self.header.write(bytes, pos)?;
        self.context_free_actions.write(bytes, pos)?;
        self.actions.write(bytes, pos)
    }
}
