use serde::Serialize;

use crate::chain::{Id, PackedTransaction, TransactionReceiptHeader};

/// Reference to a transaction inside a block: either just its id (for
/// scheduled transactions) or the full packed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TransactionRef {
    TransactionId(Id),
    Packed(PackedTransaction),
}

impl TransactionRef {
    /// Resolve the reference to its definite transaction identity.
    pub fn id(&self) -> Id {
        match self {
            TransactionRef::TransactionId(id) => *id,
            TransactionRef::Packed(packed) => *packed.id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionReceipt {
    #[serde(flatten)]
    header: TransactionReceiptHeader,
    trx: TransactionRef,
}

impl TransactionReceipt {
    pub fn new(header: TransactionReceiptHeader, trx: TransactionRef) -> Self {
        TransactionReceipt { header, trx }
    }

    pub fn header(&self) -> &TransactionReceiptHeader {
        &self.header
    }

    pub fn trx(&self) -> &TransactionRef {
        &self.trx
    }
}
