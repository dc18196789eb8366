use serde::Serialize;

use crate::chain::{Bytes, Signature, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SignedTransaction {
    transaction: Transaction,
    signatures: Vec<Signature>,
    context_free_data: Vec<Bytes>,
}

impl SignedTransaction {
    pub fn new(
        transaction: Transaction,
        signatures: Vec<Signature>,
        context_free_data: Vec<Bytes>,
    ) -> Self {
        Self {
            transaction,
            signatures,
            context_free_data,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn context_free_data(&self) -> &[Bytes] {
        &self.context_free_data
    }
}
