use serde::Serialize;

use crate::chain::{Digest, Name};

/// Proof that a receiver ran an action; carries the engine-assigned
/// global sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ActionReceipt {
    pub receiver: Name,
    pub act_digest: Digest,
    pub global_sequence: u64,
    pub recv_sequence: u64,
}

impl ActionReceipt {
    pub fn new(receiver: Name, act_digest: Digest, global_sequence: u64, recv_sequence: u64) -> Self {
        Self {
            receiver,
            act_digest,
            global_sequence,
            recv_sequence,
        }
    }
}
