use chaintrace_serialization::VarUint32;
use serde::Serialize;
use serde_json::Value;

use crate::chain::{
    BlockTimestamp, Digest, Id, Name, Signature, TransactionHeader, TransactionStatus,
};

// The "_v0" suffix marks a versioned storage schema: field names and order
// are a durable contract. Future revisions add new versions, they never
// change these in place.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthorizationTraceV0 {
    pub account: Name,
    pub permission: Name,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionTraceV0 {
    pub global_sequence: u64,
    pub receiver: Name,
    pub account: Name,
    pub action: Name,
    pub authorization: Vec<AuthorizationTraceV0>,
    /// Decoded object when an ABI is known, hex string of the raw payload
    /// otherwise.
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionTraceV0 {
    pub status: TransactionStatus,
    pub cpu_usage_us: u32,
    pub net_usage_words: VarUint32,
    pub id: Id,
    pub signatures: Vec<Signature>,
    pub trx_header: TransactionHeader,
    pub actions: Vec<ActionTraceV0>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockTraceV0 {
    pub id: Id,
    pub number: u32,
    pub previous_id: Id,
    pub timestamp: BlockTimestamp,
    pub producer: Name,
    pub transaction_mroot: Digest,
    pub action_mroot: Digest,
    pub schedule_version: u32,
    pub transactions: Vec<TransactionTraceV0>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_trace_field_order_is_stable() {
        let bt = BlockTraceV0 {
            id: Id::for_block(2, 0),
            number: 2,
            previous_id: Id::for_block(1, 0),
            timestamp: BlockTimestamp::new(0),
            producer: Name::named("prod"),
            transaction_mroot: Digest::default(),
            action_mroot: Digest::default(),
            schedule_version: 0,
            transactions: vec![],
        };
        let json = serde_json::to_string(&bt).unwrap();
        let keys: Vec<&str> = [
            "id",
            "number",
            "previous_id",
            "timestamp",
            "producer",
            "transaction_mroot",
            "action_mroot",
            "schedule_version",
            "transactions",
        ]
        .to_vec();
        let mut last = 0;
        for key in keys {
            let pos = json.find(&format!("\"{}\":", key)).unwrap();
            assert!(pos >= last, "field {} out of order", key);
            last = pos;
        }
    }

    #[test]
    fn action_trace_field_order_is_stable() {
        let at = ActionTraceV0 {
            global_sequence: 1,
            receiver: Name::named("recv"),
            account: Name::named("acct"),
            action: Name::named("act"),
            authorization: vec![AuthorizationTraceV0 {
                account: Name::named("alice"),
                permission: Name::named("active"),
            }],
            data: Value::String("00".to_string()),
        };
        let json = serde_json::to_string(&at).unwrap();
        let mut last = 0;
        for key in [
            "global_sequence",
            "receiver",
            "account",
            "action",
            "authorization",
            "data",
        ] {
            let pos = json.find(&format!("\"{}\":", key)).unwrap();
            assert!(pos >= last, "field {} out of order", key);
            last = pos;
        }
    }
}
