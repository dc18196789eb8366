use serde::Serialize;

use crate::chain::{ActionTrace, BlockTimestamp, Id, TransactionReceiptHeader};

/// Engine-side record of one transaction execution attempt, as delivered
/// by the applied-transaction notification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TransactionTrace {
    pub id: Id,
    pub block_num: u32,
    pub block_time: BlockTimestamp,
    pub receipt: Option<TransactionReceiptHeader>,
    pub elapsed: u32,
    pub net_usage: u64,
    pub scheduled: bool,
    pub action_traces: Vec<ActionTrace>,

    /// Set when this trace wraps the failure of a previously scheduled
    /// transaction; the nested trace carries the id the submitter knows.
    pub failed_dtrx_trace: Option<Box<TransactionTrace>>,
    pub error_code: Option<u64>,
}

impl TransactionTrace {
    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn action_traces(&self) -> &[ActionTrace] {
        &self.action_traces
    }
}
