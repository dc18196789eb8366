use serde::Serialize;

use crate::chain::{Action, ActionReceipt, Name};

/// Engine-side record of one action execution within a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ActionTrace {
    pub receipt: Option<ActionReceipt>,
    pub receiver: Name,
    pub act: Action,
    pub context_free: bool,
    pub elapsed: u32,
    pub console: String,
}

impl ActionTrace {
    pub fn new(act: Action, receiver: Name, context_free: bool) -> Self {
        ActionTrace {
            receipt: None,
            receiver,
            act,
            context_free,
            elapsed: 0,
            console: String::new(),
        }
    }

    pub fn with_receipt(mut self, receipt: ActionReceipt) -> Self {
        self.receipt = Some(receipt);
        self
    }
}
