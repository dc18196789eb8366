mod action;
pub use action::Action;

mod action_receipt;
pub use action_receipt::ActionReceipt;

mod action_trace;
pub use action_trace::ActionTrace;

mod packed_transaction;
pub use packed_transaction::{PackedTransaction, TransactionCompression};

mod signed_transaction;
pub use signed_transaction::SignedTransaction;

mod transaction;
pub use transaction::Transaction;

mod transaction_header;
pub use transaction_header::TransactionHeader;

mod transaction_receipt;
pub use transaction_receipt::{TransactionReceipt, TransactionRef};

mod transaction_receipt_header;
pub use transaction_receipt_header::{TransactionReceiptHeader, TransactionStatus};

mod transaction_trace;
pub use transaction_trace::TransactionTrace;
