use chaintrace_serialization::VarUint32;
use serde::Serialize;

/// Execution outcome of a transaction, as recorded in its block receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    /// Succeeded, no error handler executed.
    Executed,
    /// Objectively failed (not executed), error handler executed.
    SoftFail,
    /// Objectively failed and error handler objectively failed.
    HardFail,
    /// Transaction delayed/deferred/scheduled for future execution.
    Delayed,
    /// Transaction expired and storage space refunded to user.
    Expired,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Executed => "executed",
            TransactionStatus::SoftFail => "soft_fail",
            TransactionStatus::HardFail => "hard_fail",
            TransactionStatus::Delayed => "delayed",
            TransactionStatus::Expired => "expired",
        }
    }
}

impl Serialize for TransactionStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransactionReceiptHeader {
    pub status: TransactionStatus,
    /// Total billed CPU usage (microseconds).
    pub cpu_usage_us: u32,
    /// Total billed NET usage in 8-byte words.
    pub net_usage_words: VarUint32,
}

impl TransactionReceiptHeader {
    pub fn new(status: TransactionStatus, cpu_usage_us: u32, net_usage_words: u32) -> Self {
        Self {
            status,
            cpu_usage_us,
            net_usage_words: VarUint32(net_usage_words),
        }
    }
}
